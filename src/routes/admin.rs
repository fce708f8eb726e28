//! # 관리자 백오피스 라우트 핸들러
//!
//! 관리자 화면 전용 조회와 일괄 재고 수정을 처리합니다.
//! 모든 핸들러가 `AdminUser` 추출자를 요구합니다.
//!
//! ## 엔드포인트
//! - `GET /api/v1/admin/stickers`      → 전체 스티커 목록 (모든 상태)
//! - `GET /api/v1/admin/stickers/{id}` → 단일 스티커 (편집 폼용)
//! - `GET /api/v1/admin/stats`         → 대시보드 통계
//! - `PUT /api/v1/admin/stock`         → 일괄 재고 수정

use crate::{
    db,
    error::AppError,
    middleware::auth::AdminUser,
    models::*,
    routes::stickers::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

/// `GET /admin/stickers` — 상태와 무관한 전체 스티커 목록 (최신순, 태그 포함)
pub async fn list_admin_stickers(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<StickerWithTags>>>, AppError> {
    let stickers = db::get_admin_stickers(&state.pool).await?;
    Ok(Json(ApiResponse::ok(stickers)))
}

/// `GET /admin/stickers/{id}` — 편집 폼에 띄울 단일 스티커
pub async fn get_admin_sticker(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StickerWithTags>>, AppError> {
    let sticker = db::get_sticker(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::ok(sticker)))
}

/// `GET /admin/stats` — 대시보드 통계 (전체/공개/초안/재고부족 수)
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let stats = db::get_dashboard_stats(&state.pool).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// `PUT /admin/stock` — (id, 재고) 쌍 목록을 순서대로 적용합니다.
///
/// 각 항목은 독립적으로 적용됩니다. 하나라도 실패하면 거기서 중단하고
/// 실패한 id를 에러 메시지에 담아 반환합니다.
/// 이미 적용된 앞쪽 항목들은 되돌리지 않습니다 (트랜잭션 없음).
pub async fn update_stock(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(updates): Json<Vec<StockUpdate>>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    for update in &updates {
        if update.stock < 0 {
            return Err(AppError::BadRequest(format!(
                "Failed to update stock for {}: stock cannot be negative",
                update.id
            )));
        }
        if let Err(e) = db::update_stock(&state.pool, &update.id, update.stock).await {
            return Err(AppError::BadRequest(format!(
                "Failed to update stock for {}: {}",
                update.id, e
            )));
        }
    }

    Ok(Json(ApiResponse::ok_empty()))
}
