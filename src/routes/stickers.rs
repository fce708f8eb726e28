//! # 스티커 API 라우트 핸들러
//!
//! 공개 카탈로그 조회와 관리자용 스티커 뮤테이션을 처리하는
//! HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트
//! - `GET    /api/v1/stickers`               → 카탈로그 조회 (필터/정렬/페이지)
//! - `GET    /api/v1/stickers/featured`      → 추천 스티커 (최대 8개)
//! - `GET    /api/v1/stickers/{id}`          → 단일 스티커 조회
//! - `GET    /api/v1/stickers/{id}/related`  → 관련 스티커 (최대 4개, best-effort)
//! - `GET    /api/v1/stickers/slug/{slug}`   → slug로 공개 스티커 조회
//! - `POST   /api/v1/stickers`               → 새 스티커 생성 (관리자)
//! - `PATCH  /api/v1/stickers/{id}`          → 스티커 수정 (관리자)
//! - `DELETE /api/v1/stickers/{id}`          → 스티커 삭제 + 이미지 정리 (관리자)
//!
//! ## Axum 핸들러 패턴
//! 각 함수는 Axum의 **추출자(Extractor)** 패턴을 따릅니다:
//! - `State(state)`: 애플리케이션 공유 상태 (DB 풀, 설정 등)
//! - `Path(id)`: URL 경로의 변수 (`{id}` 부분)
//! - `Query(filter)`: URL 쿼리 문자열 (`?search=...&page=2`)
//! - `Json(req)`: 요청 본문을 구조체로 파싱
//! - `AdminUser`: 관리자 세션 검증 — 실패하면 핸들러 본문이 실행되지 않고
//!   401 Unauthorized 봉투가 반환됩니다 (어떤 쓰기도 일어나기 전에)

use crate::{
    db,
    error::AppError,
    middleware::auth::AdminUser,
    models::*,
    services,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool은 내부적으로 Arc를 사용하므로 clone해도 풀이 복제되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// 스티커 이미지 저장 디렉토리 경로
    pub uploads_path: String,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// WhatsApp 딥링크 대상 전화번호
    pub whatsapp_phone: String,
    /// 업로드 이미지의 공개 URL을 만들 때 쓰는 기본 주소
    pub public_url: String,
}

/// `GET /stickers` — 공개 카탈로그 한 페이지를 조회합니다.
///
/// 응답: `{ "success": true, "data": [...], "meta": { "total", "page", "limit" } }`
/// meta.total은 페이지네이션을 무시한 전체 매칭 수입니다.
pub async fn list_stickers(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> Result<Json<ApiResponse<Vec<StickerWithTags>>>, AppError> {
    if let Some(page) = filter.page {
        if page < 1 {
            return Err(AppError::BadRequest("Page must be positive".to_string()));
        }
    }

    let (stickers, total) = db::list_stickers(&state.pool, &filter).await?;
    let page = filter.page.unwrap_or(1);

    Ok(Json(ApiResponse::ok_with_meta(
        stickers,
        Meta {
            total,
            page,
            limit: db::ITEMS_PER_PAGE,
        },
    )))
}

/// `GET /stickers/featured` — 추천 스티커 목록 (sort_order순, 최대 8개)
pub async fn get_featured_stickers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StickerWithTags>>>, AppError> {
    let stickers = db::get_featured_stickers(&state.pool).await?;
    Ok(Json(ApiResponse::ok(stickers)))
}

/// `GET /stickers/{id}` — 단일 스티커를 조회합니다 (상태 무관, 태그 포함).
pub async fn get_sticker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StickerWithTags>>, AppError> {
    let sticker = db::get_sticker(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::ok(sticker)))
}

/// `GET /stickers/slug/{slug}` — 상세 페이지용 공개 스티커 조회 (active만)
pub async fn get_sticker_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<StickerWithTags>>, AppError> {
    let sticker = db::get_sticker_by_slug(&state.pool, &slug)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::ok(sticker)))
}

/// `GET /stickers/{id}/related` — 관련 스티커를 조회합니다.
///
/// 같은 태그를 공유하는 다른 active 스티커 최대 4개.
/// 관련 상품 조회가 실패해도 에러가 아니라 빈 목록을 반환합니다
/// (상세 페이지의 부가 콘텐츠이므로).
pub async fn get_related_stickers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<StickerWithTags>>>, AppError> {
    let sticker = db::get_sticker(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let tag_ids: Vec<String> = sticker.tags.iter().map(|tag| tag.id.clone()).collect();
    let related = db::get_related_stickers(&state.pool, &id, &tag_ids).await;

    Ok(Json(ApiResponse::ok(related)))
}

/// `POST /stickers` — 새 스티커를 생성합니다 (관리자 전용).
///
/// 검증 → 삽입 → 태그 연결 순서로 진행하며,
/// 검증에 실패하면 어떤 쓰기도 일어나지 않습니다.
/// 성공 시 201 Created와 함께 생성된 스티커를 반환합니다
/// (기본값: draft, 재고 0, 추천 아님).
pub async fn create_sticker(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<CreateStickerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Sticker>>), AppError> {
    req.validate()?;

    let id = uuid::Uuid::now_v7().to_string();
    let sticker = db::create_sticker(&state.pool, &id, &req).await?;

    if let Some(tag_ids) = &req.tag_ids {
        if !tag_ids.is_empty() {
            db::add_sticker_tags(&state.pool, &id, tag_ids).await?;
        }
    }

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(sticker))))
}

/// `PATCH /stickers/{id}` — 스티커를 수정합니다 (관리자 전용, 부분 업데이트).
///
/// `tag_ids`가 주어지면 (빈 목록이라도) 태그 연결을 전부 교체합니다.
/// 누락되면 연결을 건드리지 않습니다.
pub async fn update_sticker(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateStickerRequest>,
) -> Result<Json<ApiResponse<Sticker>>, AppError> {
    req.validate()?;

    let sticker = db::update_sticker(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(tag_ids) = &req.tag_ids {
        db::replace_sticker_tags(&state.pool, &id, tag_ids).await?;
    }

    Ok(Json(ApiResponse::ok(sticker)))
}

/// `DELETE /stickers/{id}` — 스티커를 삭제합니다 (관리자 전용).
///
/// 저장된 이미지 경로가 있으면 먼저 파일을 정리한 뒤 행을 삭제합니다.
/// 파일 정리는 best-effort라 실패해도 행 삭제는 진행됩니다.
/// 이미 없는 id에 대해서도 성공으로 응답합니다 (멱등).
pub async fn delete_sticker(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if let Some(image_path) = db::get_sticker_image_path(&state.pool, &id).await? {
        services::images::delete_image(&state.uploads_path, &image_path).await;
    }

    db::delete_sticker(&state.pool, &id).await?;

    Ok(Json(ApiResponse::ok_empty()))
}
