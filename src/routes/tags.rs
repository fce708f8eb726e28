//! # 태그 API 라우트 핸들러
//!
//! 태그 CRUD와 태그별 카탈로그 조회를 위한 HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/tags | `list_tags` | 전체 태그 목록 |
//! | POST | /api/v1/tags | `create_tag` | 새 태그 생성 (관리자) |
//! | PATCH | /api/v1/tags/{id} | `update_tag` | 태그 수정 (관리자) |
//! | DELETE | /api/v1/tags/{id} | `delete_tag` | 태그 삭제 (관리자) |
//! | GET | /api/v1/tags/{slug}/stickers | `get_stickers_by_tag` | 태그별 스티커 목록 |

use crate::{
    db,
    error::AppError,
    middleware::auth::AdminUser,
    models::*,
    routes::stickers::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// `GET /tags` — 전체 태그 목록을 스페인어 이름순으로 조회합니다.
pub async fn list_tags(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Tag>>>, AppError> {
    let tags = db::list_tags(&state.pool).await?;
    Ok(Json(ApiResponse::ok(tags)))
}

/// `POST /tags` — 새 태그를 생성합니다 (관리자 전용).
pub async fn create_tag(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Tag>>), AppError> {
    req.validate()?;

    let tag = db::create_tag(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(tag))))
}

/// `PATCH /tags/{id}` — 태그를 수정합니다 (관리자 전용, 부분 업데이트).
pub async fn update_tag(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTagRequest>,
) -> Result<Json<ApiResponse<Tag>>, AppError> {
    req.validate()?;

    let tag = db::update_tag(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::ok(tag)))
}

/// `DELETE /tags/{id}` — 태그를 삭제합니다 (관리자 전용).
///
/// 스티커와의 연결은 ON DELETE CASCADE로 함께 정리됩니다.
/// 이미 없는 id에 대해서도 성공으로 응답합니다 (멱등).
pub async fn delete_tag(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    db::delete_tag(&state.pool, &id).await?;
    Ok(Json(ApiResponse::ok_empty()))
}

/// `GET /tags/{slug}/stickers` — 태그 slug로 스티커 목록을 조회합니다.
///
/// 태그가 없거나 연결된 스티커가 없으면 빈 목록을 반환합니다 (에러 아님).
pub async fn get_stickers_by_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Vec<StickerWithTags>>>, AppError> {
    let stickers = db::get_stickers_by_tag(&state.pool, &slug).await?;
    Ok(Json(ApiResponse::ok(stickers)))
}
