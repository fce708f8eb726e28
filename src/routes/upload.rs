//! # 이미지 업로드 라우트 핸들러
//!
//! 관리자가 스티커 이미지를 올리는 엔드포인트입니다.
//!
//! ## 엔드포인트
//! - `POST /api/v1/admin/upload` (multipart/form-data)
//!   - `file`: 이미지 파일 (5MB 이하, JPG/PNG/WebP만 허용)
//!   - `model_number`: 저장 폴더를 정하는 모델 번호 (선택)
//!
//! 저장 경로는 `{모델번호 숫자부}/{밀리초 타임스탬프}.{확장자}` 형태이며,
//! 응답으로 공개 URL과 저장 경로를 돌려줍니다.
//! 저장 경로는 스티커 삭제 시 파일 정리에 사용됩니다.

use crate::{
    error::AppError,
    middleware::auth::AdminUser,
    models::ApiResponse,
    routes::stickers::AppState,
    services,
};
use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

/// 업로드 파일 크기 상한 (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;
/// 허용하는 이미지 MIME 타입
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// 업로드 응답 페이로드
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// 브라우저가 접근할 공개 URL
    pub image_url: String,
    /// 업로드 루트 기준 상대 경로 (DB의 image_path에 저장)
    pub image_path: String,
}

/// `POST /admin/upload` — 이미지를 검증하고 디스크에 저장합니다 (관리자 전용).
///
/// multipart 본문을 순회하며 `file`과 `model_number` 필드를 찾습니다.
/// 파일이 없거나, 크기/타입 제한을 어기면 400으로 거부하고 아무것도 저장하지 않습니다.
pub async fn upload_image(
    State(state): State<AppState>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, AppError> {
    let mut file: Option<(String, String, Vec<u8>)> = None; // (파일명, MIME 타입, 내용)
    let mut model_number: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        // field를 소비하기 전에 이름을 소유된 String으로 복사해 둡니다 (빌림 충돌 방지)
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload.jpg").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            Some("model_number") => {
                model_number = field.text().await.ok();
            }
            _ => {} // 모르는 필드는 무시
        }
    }

    let Some((file_name, content_type, bytes)) = file else {
        return Err(AppError::BadRequest("No file provided".to_string()));
    };

    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(AppError::BadRequest(
            "File size exceeds 5MB limit".to_string(),
        ));
    }

    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::BadRequest(
            "Only JPG, PNG, and WebP files are allowed".to_string(),
        ));
    }

    // 저장 경로: 모델 번호의 # 를 뗀 숫자부를 폴더로, 타임스탬프를 파일명으로
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("jpg");
    let folder = model_number
        .as_deref()
        .map(|m| m.replace('#', ""))
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| "misc".to_string());
    let image_path = format!("{}/{}.{}", folder, Utc::now().timestamp_millis(), ext);

    services::images::save_image(&state.uploads_path, &image_path, &bytes).await?;

    let image_url = format!("{}/uploads/{}", state.public_url, image_path);

    Ok(Json(ApiResponse::ok(UploadResponse {
        image_url,
        image_path,
    })))
}
