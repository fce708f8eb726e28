//! # 스티커 이미지 파일 서비스
//!
//! 업로드된 이미지를 디스크에 저장하고, 스티커 삭제 시 파일을 정리합니다.
//! 저장된 파일은 tower-http의 ServeDir로 `/uploads` 아래에서 서빙됩니다.

use crate::error::AppError;
use std::path::PathBuf;
use tokio::fs;

/// 이미지 바이트를 업로드 루트 아래 상대 경로에 저장합니다.
///
/// 부모 디렉토리(모델 번호 폴더)가 없으면 자동으로 생성합니다.
///
/// # 매개변수
/// - `uploads_path`: 업로드 루트 디렉토리 (예: "data/uploads")
/// - `file_path`: 루트 기준 상대 경로 (예: "001/1735689600000.webp")
pub async fn save_image(
    uploads_path: &str,
    file_path: &str,
    bytes: &[u8],
) -> Result<(), AppError> {
    let full_path = PathBuf::from(uploads_path).join(file_path);

    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    fs::write(&full_path, bytes).await?;
    Ok(())
}

/// 저장된 이미지를 삭제합니다.
///
/// 파일 정리는 best-effort입니다: 파일이 이미 없거나 삭제가 실패해도
/// 호출자의 흐름(스티커 행 삭제)을 막지 않고 경고 로그만 남깁니다.
pub async fn delete_image(uploads_path: &str, file_path: &str) {
    let full_path = PathBuf::from(uploads_path).join(file_path);

    if let Err(e) = fs::remove_file(&full_path).await {
        tracing::warn!("Failed to remove image {}: {}", full_path.display(), e);
    }
}
