//! # 태그 모델 정의
//!
//! 태그는 스티커를 분류하는 2개 국어(es/en) 라벨이며,
//! 스티커와 다대다(N:M)로 연결됩니다.
//!
//! ## 구조체 역할
//! - `Tag`: DB의 `tags` 테이블 한 행(row)에 대응 (응답용)
//! - `CreateTagRequest`: 새 태그 생성 시 클라이언트가 보내는 JSON 본문
//! - `UpdateTagRequest`: 태그 수정 시 클라이언트가 보내는 JSON 본문

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// 태그 엔티티 — DB의 `tags` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// 태그 고유 식별자 (UUIDv7 형식 문자열)
    pub id: String,
    /// 스페인어 이름 (예: "Patagonia")
    pub name_es: String,
    /// 영어 이름 (예: "Patagonia")
    pub name_en: String,
    /// URL 친화적 식별자 (유일)
    pub slug: String,
    pub created_at: String,
}

/// 태그 생성 요청 — `POST /api/v1/tags`의 요청 본문에 해당합니다.
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name_es: String,
    pub name_en: String,
    pub slug: String,
}

impl CreateTagRequest {
    /// 저장 전에 입력을 검증합니다. 처음 위반된 규칙의 메시지를 반환합니다.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name_es.is_empty() {
            return Err(AppError::BadRequest("Spanish name is required".to_string()));
        }
        if self.name_en.is_empty() {
            return Err(AppError::BadRequest("English name is required".to_string()));
        }
        if self.slug.is_empty() {
            return Err(AppError::BadRequest("Slug is required".to_string()));
        }
        Ok(())
    }
}

/// 태그 수정 요청 — `PATCH /api/v1/tags/{id}`의 요청 본문에 해당합니다.
///
/// 모든 필드가 Option인 이유: 부분 업데이트이므로
/// 클라이언트가 보낸 필드만 변경합니다.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTagRequest {
    pub name_es: Option<String>,
    pub name_en: Option<String>,
    pub slug: Option<String>,
}

impl UpdateTagRequest {
    /// 전달된 필드만 검증합니다.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name_es) = &self.name_es {
            if name_es.is_empty() {
                return Err(AppError::BadRequest("Spanish name is required".to_string()));
            }
        }
        if let Some(name_en) = &self.name_en {
            if name_en.is_empty() {
                return Err(AppError::BadRequest("English name is required".to_string()));
            }
        }
        if let Some(slug) = &self.slug {
            if slug.is_empty() {
                return Err(AppError::BadRequest("Slug is required".to_string()));
            }
        }
        Ok(())
    }
}
