//! # 공통 API 응답 봉투(envelope)
//!
//! 모든 엔드포인트는 같은 모양으로 응답합니다:
//! - `success`: 성공 여부 (bool)
//! - `data`: 성공 시 페이로드 (선택)
//! - `error`: 실패 시 에러 메시지 (선택)
//! - `meta`: 목록 응답의 페이지네이션 정보 (선택)

use serde::Serialize;

/// 목록 응답에 붙는 페이지네이션 메타데이터
#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    /// 필터 조건에 맞는 전체 행 수 (페이지네이션과 무관)
    pub total: i64,
    /// 현재 페이지 번호 (1부터 시작)
    pub page: i64,
    /// 페이지 크기
    pub limit: i64,
}

/// 공통 응답 봉투
///
/// `#[serde(skip_serializing_if = "Option::is_none")]`:
/// None인 필드는 JSON에 아예 나타나지 않습니다.
/// 예: 성공 응답에는 "error" 키가 없습니다.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 성공 응답을 생성합니다.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    /// 페이지네이션 메타데이터가 붙은 성공 응답을 생성합니다.
    pub fn ok_with_meta(data: T, meta: Meta) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(meta),
        }
    }
}

impl ApiResponse<()> {
    /// 페이로드 없는 성공 응답 (삭제 등)
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            meta: None,
        }
    }
}
