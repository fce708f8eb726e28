//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 공통 응답 봉투(envelope)로 자동 변환
//!
//! 모든 엔드포인트는 성공/실패 여부와 관계없이 같은 모양으로 응답합니다:
//! `{ "success": false, "error": "..." }` (실패 시)

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 401, 404 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 — 검증 실패 등 (HTTP 400)
    /// {0}은 첫 번째 필드(String)를 참조하는 포맷 문법입니다.
    /// 검증 규칙 중 처음으로 위반된 항목의 메시지가 그대로 담깁니다.
    #[error("{0}")]
    BadRequest(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error를 AppError로 자동 변환하는 From 트레이트를 구현합니다.
    /// sqlx 함수의 에러에 `?` 연산자를 사용하면 이 variant로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 파일 입출력 오류 (HTTP 500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 인증/권한 실패 (HTTP 401)
    /// 관리자 전용 뮤테이션은 어떤 쓰기도 하기 전에 이 에러로 중단됩니다.
    #[error("Unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    /// AppError를 공통 응답 봉투로 변환합니다.
    ///
    /// 내부 에러(Internal, IO)는 실제 내용을 로그에만 기록하고
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    /// 데이터베이스 에러는 원본 메시지를 그대로 돌려줍니다
    /// (관리자 폼에서 제약 위반 내용을 보여주기 위함).
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An IO error occurred".to_string(),
                )
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        };

        // 공통 봉투: { "success": false, "error": "..." }
        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}
