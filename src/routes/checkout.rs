//! # 주문(체크아웃) 라우트 핸들러
//!
//! 결제 모듈은 없습니다. 장바구니 내용으로 WhatsApp 주문 메시지와
//! 딥링크를 만들어 돌려주면, 프런트엔드가 해당 링크로 채팅을 열고
//! 장바구니를 비웁니다.
//!
//! ## 엔드포인트
//! - `POST /api/v1/checkout` → `{ "message": "...", "url": "https://wa.me/..." }`

use crate::{
    error::AppError,
    models::{ApiResponse, CartItem},
    routes::stickers::AppState,
    services::i18n::Locale,
    services::whatsapp::{self, CheckoutInfo},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// 주문 요청 본문: 장바구니 항목들과 로케일, 선택적 주문자 정보
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartItem>,
    /// 메시지 언어 (기본값: es)
    #[serde(default)]
    pub locale: Locale,
    pub name: Option<String>,
    pub city: Option<String>,
}

/// 주문 응답: 사람이 읽을 메시지와 WhatsApp 딥링크
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub message: String,
    pub url: String,
}

/// `POST /checkout` — 주문 메시지와 딥링크를 만듭니다.
///
/// 빈 장바구니는 거부합니다. 그 외에는 순수 변환이라 실패하지 않습니다.
pub async fn checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<ApiResponse<CheckoutResponse>>, AppError> {
    if req.items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let info = CheckoutInfo {
        name: req.name,
        city: req.city,
    };
    let message = whatsapp::build_message(&req.items, req.locale, Some(&info));
    let url = whatsapp::build_url(&state.whatsapp_phone, &message);

    Ok(Json(ApiResponse::ok(CheckoutResponse { message, url })))
}
