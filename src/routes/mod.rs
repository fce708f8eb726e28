//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 관리자 인증 (로그인, 토큰 갱신, 로그아웃, 내 정보)
//! - `stickers`: 공개 카탈로그 조회와 스티커 뮤테이션
//! - `tags`: 태그 CRUD 및 태그별 카탈로그
//! - `admin`: 관리자 목록/통계/일괄 재고 수정
//! - `upload`: 이미지 업로드
//! - `checkout`: WhatsApp 주문 메시지/딥링크
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod admin;
pub mod auth;
pub mod checkout;
pub mod health;
pub mod stickers;
pub mod tags;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};
use stickers::AppState;

/// `/api/v1` 아래에 중첩되는 API 라우터를 조립합니다.
///
/// main은 이 라우터에 CORS/로깅 미들웨어와 정적 파일 서빙을 얹고,
/// 통합 테스트는 서버 없이 이 라우터를 직접 호출합니다.
pub fn api_router(state: AppState) -> Router {
    // 인증 관련 라우트 (로그인, 토큰 갱신, 로그아웃, 내 정보)
    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    Router::new()
        .merge(auth_routes)
        // 공개 카탈로그 + 관리자 스티커 뮤테이션
        // 정적 세그먼트(featured, slug)가 경로 변수보다 먼저 매칭됩니다.
        .route("/stickers", get(stickers::list_stickers).post(stickers::create_sticker))
        .route("/stickers/featured", get(stickers::get_featured_stickers))
        .route("/stickers/slug/{slug}", get(stickers::get_sticker_by_slug))
        .route(
            "/stickers/{id}",
            get(stickers::get_sticker)
                .patch(stickers::update_sticker)
                .delete(stickers::delete_sticker),
        )
        .route("/stickers/{id}/related", get(stickers::get_related_stickers))
        // 태그 CRUD와 태그별 카탈로그
        // 경로 변수 이름은 같은 위치에서 하나로 통일해야 합니다({tag}):
        // 뮤테이션에서는 태그 id, 목록 조회에서는 slug가 들어옵니다.
        .route("/tags", get(tags::list_tags).post(tags::create_tag))
        .route("/tags/{tag}", patch(tags::update_tag).delete(tags::delete_tag))
        .route("/tags/{tag}/stickers", get(tags::get_stickers_by_tag))
        // 관리자 백오피스
        .route("/admin/stickers", get(admin::list_admin_stickers))
        .route("/admin/stickers/{id}", get(admin::get_admin_sticker))
        .route("/admin/stats", get(admin::get_dashboard_stats))
        .route("/admin/stock", put(admin::update_stock))
        // 업로드는 기본 본문 제한(2MB)보다 커야 하므로 한도를 따로 올립니다.
        // 실제 5MB 검증은 핸들러 안에서 수행합니다.
        .route(
            "/admin/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(upload::MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        // 주문
        .route("/checkout", post(checkout::checkout))
        // 헬스체크
        .route("/health", get(health::health_check))
        .with_state(state)
}
