//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `stickers`: 카탈로그 조회(필터/정렬/페이지네이션)와 스티커 CRUD 쿼리
//! - `tags`: 태그 CRUD 및 스티커-태그 관계 쿼리
//! - `users`: 관리자 인증 관련 쿼리

pub mod stickers;
pub mod tags;
pub mod users;

// 하위 모듈의 모든 공개 함수를 재공개(re-export)하여
// `crate::db::list_stickers`처럼 바로 접근할 수 있게 합니다.
pub use stickers::*;
pub use tags::*;
