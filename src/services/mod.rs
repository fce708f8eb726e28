//! # 서비스 계층
//!
//! 데이터베이스와 무관한 비즈니스 로직을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `i18n`: 로케일별 이름/설명 선택, 가격 포맷, slug 생성
//! - `whatsapp`: 장바구니 → 주문 메시지/딥링크 변환 (순수 함수)
//! - `cart`: 장바구니 상태 머신과 로컬 저장소 입출력
//! - `images`: 업로드된 스티커 이미지 파일 저장/삭제

pub mod cart;
pub mod i18n;
pub mod images;
pub mod whatsapp;
