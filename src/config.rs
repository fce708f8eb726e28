//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키 (필수)
//! - `UPLOADS_PATH`: 스티커 이미지 저장 디렉토리
//! - `PUBLIC_URL`: 이미지 공개 URL을 만들 때 쓰는 기본 주소
//! - `WHATSAPP_PHONE`: 주문 메시지를 받을 WhatsApp 번호
//! - `ADMIN_USERNAME` / `ADMIN_PASSWORD` / `ADMIN_EMAIL`: 최초 관리자 계정
//! - `HOST` / `PORT`: 서버 바인딩 주소

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 파일 경로 (예: "sqlite:data/calcosnqn.db")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 업로드된 스티커 이미지가 저장되는 디렉토리 경로
    pub uploads_path: String,
    /// 공개 URL 기본 주소 (업로드 이미지 URL 생성에 사용)
    pub public_url: String,
    /// WhatsApp 딥링크 대상 전화번호 (국가번호 포함, 숫자만)
    pub whatsapp_phone: String,
    /// 최초 관리자 계정 이름
    pub admin_username: String,
    /// 최초 관리자 비밀번호 — 설정되지 않으면 계정을 생성하지 않습니다
    pub admin_password: Option<String>,
    /// 최초 관리자 이메일 (선택)
    pub admin_email: Option<String>,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    /// u16: 0~65535 범위의 부호 없는 16비트 정수. 포트 번호에 딱 맞는 타입입니다.
    pub port: u16,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 반환값
    /// - `Ok(Config)`: 필수 환경변수가 모두 있으면 설정 객체 반환
    /// - `Err(VarError)`: 필수 환경변수(DATABASE_URL, JWT_SECRET)가 없으면 에러
    ///
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?, // 필수: 없으면 에러
            jwt_secret: env::var("JWT_SECRET")?,     // 필수: 없으면 에러

            // unwrap_or_else(|_| ...): 환경변수가 없을 때 기본값을 쓰는 패턴
            uploads_path: env::var("UPLOADS_PATH")
                .unwrap_or_else(|_| "data/uploads".to_string()),
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            whatsapp_phone: env::var("WHATSAPP_PHONE")
                .unwrap_or_else(|_| "5492994000000".to_string()),

            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            // .ok(): Result를 Option으로 변환 — 없으면 None
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            admin_email: env::var("ADMIN_EMAIL").ok(),

            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000), // 파싱 실패 시 기본값
        })
    }
}
