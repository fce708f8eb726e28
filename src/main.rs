//! # CalcosNQN 웹 서버 진입점
//!
//! 이 파일은 CalcosNQN 애플리케이션의 **시작점(entry point)**입니다.
//! Rust 프로그램은 항상 `main()` 함수에서 실행이 시작됩니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 업로드 디렉토리 생성
//! 6. 관리자 계정 부트스트랩
//! 7. API 라우터 설정 및 HTTP 서버 시작

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::Router;
use calcosnqn::{config::Config, db, routes, routes::stickers::AppState};
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// #[tokio::main]: 비동기 런타임을 시작하는 어트리뷰트 매크로.
// async/await 코드를 실행하려면 Tokio 런타임이 필요합니다.
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .ok()는 Result를 Option으로 변환하여, .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // EnvFilter: RUST_LOG 환경변수로 로그 레벨을 제어합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calcosnqn=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting CalcosNQN server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    // 연결 풀: 데이터베이스 연결을 미리 만들어두고 재사용하는 패턴.
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    // sqlx::migrate!는 컴파일 타임에 ./migrations 폴더의 SQL 파일들을 포함시키는 매크로
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 6단계: 업로드 디렉토리 생성 ──
    let uploads_path = Path::new(&config.uploads_path);
    if !uploads_path.exists() {
        tokio::fs::create_dir_all(uploads_path).await?;
        tracing::info!("Created uploads directory: {}", config.uploads_path);
    }

    // ── 7단계: 관리자 계정 부트스트랩 ──
    // 공개 회원가입이 없으므로, 환경변수로 지정된 관리자 계정이 없으면 만들어 둡니다.
    if let Some(password) = &config.admin_password {
        if db::users::find_by_username(&pool, &config.admin_username)
            .await?
            .is_none()
        {
            let salt = SaltString::generate(&mut OsRng);
            let password_hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?
                .to_string();

            let user_id = uuid::Uuid::now_v7().to_string();
            db::users::create_user(
                &pool,
                &user_id,
                &config.admin_username,
                config.admin_email.as_deref(),
                &password_hash,
                "admin",
            )
            .await?;
            tracing::info!("Created admin account '{}'", config.admin_username);
        }
    }

    // ── 8단계: 애플리케이션 상태(State) 생성 ──
    // 모든 라우트 핸들러가 공유하는 데이터입니다.
    let state = AppState {
        pool: pool.clone(),
        uploads_path: config.uploads_path.clone(),
        jwt_secret: config.jwt_secret.clone(),
        whatsapp_phone: config.whatsapp_phone.clone(),
        public_url: config.public_url.clone(),
    };

    // ── 9단계: CORS 미들웨어 설정 ──
    // 개발 환경에서는 모두 허용합니다. 프로덕션에서는 스토어 도메인만 허용해야 합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── 10단계: 라우터 조립 ──
    // API는 /api/v1 아래에, 업로드된 이미지는 /uploads 아래에서 서빙합니다.
    let app = Router::new()
        .nest("/api/v1", routes::api_router(state))
        .nest_service("/uploads", ServeDir::new(&config.uploads_path))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── 11단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
