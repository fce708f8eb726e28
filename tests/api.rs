//! API 통합 테스트
//!
//! 실제 서버를 띄우지 않고 라우터를 직접 호출합니다 (tower의 oneshot).
//! 데이터베이스는 테스트마다 새로 만드는 in-memory SQLite이며,
//! 마이그레이션을 실행해 프로덕션과 같은 스키마를 사용합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use calcosnqn::db;
use calcosnqn::middleware::auth::create_access_token;
use calcosnqn::models::{CreateStickerRequest, CreateTagRequest};
use calcosnqn::routes::{api_router, stickers::AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

const JWT_SECRET: &str = "test-secret";

struct TestApp {
    pool: SqlitePool,
    router: axum::Router,
    // TempDir은 드롭되면 디렉토리가 사라지므로 테스트가 끝날 때까지 들고 있습니다
    uploads_dir: tempfile::TempDir,
}

async fn setup() -> TestApp {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");

    let uploads_dir = tempfile::tempdir().unwrap();
    let state = AppState {
        pool: pool.clone(),
        uploads_path: uploads_dir.path().to_str().unwrap().to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        whatsapp_phone: "5492994000000".to_string(),
        public_url: "http://localhost:3000".to_string(),
    };

    TestApp {
        pool,
        router: api_router(state),
        uploads_dir,
    }
}

fn admin_token() -> String {
    create_access_token("admin-user", "admin", JWT_SECRET).unwrap()
}

fn non_admin_token() -> String {
    create_access_token("some-user", "editor", JWT_SECRET).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// 테스트 데이터 삽입. 기본값 위에 override를 덮어씁니다.
async fn seed_sticker(pool: &SqlitePool, overrides: Value) -> String {
    let mut base = json!({
        "model_number": "#001",
        "name_es": "Calco Luna",
        "name_en": "Moon Sticker",
        "slug": format!("sticker-{}", uuid::Uuid::now_v7()),
        "price_ars": 1500,
        "stock": 10,
        "status": "active"
    });
    for (key, value) in overrides.as_object().unwrap() {
        base[key] = value.clone();
    }

    let req: CreateStickerRequest = serde_json::from_value(base).unwrap();
    let id = uuid::Uuid::now_v7().to_string();
    db::create_sticker(pool, &id, &req).await.unwrap();
    id
}

async fn seed_tag(pool: &SqlitePool, name: &str, slug: &str) -> String {
    let tag = db::create_tag(
        pool,
        &CreateTagRequest {
            name_es: name.to_string(),
            name_en: name.to_string(),
            slug: slug.to_string(),
        },
    )
    .await
    .unwrap();
    tag.id
}

async fn count_associations(pool: &SqlitePool, sticker_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sticker_tags WHERE sticker_id = ?")
        .bind(sticker_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ── 카탈로그 조회 ──

#[tokio::test]
async fn catalog_returns_only_active_rows_sorted_by_price() {
    let app = setup().await;
    seed_sticker(&app.pool, json!({ "price_ars": 3000 })).await;
    seed_sticker(&app.pool, json!({ "price_ars": 1000 })).await;
    seed_sticker(&app.pool, json!({ "price_ars": 500, "status": "draft" })).await;

    let (status, body) = send(&app.router, get_request("/stickers?sort=price_asc")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2); // draft는 보이지 않음
    assert_eq!(data[0]["price_ars"], json!(1000));
    assert_eq!(data[1]["price_ars"], json!(3000));
    assert_eq!(body["meta"]["total"], json!(2));
    assert_eq!(body["meta"]["page"], json!(1));
    assert_eq!(body["meta"]["limit"], json!(24));
}

#[tokio::test]
async fn catalog_search_matches_names_and_model_number_case_insensitively() {
    let app = setup().await;
    seed_sticker(&app.pool, json!({ "name_es": "Calco Luna", "name_en": "Moon" })).await;
    seed_sticker(&app.pool, json!({ "name_es": "Sol", "name_en": "Sun", "model_number": "#777" })).await;
    seed_sticker(&app.pool, json!({ "name_es": "Rio", "name_en": "River", "model_number": "#123" })).await;

    // 스페인어 이름 일치 (대소문자 무시)
    let (_, body) = send(&app.router, get_request("/stickers?search=LUNA")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // 영어 이름 일치
    let (_, body) = send(&app.router, get_request("/stickers?search=sun")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // 모델 번호 일치
    let (_, body) = send(&app.router, get_request("/stickers?search=777")).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["model_number"], json!("#777"));

    // 일치 없음
    let (_, body) = send(&app.router, get_request("/stickers?search=nothing")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["meta"]["total"], json!(0));
}

#[tokio::test]
async fn catalog_filters_by_tag_slug_and_attaches_full_tag_set() {
    let app = setup().await;
    let tagged = seed_sticker(&app.pool, json!({})).await;
    seed_sticker(&app.pool, json!({})).await; // 태그 없는 스티커

    let patagonia = seed_tag(&app.pool, "Patagonia", "patagonia").await;
    let animals = seed_tag(&app.pool, "Animales", "animales").await;
    db::add_sticker_tags(&app.pool, &tagged, &[patagonia, animals]).await.unwrap();

    let (_, body) = send(&app.router, get_request("/stickers?tag=patagonia")).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], json!(tagged));
    // 필터에 쓴 태그만이 아니라 연결된 태그 전체가 붙습니다
    assert_eq!(data[0]["tags"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn catalog_out_of_range_page_returns_empty_not_error() {
    let app = setup().await;
    seed_sticker(&app.pool, json!({})).await;

    let (status, body) = send(&app.router, get_request("/stickers?page=99")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["meta"]["total"], json!(1));

    // 페이지 0은 검증 에러
    let (status, _) = send(&app.router, get_request("/stickers?page=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn featured_endpoint_caps_at_eight_ordered_by_sort_order() {
    let app = setup().await;
    for i in 0..10 {
        seed_sticker(
            &app.pool,
            json!({ "is_featured": true, "sort_order": 10 - i }),
        )
        .await;
    }

    let (_, body) = send(&app.router, get_request("/stickers/featured")).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 8);
    let orders: Vec<i64> = data.iter().map(|s| s["sort_order"].as_i64().unwrap()).collect();
    let mut sorted = orders.clone();
    sorted.sort();
    assert_eq!(orders, sorted);
}

#[tokio::test]
async fn detail_by_slug_only_serves_active_stickers() {
    let app = setup().await;
    seed_sticker(&app.pool, json!({ "slug": "luna", "status": "draft" })).await;

    let (status, body) = send(&app.router, get_request("/stickers/slug/luna")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn related_returns_other_active_stickers_when_tags_are_empty() {
    let app = setup().await;
    let target = seed_sticker(&app.pool, json!({})).await;
    for _ in 0..6 {
        seed_sticker(&app.pool, json!({})).await;
    }

    let (status, body) = send(
        &app.router,
        get_request(&format!("/stickers/{}/related", target)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 4); // 상한 4
    // 자기 자신은 제외됩니다
    assert!(data.iter().all(|s| s["id"].as_str() != Some(target.as_str())));
}

#[tokio::test]
async fn related_prefers_stickers_sharing_a_tag() {
    let app = setup().await;
    let target = seed_sticker(&app.pool, json!({})).await;
    let sibling = seed_sticker(&app.pool, json!({})).await;
    seed_sticker(&app.pool, json!({})).await; // 태그가 다른 스티커

    let tag = seed_tag(&app.pool, "Patagonia", "patagonia").await;
    db::add_sticker_tags(&app.pool, &target, std::slice::from_ref(&tag)).await.unwrap();
    db::add_sticker_tags(&app.pool, &sibling, std::slice::from_ref(&tag)).await.unwrap();

    let (_, body) = send(
        &app.router,
        get_request(&format!("/stickers/{}/related", target)),
    )
    .await;

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], json!(sibling));
}

#[tokio::test]
async fn related_swallows_underlying_query_failures() {
    let app = setup().await;
    let target = seed_sticker(&app.pool, json!({})).await;

    // 풀을 닫아 모든 쿼리를 실패시킵니다 — 관련 상품 조회는
    // 에러를 전파하지 않고 빈 목록으로 대체해야 합니다.
    app.pool.close().await;
    let related = db::get_related_stickers(&app.pool, &target, &[]).await;

    assert!(related.is_empty());
}

#[tokio::test]
async fn stickers_by_tag_short_circuits_to_empty() {
    let app = setup().await;
    seed_sticker(&app.pool, json!({})).await;

    // 없는 태그 slug → 더 조회하지 않고 빈 목록
    let (status, body) = send(&app.router, get_request("/tags/missing/stickers")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // 태그는 있지만 연결이 없음 → 빈 목록
    seed_tag(&app.pool, "Vacía", "vacia").await;
    let (_, body) = send(&app.router, get_request("/tags/vacia/stickers")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

// ── 관리자 뮤테이션 ──

#[tokio::test]
async fn create_sticker_rejects_non_admin_sessions_without_writing() {
    let app = setup().await;
    let body = json!({
        "model_number": "#001", "name_es": "Luna", "name_en": "Moon",
        "slug": "luna", "price_ars": 1500
    });

    // 토큰 없음
    let (status, response) = send(&app.router, json_request("POST", "/stickers", None, &body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response, json!({ "success": false, "error": "Unauthorized" }));

    // 관리자가 아닌 세션
    let token = non_admin_token();
    let (status, response) =
        send(&app.router, json_request("POST", "/stickers", Some(&token), &body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response, json!({ "success": false, "error": "Unauthorized" }));

    // 어떤 쓰기도 일어나지 않았음
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stickers")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn create_sticker_as_admin_applies_defaults() {
    let app = setup().await;
    let token = admin_token();
    let body = json!({
        "model_number": "#001", "name_es": "Luna", "name_en": "Moon",
        "slug": "luna", "price_ars": 1500
    });

    let (status, response) =
        send(&app.router, json_request("POST", "/stickers", Some(&token), &body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["success"], json!(true));
    assert_eq!(response["data"]["status"], json!("draft"));
    assert_eq!(response["data"]["stock"], json!(0));
    assert_eq!(response["data"]["is_featured"], json!(false));
    assert_eq!(response["data"]["product_type"], json!("calco"));
}

#[tokio::test]
async fn create_sticker_reports_first_violated_rule_and_writes_nothing() {
    let app = setup().await;
    let token = admin_token();
    let body = json!({
        "model_number": "001", "name_es": "", "name_en": "Moon",
        "slug": "luna", "price_ars": 1500
    });

    let (status, response) =
        send(&app.router, json_request("POST", "/stickers", Some(&token), &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], json!("Model number must be like #001"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stickers")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn update_rewrites_tag_associations_only_when_list_is_supplied() {
    let app = setup().await;
    let token = admin_token();
    let sticker = seed_sticker(&app.pool, json!({})).await;
    let tag_a = seed_tag(&app.pool, "A", "a").await;
    let tag_b = seed_tag(&app.pool, "B", "b").await;
    db::add_sticker_tags(&app.pool, &sticker, &[tag_a.clone(), tag_b]).await.unwrap();
    assert_eq!(count_associations(&app.pool, &sticker).await, 2);

    // tag_ids 누락 → 연결을 건드리지 않음
    let (status, _) = send(
        &app.router,
        json_request(
            "PATCH",
            &format!("/stickers/{}", sticker),
            Some(&token),
            &json!({ "name_es": "Nueva" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count_associations(&app.pool, &sticker).await, 2);

    // 목록 제공 → 전부 지우고 다시 연결
    let (_, response) = send(
        &app.router,
        json_request(
            "PATCH",
            &format!("/stickers/{}", sticker),
            Some(&token),
            &json!({ "tag_ids": [tag_a] }),
        ),
    )
    .await;
    assert_eq!(response["success"], json!(true));
    assert_eq!(count_associations(&app.pool, &sticker).await, 1);

    // 빈 목록도 "제공"이므로 연결이 전부 해제됩니다
    let (_, _) = send(
        &app.router,
        json_request(
            "PATCH",
            &format!("/stickers/{}", sticker),
            Some(&token),
            &json!({ "tag_ids": [] }),
        ),
    )
    .await;
    assert_eq!(count_associations(&app.pool, &sticker).await, 0);
}

#[tokio::test]
async fn update_missing_sticker_is_not_found() {
    let app = setup().await;
    let token = admin_token();

    let (status, _) = send(
        &app.router,
        json_request(
            "PATCH",
            "/stickers/no-such-id",
            Some(&token),
            &json!({ "name_es": "X" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_sticker_removes_stored_image_before_the_row() {
    let app = setup().await;
    let token = admin_token();

    // 업로드된 이미지가 있는 스티커
    let image_rel = "001/test.webp";
    let image_abs = app.uploads_dir.path().join(image_rel);
    tokio::fs::create_dir_all(image_abs.parent().unwrap()).await.unwrap();
    tokio::fs::write(&image_abs, b"img").await.unwrap();
    let with_image = seed_sticker(&app.pool, json!({ "image_path": image_rel })).await;

    let (status, response) = send(
        &app.router,
        json_request("DELETE", &format!("/stickers/{}", with_image), Some(&token), &json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], json!(true));
    assert!(!image_abs.exists()); // 파일이 정리되었음
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stickers")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn delete_sticker_without_image_touches_no_files() {
    let app = setup().await;
    let token = admin_token();

    // 다른 스티커의 파일은 남아 있어야 합니다
    let other_file = app.uploads_dir.path().join("misc/other.webp");
    tokio::fs::create_dir_all(other_file.parent().unwrap()).await.unwrap();
    tokio::fs::write(&other_file, b"img").await.unwrap();

    let without_image = seed_sticker(&app.pool, json!({})).await;
    let (status, _) = send(
        &app.router,
        json_request("DELETE", &format!("/stickers/{}", without_image), Some(&token), &json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(other_file.exists());
}

#[tokio::test]
async fn bulk_stock_aborts_on_first_failure_keeping_prior_updates() {
    let app = setup().await;
    let token = admin_token();
    let first = seed_sticker(&app.pool, json!({ "stock": 0 })).await;
    let second = seed_sticker(&app.pool, json!({ "stock": 7 })).await;

    let (status, response) = send(
        &app.router,
        json_request(
            "PUT",
            "/admin/stock",
            Some(&token),
            &json!([
                { "id": first, "stock": 5 },
                { "id": second, "stock": -1 }
            ]),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = response["error"].as_str().unwrap();
    assert!(error.contains(&second)); // 실패한 id가 메시지에 담김

    // 먼저 적용된 수정은 되돌리지 않습니다
    let stock: i64 = sqlx::query_scalar("SELECT stock FROM stickers WHERE id = ?")
        .bind(&first)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(stock, 5);
}

#[tokio::test]
async fn admin_listing_includes_all_statuses() {
    let app = setup().await;
    let token = admin_token();
    seed_sticker(&app.pool, json!({ "status": "active" })).await;
    seed_sticker(&app.pool, json!({ "status": "draft" })).await;
    seed_sticker(&app.pool, json!({ "status": "archived" })).await;

    let mut request = get_request("/admin/stickers");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );
    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn dashboard_stats_count_by_status_and_low_stock() {
    let app = setup().await;
    let token = admin_token();
    seed_sticker(&app.pool, json!({ "status": "active", "stock": 2 })).await;
    seed_sticker(&app.pool, json!({ "status": "active", "stock": 20 })).await;
    seed_sticker(&app.pool, json!({ "status": "draft" })).await;

    let mut request = get_request("/admin/stats");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );
    let (_, body) = send(&app.router, request).await;

    assert_eq!(body["data"]["total"], json!(3));
    assert_eq!(body["data"]["active"], json!(2));
    assert_eq!(body["data"]["draft"], json!(1));
    assert_eq!(body["data"]["low_stock"], json!(1));
}

// ── 업로드 ──

fn multipart_request(
    uri: &str,
    token: &str,
    boundary: &str,
    body: Vec<u8>,
) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap()
}

fn file_part(boundary: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            boundary, filename, content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

#[tokio::test]
async fn upload_stores_file_under_model_folder() {
    let app = setup().await;
    let token = admin_token();
    let boundary = "test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"model_number\"\r\n\r\n#001\r\n",
            b = boundary
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"luna.webp\"\r\nContent-Type: image/webp\r\n\r\nwebp-bytes\r\n--{b}--\r\n",
            b = boundary
        )
        .as_bytes(),
    );

    let (status, response) = send(
        &app.router,
        multipart_request("/admin/upload", &token, boundary, body),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let image_path = response["data"]["image_path"].as_str().unwrap();
    assert!(image_path.starts_with("001/"));
    assert!(image_path.ends_with(".webp"));
    let image_url = response["data"]["image_url"].as_str().unwrap();
    assert_eq!(image_url, format!("http://localhost:3000/uploads/{}", image_path));
    assert!(app.uploads_dir.path().join(image_path).exists());
}

#[tokio::test]
async fn upload_rejects_disallowed_mime_types() {
    let app = setup().await;
    let token = admin_token();
    let boundary = "test-boundary";
    let body = file_part(boundary, "notes.txt", "text/plain", b"hello");

    let (status, response) = send(
        &app.router,
        multipart_request("/admin/upload", &token, boundary, body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["error"],
        json!("Only JPG, PNG, and WebP files are allowed")
    );
}

#[tokio::test]
async fn upload_rejects_files_over_the_size_cap() {
    let app = setup().await;
    let token = admin_token();
    let boundary = "test-boundary";
    let oversized = vec![b'a'; 5 * 1024 * 1024 + 1];
    let body = file_part(boundary, "big.webp", "image/webp", &oversized);

    let (status, response) = send(
        &app.router,
        multipart_request("/admin/upload", &token, boundary, body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], json!("File size exceeds 5MB limit"));
}

#[tokio::test]
async fn upload_requires_a_file_field() {
    let app = setup().await;
    let token = admin_token();
    let boundary = "test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"model_number\"\r\n\r\n#001\r\n--{b}--\r\n",
        b = boundary
    )
    .into_bytes();

    let (status, response) = send(
        &app.router,
        multipart_request("/admin/upload", &token, boundary, body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], json!("No file provided"));
}

// ── 주문 ──

#[tokio::test]
async fn checkout_builds_whatsapp_deep_link() {
    let app = setup().await;
    let body = json!({
        "items": [{
            "id": "s1", "model_number": "#001",
            "name_es": "Calco Luna", "name_en": "Moon Sticker",
            "slug": "calco-luna", "product_type": "calco",
            "base_type": "base_blanca", "price_ars": 1500,
            "image_url": null, "quantity": 2, "max_stock": 10
        }],
        "locale": "es",
        "name": "Ana"
    });

    let (status, response) =
        send(&app.router, json_request("POST", "/checkout", None, &body)).await;

    assert_eq!(status, StatusCode::OK);
    let message = response["data"]["message"].as_str().unwrap();
    assert!(message.contains("*Calcos*"));
    assert!(message.contains("- #001 Calco Luna (Base Blanca) x2 = $ 3.000"));
    assert!(message.contains("*Total: $ 3.000*"));
    assert!(message.contains("Nombre: Ana"));
    let url = response["data"]["url"].as_str().unwrap();
    assert!(url.starts_with("https://wa.me/5492994000000?text="));
}

#[tokio::test]
async fn checkout_rejects_an_empty_cart() {
    let app = setup().await;
    let body = json!({ "items": [], "locale": "en" });

    let (status, _) = send(&app.router, json_request("POST", "/checkout", None, &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── 인증 ──

#[tokio::test]
async fn login_issues_tokens_and_me_returns_the_account() {
    let app = setup().await;

    // 관리자 계정을 심습니다 (부트스트랩과 같은 방식)
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(b"super-secret", &salt)
        .unwrap()
        .to_string();
    let user_id = uuid::Uuid::now_v7().to_string();
    calcosnqn::db::users::create_user(&app.pool, &user_id, "ana", None, &hash, "admin")
        .await
        .unwrap();

    // 잘못된 비밀번호
    let (status, _) = send(
        &app.router,
        json_request("POST", "/auth/login", None, &json!({ "username": "ana", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 정상 로그인
    let (status, response) = send(
        &app.router,
        json_request("POST", "/auth/login", None, &json!({ "username": "ana", "password": "super-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access_token = response["data"]["access_token"].as_str().unwrap().to_string();

    // 발급된 토큰으로 내 정보 조회
    let mut request = get_request("/auth/me");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", access_token).parse().unwrap(),
    );
    let (status, response) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["username"], json!("ana"));
}
