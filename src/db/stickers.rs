//! # 스티커 데이터베이스 쿼리 모듈
//!
//! 공개 카탈로그 조회(검색/필터/정렬/페이지네이션)와
//! 관리자용 스티커 CRUD 쿼리 함수들이 정의되어 있습니다.
//!
//! 모든 함수는 `async`이며 `SqlitePool`을 받아 데이터베이스와 상호작용합니다.
//! 여러 행을 반환하는 조회 함수는 전부 `attach_tags`를 거쳐
//! 스티커마다 연결된 태그 전체 목록을 붙여서 반환합니다.

use crate::db::tags::{attach_tags, get_tag_by_slug};
use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 카탈로그 한 페이지의 크기
pub const ITEMS_PER_PAGE: i64 = 24;
/// 홈 화면 추천(featured) 상품 상한
pub const FEATURED_LIMIT: i64 = 8;
/// 상세 페이지 관련 상품 상한
pub const RELATED_LIMIT: i64 = 4;
/// 관리자 대시보드의 재고 부족 기준
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// SELECT에 쓰는 컬럼 목록. 조회 함수마다 반복하지 않도록 상수로 둡니다.
const STICKER_COLUMNS: &str = "id, model_number, name_es, name_en, description_es, \
     description_en, slug, product_type, base_type, price_ars, stock, image_url, \
     image_path, status, is_featured, sort_order, created_at, updated_at";

/// 필터 조건을 WHERE 절 문자열과 바인딩 값 목록으로 조립합니다.
///
/// ## 조립 규칙
/// - `status = 'active'`는 항상 적용되며 호출자가 덮어쓸 수 없습니다.
/// - `product_type` / `base_type`: 값이 있으면 정확히 일치하는 행만
/// - `search`: 스페인어 이름 OR 영어 이름 OR 모델 번호에 대한
///   부분 일치 (SQLite의 LIKE는 ASCII에 대해 대소문자를 무시합니다)
/// - `tag`: slug가 일치하는 태그가 연결된 스티커만 (관계 테이블 서브쿼리)
///
/// 바인딩 값은 플레이스홀더(`?`)가 나타나는 순서 그대로 모아둡니다.
fn build_catalog_where(filter: &CatalogFilter) -> (String, Vec<String>) {
    let mut where_sql = String::from("status = 'active'");
    let mut bindings: Vec<String> = Vec::new();

    if let Some(product_type) = filter.product_type {
        where_sql.push_str(" AND product_type = ?");
        bindings.push(product_type.as_str().to_string());
    }

    if let Some(search) = &filter.search {
        if !search.is_empty() {
            where_sql.push_str(" AND (name_es LIKE ? OR name_en LIKE ? OR model_number LIKE ?)");
            let pattern = format!("%{}%", search);
            bindings.push(pattern.clone());
            bindings.push(pattern.clone());
            bindings.push(pattern);
        }
    }

    if let Some(base_type) = filter.base_type {
        where_sql.push_str(" AND base_type = ?");
        bindings.push(base_type.as_str().to_string());
    }

    if let Some(tag) = &filter.tag {
        where_sql.push_str(
            " AND id IN (SELECT st.sticker_id FROM sticker_tags st \
             JOIN tags t ON t.id = st.tag_id WHERE t.slug = ?)",
        );
        bindings.push(tag.clone());
    }

    (where_sql, bindings)
}

/// 공개 카탈로그 한 페이지를 조회합니다.
///
/// # 반환값
/// `(한 페이지의 스티커 목록, 필터 조건에 맞는 전체 행 수)`
/// 전체 행 수는 페이지네이션을 무시하고 같은 WHERE 절로 따로 셉니다.
///
/// ## 정렬
/// 한 번에 하나의 정렬 기준만 적용되며, 같은 값끼리는 id로 순서를
/// 고정합니다 (id는 UUIDv7이라 생성 순서와 일치).
///
/// ## 페이지네이션
/// 페이지 N(1부터 시작)은 `LIMIT 24 OFFSET (N-1)*24`.
/// 범위를 벗어난 페이지는 에러가 아니라 빈 목록을 반환합니다.
pub async fn list_stickers(
    pool: &SqlitePool,
    filter: &CatalogFilter,
) -> Result<(Vec<StickerWithTags>, i64), AppError> {
    let (where_sql, bindings) = build_catalog_where(filter);

    let order_sql = match filter.sort {
        Some(SortKey::PriceAsc) => "price_ars ASC, id",
        Some(SortKey::PriceDesc) => "price_ars DESC, id",
        Some(SortKey::NameAsc) => "name_es ASC, id",
        // 기본값/newest: 최신 등록순
        Some(SortKey::Newest) | None => "created_at DESC, id DESC",
    };

    let page = filter.page.unwrap_or(1);
    let offset = (page - 1) * ITEMS_PER_PAGE;

    // 전체 행 수 — 같은 WHERE 절, 페이지네이션 없음
    let count_sql = format!("SELECT COUNT(*) FROM stickers WHERE {}", where_sql);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for binding in &bindings {
        count_query = count_query.bind(binding.as_str());
    }
    let total = count_query.fetch_one(pool).await?;

    // 실제 페이지 조회
    let sql = format!(
        "SELECT {} FROM stickers WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
        STICKER_COLUMNS, where_sql, order_sql
    );
    let mut query = sqlx::query_as::<_, Sticker>(&sql);
    for binding in &bindings {
        query = query.bind(binding.as_str());
    }
    let stickers = query
        .bind(ITEMS_PER_PAGE)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let stickers = attach_tags(pool, stickers).await?;
    Ok((stickers, total))
}

/// ID로 단일 스티커를 조회합니다 (상태 무관, 태그 포함).
pub async fn get_sticker(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<StickerWithTags>, AppError> {
    let sql = format!("SELECT {} FROM stickers WHERE id = ?", STICKER_COLUMNS);
    let sticker = sqlx::query_as::<_, Sticker>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let Some(sticker) = sticker else {
        return Ok(None);
    };

    // 단일 행도 같은 매핑 함수를 거칩니다
    Ok(attach_tags(pool, vec![sticker]).await?.pop())
}

/// slug로 공개 스티커를 조회합니다 (active만, 태그 포함).
///
/// 상세 페이지 전용이라 공개 상태가 아닌 스티커는 찾지 못한 것으로 처리합니다.
pub async fn get_sticker_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Option<StickerWithTags>, AppError> {
    let sql = format!(
        "SELECT {} FROM stickers WHERE slug = ? AND status = 'active'",
        STICKER_COLUMNS
    );
    let sticker = sqlx::query_as::<_, Sticker>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    let Some(sticker) = sticker else {
        return Ok(None);
    };

    Ok(attach_tags(pool, vec![sticker]).await?.pop())
}

/// 추천(featured) 스티커를 조회합니다.
///
/// active + is_featured 조건에 sort_order 오름차순, 최대 8개.
pub async fn get_featured_stickers(
    pool: &SqlitePool,
) -> Result<Vec<StickerWithTags>, AppError> {
    let sql = format!(
        "SELECT {} FROM stickers WHERE status = 'active' AND is_featured = 1 \
         ORDER BY sort_order ASC, id LIMIT ?",
        STICKER_COLUMNS
    );
    let stickers = sqlx::query_as::<_, Sticker>(&sql)
        .bind(FEATURED_LIMIT)
        .fetch_all(pool)
        .await?;

    attach_tags(pool, stickers).await
}

/// 상세 페이지의 관련 스티커를 조회합니다.
///
/// 같은 태그를 하나 이상 공유하는 **다른** active 스티커를 최대 4개 반환합니다.
/// 태그가 하나도 없으면 임의의 다른 active 스티커 4개로 대체합니다.
///
/// 관련 상품은 페이지의 부가 콘텐츠이므로, 어떤 쿼리가 실패하더라도
/// 에러를 전파하지 않고 빈 목록으로 대체합니다.
pub async fn get_related_stickers(
    pool: &SqlitePool,
    sticker_id: &str,
    tag_ids: &[String],
) -> Vec<StickerWithTags> {
    match related_stickers_inner(pool, sticker_id, tag_ids).await {
        Ok(stickers) => stickers,
        Err(e) => {
            tracing::warn!("Failed to fetch related stickers: {}", e);
            Vec::new()
        }
    }
}

async fn related_stickers_inner(
    pool: &SqlitePool,
    sticker_id: &str,
    tag_ids: &[String],
) -> Result<Vec<StickerWithTags>, AppError> {
    // 태그가 없는 스티커: 자기 자신을 제외한 active 스티커 아무거나
    if tag_ids.is_empty() {
        let sql = format!(
            "SELECT {} FROM stickers WHERE status = 'active' AND id != ? LIMIT ?",
            STICKER_COLUMNS
        );
        let stickers = sqlx::query_as::<_, Sticker>(&sql)
            .bind(sticker_id)
            .bind(RELATED_LIMIT)
            .fetch_all(pool)
            .await?;
        return attach_tags(pool, stickers).await;
    }

    // 같은 태그를 공유하는 다른 스티커 id (중복 제거 후 상한 적용)
    let placeholders = vec!["?"; tag_ids.len()].join(", ");
    let sql = format!(
        "SELECT DISTINCT sticker_id FROM sticker_tags \
         WHERE tag_id IN ({}) AND sticker_id != ? LIMIT ?",
        placeholders
    );
    let mut query = sqlx::query_scalar::<_, String>(&sql);
    for tag_id in tag_ids {
        query = query.bind(tag_id.as_str());
    }
    let related_ids = query
        .bind(sticker_id)
        .bind(RELATED_LIMIT)
        .fetch_all(pool)
        .await?;

    if related_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; related_ids.len()].join(", ");
    let sql = format!(
        "SELECT {} FROM stickers WHERE id IN ({}) AND status = 'active'",
        STICKER_COLUMNS, placeholders
    );
    let mut query = sqlx::query_as::<_, Sticker>(&sql);
    for id in &related_ids {
        query = query.bind(id.as_str());
    }
    let stickers = query.fetch_all(pool).await?;

    attach_tags(pool, stickers).await
}

/// 태그 slug로 스티커 목록을 조회합니다.
///
/// 세 단계 조회이며, 중간 고리가 끊기면(태그 없음, 연결 없음)
/// 더 조회하지 않고 바로 빈 목록을 반환합니다.
pub async fn get_stickers_by_tag(
    pool: &SqlitePool,
    tag_slug: &str,
) -> Result<Vec<StickerWithTags>, AppError> {
    let Some(tag) = get_tag_by_slug(pool, tag_slug).await? else {
        return Ok(Vec::new());
    };

    let sticker_ids =
        sqlx::query_scalar::<_, String>("SELECT sticker_id FROM sticker_tags WHERE tag_id = ?")
            .bind(&tag.id)
            .fetch_all(pool)
            .await?;

    if sticker_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; sticker_ids.len()].join(", ");
    let sql = format!(
        "SELECT {} FROM stickers WHERE id IN ({}) AND status = 'active'",
        STICKER_COLUMNS, placeholders
    );
    let mut query = sqlx::query_as::<_, Sticker>(&sql);
    for id in &sticker_ids {
        query = query.bind(id.as_str());
    }
    let stickers = query.fetch_all(pool).await?;

    attach_tags(pool, stickers).await
}

/// 관리자용 전체 스티커 목록 (모든 상태, 최신순, 태그 포함)
pub async fn get_admin_stickers(pool: &SqlitePool) -> Result<Vec<StickerWithTags>, AppError> {
    let sql = format!(
        "SELECT {} FROM stickers ORDER BY created_at DESC, id DESC",
        STICKER_COLUMNS
    );
    let stickers = sqlx::query_as::<_, Sticker>(&sql).fetch_all(pool).await?;

    attach_tags(pool, stickers).await
}

/// 관리자 대시보드 통계를 조회합니다.
pub async fn get_dashboard_stats(pool: &SqlitePool) -> Result<DashboardStats, AppError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stickers")
        .fetch_one(pool)
        .await?;
    let active =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stickers WHERE status = 'active'")
            .fetch_one(pool)
            .await?;
    let draft =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stickers WHERE status = 'draft'")
            .fetch_one(pool)
            .await?;
    let low_stock = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM stickers WHERE status = 'active' AND stock < ?",
    )
    .bind(LOW_STOCK_THRESHOLD)
    .fetch_one(pool)
    .await?;

    Ok(DashboardStats {
        total,
        active,
        draft,
        low_stock,
    })
}

/// 새 스티커를 생성합니다.
///
/// 레코드를 삽입한 뒤 다시 조회하여 반환합니다
/// (DB 기본값이 적용된 완전한 데이터를 돌려주기 위함).
/// 태그 연결은 별도 단계로 처리합니다 — `db::tags::replace_sticker_tags` 참고.
pub async fn create_sticker(
    pool: &SqlitePool,
    id: &str,
    req: &CreateStickerRequest,
) -> Result<Sticker, AppError> {
    sqlx::query(
        r#"
        INSERT INTO stickers (id, model_number, name_es, name_en, description_es,
            description_en, slug, product_type, base_type, price_ars, stock,
            image_url, image_path, status, is_featured, sort_order)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(&req.model_number)
    .bind(&req.name_es)
    .bind(&req.name_en)
    .bind(req.description_es.as_deref())
    .bind(req.description_en.as_deref())
    .bind(&req.slug)
    .bind(req.product_type.as_str())
    .bind(req.base_type.map(|b| b.as_str()))
    .bind(req.price_ars)
    .bind(req.stock)
    .bind(req.image_url.as_deref())
    .bind(req.image_path.as_deref())
    .bind(req.status.as_str())
    .bind(req.is_featured)
    .bind(req.sort_order)
    .execute(pool)
    .await?;

    let sql = format!("SELECT {} FROM stickers WHERE id = ?", STICKER_COLUMNS);
    sqlx::query_as::<_, Sticker>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::Internal(
            "Failed to retrieve created sticker".to_string(),
        ))
}

/// 스티커를 수정합니다 (부분 업데이트 - PATCH 방식).
///
/// 요청에 포함된 필드만 업데이트하고, 나머지는 그대로 유지합니다.
/// 동적으로 SQL UPDATE 쿼리를 구성합니다.
///
/// `Option<Option<T>>` 필드는 `Some(None)`이면 해당 컬럼을 NULL로 만듭니다.
///
/// # 반환값
/// - `Ok(Some(Sticker))`: 수정 성공
/// - `Ok(None)`: 해당 ID의 스티커가 없음
pub async fn update_sticker(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateStickerRequest,
) -> Result<Option<Sticker>, AppError> {
    // 먼저 스티커가 존재하는지 확인
    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stickers WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if exists == 0 {
        return Ok(None); // 라우트 핸들러에서 404로 변환
    }

    // ── 동적 쿼리 구성 ──
    // 전달된 필드만 SET 절에 추가하고, 같은 순서로 값을 바인딩합니다.
    let mut sql =
        String::from("UPDATE stickers SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')");

    if req.model_number.is_some() {
        sql.push_str(", model_number = ?");
    }
    if req.name_es.is_some() {
        sql.push_str(", name_es = ?");
    }
    if req.name_en.is_some() {
        sql.push_str(", name_en = ?");
    }
    if req.description_es.is_some() {
        sql.push_str(", description_es = ?");
    }
    if req.description_en.is_some() {
        sql.push_str(", description_en = ?");
    }
    if req.slug.is_some() {
        sql.push_str(", slug = ?");
    }
    if req.product_type.is_some() {
        sql.push_str(", product_type = ?");
    }
    if req.base_type.is_some() {
        sql.push_str(", base_type = ?");
    }
    if req.price_ars.is_some() {
        sql.push_str(", price_ars = ?");
    }
    if req.stock.is_some() {
        sql.push_str(", stock = ?");
    }
    if req.image_url.is_some() {
        sql.push_str(", image_url = ?");
    }
    if req.image_path.is_some() {
        sql.push_str(", image_path = ?");
    }
    if req.status.is_some() {
        sql.push_str(", status = ?");
    }
    if req.is_featured.is_some() {
        sql.push_str(", is_featured = ?");
    }
    if req.sort_order.is_some() {
        sql.push_str(", sort_order = ?");
    }
    sql.push_str(" WHERE id = ?");

    // SET 절과 같은 순서로 바인딩합니다.
    // Option 값을 바인딩하면 None은 SQL NULL이 됩니다.
    let mut query = sqlx::query(&sql);
    if let Some(v) = &req.model_number {
        query = query.bind(v.as_str());
    }
    if let Some(v) = &req.name_es {
        query = query.bind(v.as_str());
    }
    if let Some(v) = &req.name_en {
        query = query.bind(v.as_str());
    }
    if let Some(v) = &req.description_es {
        query = query.bind(v.as_deref());
    }
    if let Some(v) = &req.description_en {
        query = query.bind(v.as_deref());
    }
    if let Some(v) = &req.slug {
        query = query.bind(v.as_str());
    }
    if let Some(v) = req.product_type {
        query = query.bind(v.as_str());
    }
    if let Some(v) = req.base_type {
        query = query.bind(v.map(|b| b.as_str()));
    }
    if let Some(v) = req.price_ars {
        query = query.bind(v);
    }
    if let Some(v) = req.stock {
        query = query.bind(v);
    }
    if let Some(v) = &req.image_url {
        query = query.bind(v.as_deref());
    }
    if let Some(v) = &req.image_path {
        query = query.bind(v.as_deref());
    }
    if let Some(v) = req.status {
        query = query.bind(v.as_str());
    }
    if let Some(v) = req.is_featured {
        query = query.bind(v);
    }
    if let Some(v) = req.sort_order {
        query = query.bind(v);
    }
    query = query.bind(id);

    query.execute(pool).await?;

    // 수정된 스티커를 다시 조회하여 반환 (최신 updated_at 값 포함)
    let sql = format!("SELECT {} FROM stickers WHERE id = ?", STICKER_COLUMNS);
    let sticker = sqlx::query_as::<_, Sticker>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(sticker)
}

/// 스티커의 저장된 이미지 경로를 조회합니다 (삭제 전 파일 정리용).
pub async fn get_sticker_image_path(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<String>, AppError> {
    let row = sqlx::query_scalar::<_, Option<String>>(
        "SELECT image_path FROM stickers WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    // 바깥 Option: 행 존재 여부, 안쪽 Option: 컬럼 NULL 여부
    Ok(row.flatten())
}

/// 스티커를 삭제합니다. 태그 연결은 ON DELETE CASCADE로 함께 정리됩니다.
pub async fn delete_sticker(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM stickers WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 스티커 하나의 재고를 수정합니다 (일괄 재고 수정의 한 단계).
pub async fn update_stock(pool: &SqlitePool, id: &str, stock: i64) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE stickers SET stock = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
         WHERE id = ?",
    )
    .bind(stock)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
