//! # 태그 데이터베이스 쿼리 모듈
//!
//! 태그 CRUD 및 스티커-태그 관계를 관리하는 SQL 쿼리 함수들입니다.
//! 모든 함수는 `SqlitePool` 참조를 받아 비동기로 실행됩니다.
//!
//! ## 테이블 구조
//! - `tags`: 태그 엔티티 (id, name_es, name_en, slug)
//! - `sticker_tags`: 스티커와 태그의 다대다(N:M) 관계 테이블

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// 모든 태그를 스페인어 이름순으로 조회합니다.
pub async fn list_tags(pool: &SqlitePool) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT id, name_es, name_en, slug, created_at FROM tags ORDER BY name_es",
    )
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// ID로 태그 하나를 조회합니다.
///
/// `fetch_optional`은 결과가 0행이면 None, 1행이면 Some(Tag)을 반환합니다.
pub async fn get_tag(pool: &SqlitePool, id: &str) -> Result<Option<Tag>, AppError> {
    let tag = sqlx::query_as::<_, Tag>(
        "SELECT id, name_es, name_en, slug, created_at FROM tags WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(tag)
}

/// slug로 태그 하나를 조회합니다 (태그별 카탈로그 조회의 첫 단계).
pub async fn get_tag_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Tag>, AppError> {
    let tag = sqlx::query_as::<_, Tag>(
        "SELECT id, name_es, name_en, slug, created_at FROM tags WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(tag)
}

/// 새 태그를 생성하고 생성된 태그를 반환합니다.
///
/// ## 처리 흐름
/// 1. UUIDv7으로 고유 ID 생성 — v7은 타임스탬프 기반이라 시간순 정렬이 가능합니다
/// 2. INSERT 쿼리로 DB에 저장
/// 3. 방금 생성한 태그를 다시 조회하여 반환 (DB의 기본값이 적용된 완전한 데이터)
pub async fn create_tag(pool: &SqlitePool, req: &CreateTagRequest) -> Result<Tag, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO tags (id, name_es, name_en, slug) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(&req.name_es)
        .bind(&req.name_en)
        .bind(&req.slug)
        .execute(pool)
        .await?;

    get_tag(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created tag".to_string()))
}

/// 태그 정보를 부분 업데이트합니다.
///
/// 변경 요청에 포함된 필드만 업데이트합니다.
/// 각 필드를 개별 쿼리로 처리합니다 (간결함을 위해 동적 쿼리 빌딩 대신 사용).
///
/// ## 반환값
/// - `Ok(Some(Tag))`: 업데이트 성공, 변경된 태그 반환
/// - `Ok(None)`: 해당 ID의 태그가 존재하지 않음
pub async fn update_tag(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateTagRequest,
) -> Result<Option<Tag>, AppError> {
    // 먼저 태그 존재 여부를 확인합니다
    let tag = get_tag(pool, id).await?;
    if tag.is_none() {
        return Ok(None); // 404 처리를 라우트 핸들러에 위임
    }

    if let Some(name_es) = &req.name_es {
        sqlx::query("UPDATE tags SET name_es = ? WHERE id = ?")
            .bind(name_es)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(name_en) = &req.name_en {
        sqlx::query("UPDATE tags SET name_en = ? WHERE id = ?")
            .bind(name_en)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(slug) = &req.slug {
        sqlx::query("UPDATE tags SET slug = ? WHERE id = ?")
            .bind(slug)
            .bind(id)
            .execute(pool)
            .await?;
    }

    // 업데이트 후 최신 상태를 조회하여 반환
    get_tag(pool, id).await
}

/// ID로 태그를 삭제합니다.
///
/// `sticker_tags` 테이블에 `ON DELETE CASCADE`가 설정되어 있으므로,
/// 태그를 삭제하면 해당 태그와 스티커의 관계도 자동으로 삭제됩니다.
pub async fn delete_tag(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM tags WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 스티커의 태그 연결을 전부 교체합니다 (delete-all-then-insert 방식).
///
/// 기존 연결을 모두 지우고 주어진 목록으로 다시 연결합니다.
/// 빈 목록이면 연결이 전부 해제됩니다.
///
/// 두 단계는 하나의 트랜잭션으로 묶여 있지 않습니다. 중간에 실패하면
/// 스티커가 일시적으로 태그 없이 남을 수 있습니다.
pub async fn replace_sticker_tags(
    pool: &SqlitePool,
    sticker_id: &str,
    tag_ids: &[String],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sticker_tags WHERE sticker_id = ?")
        .bind(sticker_id)
        .execute(pool)
        .await?;

    add_sticker_tags(pool, sticker_id, tag_ids).await
}

/// 스티커에 태그들을 연결합니다.
///
/// `INSERT OR IGNORE`: 이미 동일한 (sticker_id, tag_id) 조합이 존재하면
/// 에러 없이 무시합니다 (복합 기본키 충돌 방지).
pub async fn add_sticker_tags(
    pool: &SqlitePool,
    sticker_id: &str,
    tag_ids: &[String],
) -> Result<(), AppError> {
    for tag_id in tag_ids {
        sqlx::query("INSERT OR IGNORE INTO sticker_tags (sticker_id, tag_id) VALUES (?, ?)")
            .bind(sticker_id)
            .bind(tag_id)
            .execute(pool)
            .await?;
    }

    Ok(())
}

/// 관계 테이블 JOIN 결과의 한 행: 스티커 id + 태그 컬럼들
#[derive(sqlx::FromRow)]
struct StickerTagRow {
    sticker_id: String,
    id: String,
    name_es: String,
    name_en: String,
    slug: String,
    created_at: String,
}

/// 스티커 목록에 각자의 태그 전체 목록을 붙입니다.
///
/// 여러 행을 반환하는 모든 조회 함수가 이 함수 하나를 거칩니다.
/// 스티커별로 JOIN을 반복하는 대신, 해당 id들의 관계 행을 한 번에
/// 가져와 메모리에서 분배합니다.
pub async fn attach_tags(
    pool: &SqlitePool,
    stickers: Vec<Sticker>,
) -> Result<Vec<StickerWithTags>, AppError> {
    if stickers.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; stickers.len()].join(", ");
    let sql = format!(
        "SELECT st.sticker_id, t.id, t.name_es, t.name_en, t.slug, t.created_at \
         FROM sticker_tags st JOIN tags t ON t.id = st.tag_id \
         WHERE st.sticker_id IN ({}) ORDER BY t.name_es",
        placeholders
    );
    let mut query = sqlx::query_as::<_, StickerTagRow>(&sql);
    for sticker in &stickers {
        query = query.bind(sticker.id.as_str());
    }
    let rows = query.fetch_all(pool).await?;

    // sticker_id → 태그 목록으로 그룹화
    let mut tags_by_sticker: HashMap<String, Vec<Tag>> = HashMap::new();
    for row in rows {
        tags_by_sticker
            .entry(row.sticker_id)
            .or_default()
            .push(Tag {
                id: row.id,
                name_es: row.name_es,
                name_en: row.name_en,
                slug: row.slug,
                created_at: row.created_at,
            });
    }

    Ok(stickers
        .into_iter()
        .map(|sticker| {
            let tags = tags_by_sticker.remove(&sticker.id).unwrap_or_default();
            StickerWithTags { sticker, tags }
        })
        .collect())
}
