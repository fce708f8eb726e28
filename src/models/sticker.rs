//! # 스티커(상품) 모델 정의
//!
//! 카탈로그 상품인 스티커와 관련된 데이터 구조체들을 정의합니다.
//!
//! ## 구조체 역할
//! - `Sticker`: DB의 `stickers` 테이블 한 행(row)에 대응 (응답용)
//! - `StickerWithTags`: 스티커 + 연결된 태그 전체 목록
//! - `CreateStickerRequest` / `UpdateStickerRequest`: 관리자 뮤테이션 요청 본문
//! - `StockUpdate`: 일괄 재고 수정의 (id, stock) 쌍
//! - `CatalogFilter`: 공개 카탈로그의 검색/필터/정렬/페이지 조건

use crate::error::AppError;
use axum::http::Uri;
use serde::{Deserialize, Serialize};

/// 상품 종류. DB에는 소문자 문자열로 저장됩니다 (calco/jarro/iman).
///
/// `sqlx::Type` + `rename_all`: TEXT 컬럼 ↔ enum 자동 변환
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ProductType {
    /// 스티커(칼코)
    Calco,
    /// 머그컵
    Jarro,
    /// 마그넷
    Iman,
}

impl ProductType {
    /// DB 저장값/필터 바인딩에 쓰는 문자열 표현
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Calco => "calco",
            ProductType::Jarro => "jarro",
            ProductType::Iman => "iman",
        }
    }
}

/// 스티커 바탕 종류. calco에만 의미가 있고 머그컵/마그넷은 NULL입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum BaseType {
    /// 흰색 바탕
    BaseBlanca,
    /// 홀로그램 바탕
    BaseHolografica,
}

impl BaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseType::BaseBlanca => "base_blanca",
            BaseType::BaseHolografica => "base_holografica",
        }
    }
}

/// 상품 상태. 공개 카탈로그에는 `active`만 노출됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum StickerStatus {
    Active,
    Draft,
    Archived,
}

impl StickerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StickerStatus::Active => "active",
            StickerStatus::Draft => "draft",
            StickerStatus::Archived => "archived",
        }
    }
}

/// 카탈로그 정렬 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// 최신순 (기본값)
    Newest,
    /// 가격 오름차순
    PriceAsc,
    /// 가격 내림차순
    PriceDesc,
    /// 스페인어 이름 오름차순
    NameAsc,
}

/// 스티커 엔티티 — DB의 `stickers` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sticker {
    /// 고유 식별자 (UUIDv7 형식 문자열)
    pub id: String,
    /// 외부 노출용 모델 번호 (형식: # + 3자리 이상 숫자)
    pub model_number: String,
    pub name_es: String,
    pub name_en: String,
    pub description_es: Option<String>,
    pub description_en: Option<String>,
    /// URL 친화적 식별자 (유일)
    pub slug: String,
    pub product_type: ProductType,
    /// calco가 아닌 상품은 None
    pub base_type: Option<BaseType>,
    /// 가격 (ARS, 정수 — 소수 단위 없음)
    pub price_ars: i64,
    pub stock: i64,
    pub image_url: Option<String>,
    /// 업로드 루트 기준 이미지 상대 경로 (삭제 시 파일 정리에 사용)
    pub image_path: Option<String>,
    pub status: StickerStatus,
    pub is_featured: bool,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// 스티커와 연결된 태그 전체 목록을 함께 담는 응답용 구조체
///
/// `#[serde(flatten)]`: sticker의 필드들이 JSON에서 같은 레벨에 펼쳐집니다.
/// 결과: `{ ...스티커 필드들, "tags": [...] }`
#[derive(Debug, Clone, Serialize)]
pub struct StickerWithTags {
    #[serde(flatten)]
    pub sticker: Sticker,
    pub tags: Vec<crate::models::Tag>,
}

/// 스티커 생성 요청 — `POST /api/v1/stickers`의 요청 본문에 해당합니다.
///
/// `#[serde(default)]` 계열: 필드가 빠지면 기본값을 사용합니다.
/// (status → draft, stock → 0, is_featured → false, sort_order → 0)
#[derive(Debug, Deserialize)]
pub struct CreateStickerRequest {
    pub model_number: String,
    pub name_es: String,
    pub name_en: String,
    pub description_es: Option<String>,
    pub description_en: Option<String>,
    pub slug: String,
    #[serde(default = "default_product_type")]
    pub product_type: ProductType,
    pub base_type: Option<BaseType>,
    pub price_ars: i64,
    #[serde(default)]
    pub stock: i64,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    #[serde(default = "default_status")]
    pub status: StickerStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: i64,
    /// 연결할 태그 id 목록 (선택)
    pub tag_ids: Option<Vec<String>>,
}

fn default_product_type() -> ProductType {
    ProductType::Calco
}

fn default_status() -> StickerStatus {
    StickerStatus::Draft
}

impl CreateStickerRequest {
    /// 저장 전에 입력을 검증합니다.
    ///
    /// 처음으로 위반된 규칙의 메시지를 `AppError::BadRequest`로 반환하며,
    /// 검증에 실패하면 어떤 쓰기도 일어나지 않습니다.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.model_number.is_empty() {
            return Err(AppError::BadRequest("Model number is required".to_string()));
        }
        if !is_valid_model_number(&self.model_number) {
            return Err(AppError::BadRequest(
                "Model number must be like #001".to_string(),
            ));
        }
        if self.name_es.is_empty() {
            return Err(AppError::BadRequest("Spanish name is required".to_string()));
        }
        if self.name_en.is_empty() {
            return Err(AppError::BadRequest("English name is required".to_string()));
        }
        if self.slug.is_empty() {
            return Err(AppError::BadRequest("Slug is required".to_string()));
        }
        if self.price_ars <= 0 {
            return Err(AppError::BadRequest("Price must be positive".to_string()));
        }
        if self.stock < 0 {
            return Err(AppError::BadRequest("Stock cannot be negative".to_string()));
        }
        if let Some(url) = &self.image_url {
            validate_url(url)?;
        }
        if let Some(tag_ids) = &self.tag_ids {
            validate_tag_ids(tag_ids)?;
        }
        Ok(())
    }
}

/// 스티커 수정 요청 — `PATCH /api/v1/stickers/{id}`의 요청 본문에 해당합니다.
///
/// 모든 필드가 Option인 이유: PATCH는 부분 업데이트(partial update)를 의미합니다.
/// 클라이언트가 변경하고 싶은 필드만 보내면 되고, 빠진 필드는 그대로 유지됩니다.
///
/// NULL 허용 컬럼은 `Option<Option<T>>`로 받습니다:
/// None = 필드 누락 (변경 안 함), Some(None) = null (값 제거), Some(Some(v)) = 값 변경
///
/// `tag_ids`는 특별합니다: 빈 목록이라도 **주어지면** 기존 태그 연결을
/// 전부 지우고 주어진 목록으로 다시 연결합니다. 누락되면 연결을 건드리지 않습니다.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStickerRequest {
    pub model_number: Option<String>,
    pub name_es: Option<String>,
    pub name_en: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description_es: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description_en: Option<Option<String>>,
    pub slug: Option<String>,
    pub product_type: Option<ProductType>,
    #[serde(default, deserialize_with = "double_option")]
    pub base_type: Option<Option<BaseType>>,
    pub price_ars: Option<i64>,
    pub stock: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_path: Option<Option<String>>,
    pub status: Option<StickerStatus>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i64>,
    pub tag_ids: Option<Vec<String>>,
}

/// `Option<Option<T>>` 필드의 역직렬화 도우미.
///
/// 그냥 두면 serde가 null을 바깥 Option의 None으로 만들어
/// "필드 누락"과 "null"을 구분할 수 없습니다. 필드가 존재하기만 하면
/// (null 포함) 바깥을 Some으로 감싸도록 합니다.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

impl UpdateStickerRequest {
    /// 전달된 필드만 검증합니다. 규칙은 생성 요청과 동일합니다.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(model_number) = &self.model_number {
            if !is_valid_model_number(model_number) {
                return Err(AppError::BadRequest(
                    "Model number must be like #001".to_string(),
                ));
            }
        }
        if let Some(name_es) = &self.name_es {
            if name_es.is_empty() {
                return Err(AppError::BadRequest("Spanish name is required".to_string()));
            }
        }
        if let Some(name_en) = &self.name_en {
            if name_en.is_empty() {
                return Err(AppError::BadRequest("English name is required".to_string()));
            }
        }
        if let Some(slug) = &self.slug {
            if slug.is_empty() {
                return Err(AppError::BadRequest("Slug is required".to_string()));
            }
        }
        if let Some(price_ars) = self.price_ars {
            if price_ars <= 0 {
                return Err(AppError::BadRequest("Price must be positive".to_string()));
            }
        }
        if let Some(stock) = self.stock {
            if stock < 0 {
                return Err(AppError::BadRequest("Stock cannot be negative".to_string()));
            }
        }
        if let Some(Some(url)) = &self.image_url {
            validate_url(url)?;
        }
        if let Some(tag_ids) = &self.tag_ids {
            validate_tag_ids(tag_ids)?;
        }
        Ok(())
    }
}

/// 일괄 재고 수정의 항목 하나 — `PUT /api/v1/admin/stock` 본문의 배열 원소
#[derive(Debug, Clone, Deserialize)]
pub struct StockUpdate {
    pub id: String,
    pub stock: i64,
}

/// 관리자 대시보드 통계 — `GET /api/v1/admin/stats`의 응답 페이로드
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// 전체 스티커 수 (상태 무관)
    pub total: i64,
    pub active: i64,
    pub draft: i64,
    /// 재고가 기준치 미만인 active 스티커 수
    pub low_stock: i64,
}

/// 공개 카탈로그의 검색/필터/정렬/페이지 조건
///
/// URL 쿼리 문자열에서 추출됩니다.
/// 예: `GET /api/v1/stickers?search=luna&sort=price_asc&page=2`
/// 모든 필드가 선택이며, 아무것도 주지 않으면 전체 active 상품을 최신순으로 반환합니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFilter {
    /// 이름(es/en)과 모델 번호에 대한 부분 일치 검색어 (대소문자 무시)
    pub search: Option<String>,
    /// 태그 slug — 해당 태그가 연결된 스티커만
    pub tag: Option<String>,
    pub product_type: Option<ProductType>,
    pub base_type: Option<BaseType>,
    pub sort: Option<SortKey>,
    /// 페이지 번호 (1부터 시작)
    pub page: Option<i64>,
}

/// 모델 번호 형식 검사: `#` 뒤에 숫자 3자리 이상
fn is_valid_model_number(model_number: &str) -> bool {
    match model_number.strip_prefix('#') {
        Some(digits) => digits.len() >= 3 && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// 이미지 URL이 스킴을 가진 완전한 URL인지 검사합니다.
fn validate_url(url: &str) -> Result<(), AppError> {
    let valid = url
        .parse::<Uri>()
        .map(|uri| uri.scheme().is_some() && uri.authority().is_some())
        .unwrap_or(false);
    if !valid {
        return Err(AppError::BadRequest(
            "Image URL must be a valid URL".to_string(),
        ));
    }
    Ok(())
}

/// 태그 id 목록이 모두 UUID인지 검사합니다.
fn validate_tag_ids(tag_ids: &[String]) -> Result<(), AppError> {
    for tag_id in tag_ids {
        if uuid::Uuid::parse_str(tag_id).is_err() {
            return Err(AppError::BadRequest(
                "Tag id must be a valid UUID".to_string(),
            ));
        }
    }
    Ok(())
}
