//! # 로케일 유틸리티
//!
//! 사이트는 스페인어/영어 2개 국어로 서비스됩니다.
//! 이 모듈은 로케일에 따라 이름/설명을 고르는 함수와,
//! 아르헨티나 페소(ARS) 가격 포맷, slug 생성 유틸리티를 제공합니다.

use crate::models::{BaseType, CartItem, ProductType, Sticker, Tag};
use serde::{Deserialize, Serialize};

/// 지원 로케일. 경로 세그먼트(/es, /en)와 일치합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// 스페인어 (기본값)
    #[default]
    Es,
    /// 영어
    En,
}

/// 2개 국어 이름을 가진 타입이 구현하는 트레이트
///
/// `localized_name`이 스티커/태그/장바구니 항목을 모두 받을 수 있게 하는 접점입니다.
pub trait Bilingual {
    fn name_es(&self) -> &str;
    fn name_en(&self) -> &str;
}

impl Bilingual for Sticker {
    fn name_es(&self) -> &str {
        &self.name_es
    }
    fn name_en(&self) -> &str {
        &self.name_en
    }
}

impl Bilingual for Tag {
    fn name_es(&self) -> &str {
        &self.name_es
    }
    fn name_en(&self) -> &str {
        &self.name_en
    }
}

impl Bilingual for CartItem {
    fn name_es(&self) -> &str {
        &self.name_es
    }
    fn name_en(&self) -> &str {
        &self.name_en
    }
}

/// 로케일에 맞는 이름을 반환합니다.
pub fn localized_name(item: &impl Bilingual, locale: Locale) -> &str {
    match locale {
        Locale::Es => item.name_es(),
        Locale::En => item.name_en(),
    }
}

/// 로케일에 맞는 설명을 반환합니다. 설명이 없으면 None.
pub fn localized_description(sticker: &Sticker, locale: Locale) -> Option<&str> {
    match locale {
        Locale::Es => sticker.description_es.as_deref(),
        Locale::En => sticker.description_en.as_deref(),
    }
}

/// 바탕 종류의 로케일별 라벨
pub fn base_type_label(base_type: BaseType, locale: Locale) -> &'static str {
    match (locale, base_type) {
        (Locale::Es, BaseType::BaseBlanca) => "Base Blanca",
        (Locale::Es, BaseType::BaseHolografica) => "Base Holográfica",
        (Locale::En, BaseType::BaseBlanca) => "White Base",
        (Locale::En, BaseType::BaseHolografica) => "Holographic Base",
    }
}

/// 상품 종류의 로케일별 라벨 (주문 메시지의 그룹 제목에 사용)
pub fn product_type_label(product_type: ProductType, locale: Locale) -> &'static str {
    match (locale, product_type) {
        (Locale::Es, ProductType::Calco) => "Calcos",
        (Locale::Es, ProductType::Jarro) => "Jarros",
        (Locale::Es, ProductType::Iman) => "Imanes",
        (Locale::En, ProductType::Calco) => "Decals",
        (Locale::En, ProductType::Jarro) => "Mugs",
        (Locale::En, ProductType::Iman) => "Magnets",
    }
}

/// 가격을 아르헨티나 형식으로 포맷합니다.
///
/// 가장 가까운 정수 페소로 반올림하고, 천 단위를 `.`으로 구분하며,
/// 소수 자리는 표시하지 않습니다.
///
/// 예: `format_price(1500.99)` → `"$ 1.501"`,
///     `format_price(1000000.0)` → `"$ 1.000.000"`
pub fn format_price(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();

    // 오른쪽부터 세 자리마다 '.'을 끼워 넣습니다
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if rounded < 0 {
        format!("-$ {}", grouped)
    } else {
        format!("$ {}", grouped)
    }
}

/// 텍스트를 URL 친화적인 slug로 변환합니다.
///
/// 소문자화, 악센트 제거, 영숫자 외 문자의 `-` 치환,
/// 앞뒤 구분자 제거를 수행합니다.
///
/// 예: `slugify("Base Holográfica")` → `"base-holografica"`
pub fn slugify(text: &str) -> String {
    slug::slugify(text)
}
