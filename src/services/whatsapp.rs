//! # WhatsApp 주문 메시지 빌더
//!
//! 결제 모듈 대신 WhatsApp 딥링크로 주문을 받습니다.
//! 장바구니 내용을 사람이 읽을 주문 메시지로 변환하고,
//! 메시지가 미리 채워진 채팅을 여는 `wa.me` URL을 만듭니다.
//!
//! 이 모듈의 함수들은 순수 함수입니다 — DB나 네트워크를 건드리지 않습니다.

use crate::models::{CartItem, ProductType};
use crate::services::i18n::{
    base_type_label, format_price, localized_name, product_type_label, Locale,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// JS의 encodeURIComponent와 같은 문자 집합:
/// 영숫자와 - _ . ! ~ * ' ( ) 만 인코딩하지 않습니다.
const MESSAGE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 메시지에서 상품 종류 그룹이 나타나는 고정 순서
const PRODUCT_TYPE_ORDER: [ProductType; 3] =
    [ProductType::Calco, ProductType::Jarro, ProductType::Iman];

/// 주문자가 선택적으로 남기는 정보
#[derive(Debug, Default, Clone)]
pub struct CheckoutInfo {
    pub name: Option<String>,
    pub city: Option<String>,
}

/// 장바구니 항목들을 주문 메시지로 변환합니다.
///
/// ## 메시지 구조
/// 1. 인사말 (로케일별)
/// 2. 상품 종류별 그룹 — 비어 있지 않은 그룹만, 굵은 제목(`*...*`)과 함께
///    항목 줄: `- {모델번호} {이름} ({바탕 라벨})? x{수량} = {소계}`
///    바탕 라벨 괄호는 base_type이 없는 상품(머그컵/마그넷)에서는 생략됩니다.
/// 3. 굵은 합계 줄 — 그룹과 무관하게 전체 항목의 단가×수량 합
/// 4. 주문자 이름/도시 (주어진 경우에만)
pub fn build_message(items: &[CartItem], locale: Locale, info: Option<&CheckoutInfo>) -> String {
    let header = match locale {
        Locale::Es => "Hola! Quiero hacer un pedido:",
        Locale::En => "Hi! I would like to place an order:",
    };

    let mut parts: Vec<String> = vec![header.to_string()];

    for product_type in PRODUCT_TYPE_ORDER {
        let group: Vec<&CartItem> = items
            .iter()
            .filter(|item| item.product_type == product_type)
            .collect();
        if group.is_empty() {
            continue;
        }

        parts.push(String::new());
        parts.push(format!("*{}*", product_type_label(product_type, locale)));

        for item in group {
            let name = localized_name(item, locale);
            let base_label = item
                .base_type
                .map(|base| format!(" ({})", base_type_label(base, locale)))
                .unwrap_or_default();
            let subtotal = format_price(item.subtotal() as f64);
            parts.push(format!(
                "- {} {}{} x{} = {}",
                item.model_number, name, base_label, item.quantity, subtotal
            ));
        }
    }

    let total: i64 = items.iter().map(|item| item.subtotal()).sum();
    parts.push(String::new());
    parts.push(format!("*Total: {}*", format_price(total as f64)));

    if let Some(info) = info {
        if let Some(name) = info.name.as_deref().filter(|n| !n.is_empty()) {
            let label = match locale {
                Locale::Es => "Nombre",
                Locale::En => "Name",
            };
            parts.push(String::new());
            parts.push(format!("{}: {}", label, name));
        }
        if let Some(city) = info.city.as_deref().filter(|c| !c.is_empty()) {
            let label = match locale {
                Locale::Es => "Ciudad",
                Locale::En => "City",
            };
            parts.push(format!("{}: {}", label, city));
        }
    }

    parts.join("\n")
}

/// 메시지를 percent 인코딩하여 WhatsApp 딥링크를 만듭니다.
pub fn build_url(phone: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        phone,
        utf8_percent_encode(message, MESSAGE_ENCODE_SET)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BaseType;

    fn item(id: &str, product_type: ProductType, price: i64, quantity: i64) -> CartItem {
        CartItem {
            id: id.to_string(),
            model_number: format!("#00{}", id),
            name_es: format!("Calco {}", id),
            name_en: format!("Sticker {}", id),
            slug: format!("calco-{}", id),
            product_type,
            base_type: Some(BaseType::BaseBlanca),
            price_ars: price,
            image_url: None,
            quantity,
            max_stock: 10,
        }
    }

    #[test]
    fn groups_items_by_product_type_in_fixed_order() {
        // 장바구니에는 머그컵이 먼저 담겨 있어도 메시지에서는 calco 그룹이 먼저
        let items = vec![
            item("1", ProductType::Jarro, 2000, 1),
            item("2", ProductType::Calco, 1500, 1),
        ];
        let message = build_message(&items, Locale::Es, None);

        let calcos_pos = message.find("*Calcos*").expect("calcos header");
        let jarros_pos = message.find("*Jarros*").expect("jarros header");
        assert!(calcos_pos < jarros_pos);
        // 빈 그룹(Imanes)의 제목은 나타나지 않습니다
        assert!(!message.contains("*Imanes*"));
    }

    #[test]
    fn item_line_contains_model_name_base_quantity_and_subtotal() {
        let items = vec![item("1", ProductType::Calco, 1500, 2)];
        let message = build_message(&items, Locale::Es, None);

        assert!(message.contains("- #001 Calco 1 (Base Blanca) x2 = $ 3.000"));
    }

    #[test]
    fn base_label_is_omitted_without_base_type() {
        let mut mug = item("1", ProductType::Jarro, 2000, 1);
        mug.base_type = None;
        let message = build_message(&[mug], Locale::En, None);

        assert!(message.contains("- #001 Sticker 1 x1 = $ 2.000"));
        assert!(!message.contains("("));
    }

    #[test]
    fn total_sums_all_groups() {
        let items = vec![
            item("1", ProductType::Calco, 1000, 2),
            item("2", ProductType::Iman, 2500, 1),
        ];
        let message = build_message(&items, Locale::Es, None);

        assert!(message.contains("*Total: $ 4.500*"));
    }

    #[test]
    fn customer_lines_only_when_supplied() {
        let items = vec![item("1", ProductType::Calco, 1500, 1)];

        let message = build_message(&items, Locale::Es, None);
        assert!(!message.contains("Nombre:"));

        let info = CheckoutInfo {
            name: Some("Ana".to_string()),
            city: Some("Neuquén".to_string()),
        };
        let message = build_message(&items, Locale::Es, Some(&info));
        assert!(message.contains("Nombre: Ana"));
        assert!(message.contains("Ciudad: Neuquén"));

        let info = CheckoutInfo {
            name: Some(String::new()),
            city: None,
        };
        let message = build_message(&items, Locale::En, Some(&info));
        assert!(!message.contains("Name:"));
    }

    #[test]
    fn locale_changes_header_and_labels() {
        let items = vec![item("1", ProductType::Calco, 1500, 1)];
        let message = build_message(&items, Locale::En, None);

        assert!(message.starts_with("Hi! I would like to place an order:"));
        assert!(message.contains("*Decals*"));
        assert!(message.contains("(White Base)"));
    }

    #[test]
    fn url_is_percent_encoded_deep_link() {
        let url = build_url("5492994000000", "Hola! Quiero\nun pedido");

        assert!(url.starts_with("https://wa.me/5492994000000?text="));
        assert!(url.contains("Hola!%20Quiero%0Aun%20pedido"));
    }
}
