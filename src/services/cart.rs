//! # 장바구니 상태 머신과 로컬 저장소
//!
//! 장바구니는 서버와 동기화되지 않는 클라이언트 소유 상태입니다.
//! `CartStore`가 유일한 변경 창구이며, 저장/복원은 명시적인 별도 단계입니다:
//! - 변경이 일어날 때마다 호출자가 `save`를 실행합니다
//! - 복원(`load`)은 시작 시 한 번, 명시적으로 실행합니다 —
//!   생성자에서 자동으로 읽지 않으므로 서버 렌더링 결과와
//!   첫 화면이 어긋나는 문제가 생기지 않습니다

use crate::error::AppError;
use crate::models::CartItem;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// 로컬 저장소의 고정 네임스페이스 키
pub const CART_STORAGE_KEY: &str = "calcosnqn-cart";

/// 장바구니: 스티커 id를 키로 하는 항목 모음
///
/// 불변식: 스티커 하나당 줄은 최대 하나, 각 줄은 1 ≤ quantity ≤ max_stock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartStore {
    items: Vec<CartItem>,
}

impl CartStore {
    /// 빈 장바구니를 생성합니다. 저장소를 읽지 않습니다 — `load` 참고.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 항목을 담습니다.
    ///
    /// 같은 id의 줄이 이미 있으면 수량을 1 올리되 `max_stock`을 넘지 않습니다.
    /// 없으면 수량 1로 새 줄을 만듭니다 (후보의 quantity 값은 무시됩니다).
    pub fn add_item(&mut self, candidate: CartItem) {
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == candidate.id) {
            existing.quantity = (existing.quantity + 1).min(existing.max_stock);
            return;
        }

        self.items.push(CartItem {
            quantity: 1,
            ..candidate
        });
    }

    /// id의 줄을 제거합니다. 없으면 아무 일도 하지 않습니다.
    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    /// 수량을 바꿉니다.
    ///
    /// - `quantity ≤ 0`: 줄을 제거합니다 (`remove_item`과 동일)
    /// - 그 외: `min(quantity, max_stock)`으로 설정
    /// - 해당 줄이 없으면 아무 일도 하지 않습니다
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity.min(item.max_stock);
        }
    }

    /// 장바구니를 비웁니다 (주문 전달 후 호출).
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// 전체 수량 합
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// 전체 금액 합 (단가 × 수량)
    pub fn total_price(&self) -> i64 {
        self.items.iter().map(|item| item.subtotal()).sum()
    }
}

/// 네임스페이스 키로 저장 파일 경로를 만듭니다.
fn storage_file(dir: &str) -> PathBuf {
    PathBuf::from(dir).join(format!("{}.json", CART_STORAGE_KEY))
}

/// 장바구니를 로컬 저장소에 직렬화합니다.
///
/// 모든 변경 후에 호출되는 것이 전제입니다.
pub async fn save(dir: &str, cart: &CartStore) -> Result<(), AppError> {
    let path = storage_file(dir);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string(cart)
        .map_err(|e| AppError::Internal(format!("Failed to serialize cart: {}", e)))?;
    fs::write(&path, json).await?;
    Ok(())
}

/// 저장된 장바구니를 복원합니다.
///
/// 저장 파일이 없으면 빈 장바구니를 반환합니다.
/// 내용이 손상되어 파싱에 실패해도 빈 장바구니로 대체합니다 —
/// 복원 실패가 사이트 사용을 막아서는 안 되기 때문입니다.
pub async fn load(dir: &str) -> Result<CartStore, AppError> {
    let path = storage_file(dir);
    if !path.exists() {
        return Ok(CartStore::new());
    }

    let json = fs::read_to_string(&path).await?;
    match serde_json::from_str(&json) {
        Ok(cart) => Ok(cart),
        Err(e) => {
            tracing::warn!("Discarding corrupt cart state: {}", e);
            Ok(CartStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaseType, ProductType};

    fn make_item(id: &str) -> CartItem {
        CartItem {
            id: id.to_string(),
            model_number: "#001".to_string(),
            name_es: "Calco Patagonia".to_string(),
            name_en: "Patagonia Sticker".to_string(),
            slug: "calco-patagonia".to_string(),
            product_type: ProductType::Calco,
            base_type: Some(BaseType::BaseBlanca),
            price_ars: 1500,
            image_url: None,
            quantity: 0, // add_item이 무시하고 1로 시작
            max_stock: 10,
        }
    }

    #[test]
    fn add_item_starts_at_quantity_one() {
        let mut cart = CartStore::new();
        cart.add_item(make_item("a"));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn add_item_increments_existing_line() {
        let mut cart = CartStore::new();
        cart.add_item(make_item("a"));
        cart.add_item(make_item("a"));

        // 줄이 두 개가 되지 않고 수량만 올라갑니다
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn add_item_clamps_to_max_stock() {
        let mut cart = CartStore::new();
        let mut item = make_item("a");
        item.max_stock = 3;
        for _ in 0..5 {
            cart.add_item(item.clone());
        }

        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn remove_item_deletes_line() {
        let mut cart = CartStore::new();
        cart.add_item(make_item("a"));

        cart.remove_item("a");
        assert!(cart.is_empty());

        // 없는 id는 조용히 무시
        cart.add_item(make_item("a"));
        cart.remove_item("missing");
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn update_quantity_sets_clamps_and_removes() {
        let mut cart = CartStore::new();
        let mut item = make_item("a");
        item.max_stock = 5;
        cart.add_item(item);

        cart.update_quantity("a", 4);
        assert_eq!(cart.items()[0].quantity, 4);

        // 상한 초과 → max_stock으로 고정
        cart.update_quantity("a", 99);
        assert_eq!(cart.items()[0].quantity, 5);

        // 없는 줄 → 변화 없음
        cart.update_quantity("missing", 2);
        assert_eq!(cart.items().len(), 1);

        // 0 이하 → 줄 제거
        cart.update_quantity("a", 0);
        assert!(cart.is_empty());

        cart.add_item(make_item("a"));
        cart.update_quantity("a", -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn totals_aggregate_all_lines() {
        let mut cart = CartStore::new();
        let mut a = make_item("a");
        a.price_ars = 1000;
        let mut b = make_item("b");
        b.price_ars = 2500;

        cart.add_item(a.clone());
        cart.add_item(b);
        cart.add_item(a); // a의 수량이 2가 됨

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), 1000 * 2 + 2500);
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let cart = CartStore::new();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), 0);
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = CartStore::new();
        cart.add_item(make_item("a"));
        cart.add_item(make_item("b"));

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn serde_round_trip_preserves_lines() {
        let mut cart = CartStore::new();
        cart.add_item(make_item("a"));
        cart.add_item(make_item("b"));
        cart.update_quantity("b", 3);

        let json = serde_json::to_string(&cart).unwrap();
        let restored: CartStore = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, cart);
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_str().unwrap();

        let mut cart = CartStore::new();
        cart.add_item(make_item("a"));
        save(dir_path, &cart).await.unwrap();

        let restored = load(dir_path).await.unwrap();
        assert_eq!(restored, cart);
    }

    #[tokio::test]
    async fn load_without_saved_state_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let restored = load(dir.path().to_str().unwrap()).await.unwrap();
        assert!(restored.is_empty());
    }

    #[tokio::test]
    async fn load_discards_corrupt_state() {
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_str().unwrap();
        tokio::fs::write(
            dir.path().join(format!("{}.json", CART_STORAGE_KEY)),
            "not json",
        )
        .await
        .unwrap();

        let restored = load(dir_path).await.unwrap();
        assert!(restored.is_empty());
    }
}
