//! Cart state
//!
//! Server-held cart per staff session. All mutation goes through the
//! named operations here — handlers never touch lines directly, which
//! keeps the quantity/stock invariants in one place:
//!
//! - a line's quantity never exceeds the item's stock at call time
//! - no zero-quantity lines
//!
//! Carts live only in memory: they are cleared on checkout and on
//! logout, never persisted.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::{MenuItem, OrderLine};

/// Cart errors surface as user-facing messages and abort the action
/// with no partial effect.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    #[error("'{0}' is out of stock")]
    OutOfStock(String),

    #[error("Only {stock} x '{name}' left in stock")]
    StockLimit { name: String, stock: i64 },

    #[error("Cart is empty")]
    Empty,
}

/// One selected menu item with quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

impl CartLine {
    pub fn subtotal(&self) -> i64 {
        self.price * self.quantity
    }
}

/// In-memory list of selected menu items
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `item`: increment if already present, else insert
    /// at quantity 1. Refused when stock is zero or the existing
    /// quantity already equals stock.
    pub fn add_item(&mut self, item: &MenuItem) -> Result<(), CartError> {
        if item.stock <= 0 {
            return Err(CartError::OutOfStock(item.name.clone()));
        }

        let item_id = item.id_string();
        match self.lines.iter_mut().find(|l| l.item_id == item_id) {
            Some(line) => {
                if line.quantity >= item.stock {
                    return Err(CartError::StockLimit {
                        name: item.name.clone(),
                        stock: item.stock,
                    });
                }
                line.quantity += 1;
            }
            None => self.lines.push(CartLine {
                item_id,
                name: item.name.clone(),
                price: item.price,
                quantity: 1,
            }),
        }
        Ok(())
    }

    /// Apply a signed quantity delta to an existing line, clamped to
    /// [0, stock]; quantity 0 removes the line. Unknown ids are a no-op.
    pub fn set_quantity(&mut self, item_id: &str, delta: i64, stock: i64) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            line.quantity = (line.quantity + delta).clamp(0, stock.max(0));
        }
        self.lines.retain(|l| l.quantity > 0);
    }

    /// Σ price×quantity over all lines
    pub fn total(&self) -> i64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Value snapshot for order creation
    pub fn to_order_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|l| OrderLine {
                item_id: l.item_id.clone(),
                name: l.name.clone(),
                price: l.price,
                quantity: l.quantity,
            })
            .collect()
    }
}

/// All live carts, keyed by staff record id
#[derive(Debug, Default)]
pub struct CartStore {
    carts: DashMap<String, Cart>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a mutation against the staff member's cart (created on first
    /// use)
    pub fn with_cart<T>(&self, staff_id: &str, f: impl FnOnce(&mut Cart) -> T) -> T {
        let mut entry = self.carts.entry(staff_id.to_string()).or_default();
        f(entry.value_mut())
    }

    /// Current cart snapshot (empty cart if none exists)
    pub fn snapshot(&self, staff_id: &str) -> Cart {
        self.carts
            .get(staff_id)
            .map(|c| c.value().clone())
            .unwrap_or_default()
    }

    /// Drop the staff member's cart (checkout success or logout)
    pub fn clear(&self, staff_id: &str) {
        self.carts.remove(staff_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Category;

    fn item(id: &str, name: &str, price: i64, stock: i64) -> MenuItem {
        MenuItem {
            id: Some(format!("menu_item:{id}").parse().unwrap()),
            name: name.to_string(),
            price,
            category: Category::Food,
            stock,
            media_url: None,
        }
    }

    #[test]
    fn add_item_inserts_then_increments() {
        let mut cart = Cart::new();
        let banh_mi = item("f2", "Bánh mì thịt", 20000, 5);

        cart.add_item(&banh_mi).unwrap();
        cart.add_item(&banh_mi).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total(), 40000);
    }

    #[test]
    fn add_item_refuses_zero_stock() {
        let mut cart = Cart::new();
        let sold_out = item("f1", "Bánh mì không", 6000, 0);

        assert_eq!(
            cart.add_item(&sold_out),
            Err(CartError::OutOfStock("Bánh mì không".to_string()))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn add_item_refuses_beyond_stock() {
        let mut cart = Cart::new();
        let scarce = item("d1", "Nước suối", 10000, 2);

        cart.add_item(&scarce).unwrap();
        cart.add_item(&scarce).unwrap();
        assert_eq!(
            cart.add_item(&scarce),
            Err(CartError::StockLimit {
                name: "Nước suối".to_string(),
                stock: 2
            })
        );
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn quantity_never_exceeds_stock_under_any_sequence() {
        let mut cart = Cart::new();
        let it = item("f3", "Bánh mì Hội An", 25000, 3);
        let id = it.id_string();

        for _ in 0..10 {
            let _ = cart.add_item(&it);
            cart.set_quantity(&id, 2, it.stock);
        }

        assert_eq!(cart.lines().len(), 1);
        assert!(cart.lines()[0].quantity <= it.stock);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        let it = item("d2", "Sting", 12000, 10);
        let id = it.id_string();

        cart.add_item(&it).unwrap();
        cart.set_quantity(&id, -1, it.stock);

        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_clamps_below_zero() {
        let mut cart = Cart::new();
        let it = item("d2", "Sting", 12000, 10);
        let id = it.id_string();

        cart.add_item(&it).unwrap();
        cart.set_quantity(&id, -5, it.stock);

        // Clamped to 0, then removed — never negative
        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.set_quantity("menu_item:ghost", 3, 10);
        assert!(cart.is_empty());
    }

    #[test]
    fn total_is_sum_of_subtotals_and_idempotent() {
        let mut cart = Cart::new();
        let a = item("f2", "Bánh mì thịt", 20000, 10);
        let b = item("d1", "Nước suối", 10000, 10);

        cart.add_item(&a).unwrap();
        cart.add_item(&a).unwrap();
        cart.add_item(&b).unwrap();

        assert_eq!(cart.total(), 2 * 20000 + 10000);
        assert_eq!(cart.total(), cart.total());
    }

    #[test]
    fn store_isolates_staff_carts() {
        let store = CartStore::new();
        let it = item("f2", "Bánh mì thịt", 20000, 10);

        store
            .with_cart("user:a", |c| c.add_item(&it))
            .unwrap();

        assert_eq!(store.snapshot("user:a").total(), 20000);
        assert!(store.snapshot("user:b").is_empty());

        store.clear("user:a");
        assert!(store.snapshot("user:a").is_empty());
    }
}
