//! Order Model
//!
//! Orders are created once at checkout and immutable thereafter. The
//! item list is a value snapshot taken at purchase time — later menu
//! edits never change past orders.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Transfer => "transfer",
        }
    }
}

/// Channel an order originated from (in-person app vs. delivery platforms)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSource {
    #[default]
    App,
    Grab,
    Shopee,
    Gojek,
    Be,
}

/// One purchased line — a snapshot of the menu item at purchase time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Menu item record id ("menu_item:xxx") the line was built from
    pub item_id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

impl OrderLine {
    pub fn subtotal(&self) -> i64 {
        self.price * self.quantity
    }
}

/// Order model matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    pub items: Vec<OrderLine>,
    pub total: i64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub timestamp: i64,
    /// Acting staff record id ("user:xxx")
    pub staff_id: String,
    pub source: OrderSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
}

impl Order {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Create order payload (server assigns id and timestamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderLine>,
    pub total: i64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub timestamp: i64,
    pub staff_id: String,
    pub source: OrderSource,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}
