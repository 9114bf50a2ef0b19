//! Database models matching the SurrealDB collections
//!
//! Six collections: `user`, `menu_item`, `order`, `shift`, `check_in`,
//! `notification`.

pub mod check_in;
pub mod menu_item;
pub mod notification;
pub mod order;
pub mod serde_helpers;
pub mod shift;
pub mod user;

pub use check_in::{CheckDirection, CheckInCreate, CheckInRecord};
pub use menu_item::{Category, MenuItem, MenuItemCreate, MenuItemUpdate};
pub use notification::{Notification, NotificationCreate, NotificationKind};
pub use order::{Order, OrderCreate, OrderLine, OrderSource, OrderStatus, PaymentMethod};
pub use shift::{Shift, ShiftCreate, ShiftUpdate};
pub use user::{User, UserCreate, UserRole, UserStatus, UserUpdate};
