//! Checkout service
//!
//! Turns a staff member's cart into a persisted order. The order write
//! is the only step that can fail the checkout; everything after it
//! (stock decrements, sync broadcasts, notifications) is best-effort
//! and never rolls the order back.

use std::sync::Arc;

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{info, warn};

use crate::cart::CartStore;
use crate::db::models::{
    NotificationKind, Order, OrderCreate, OrderSource, OrderStatus, PaymentMethod,
};
use crate::db::repository::{MenuItemRepository, OrderRepository, UserRepository};
use crate::notify::NotifyService;
use crate::sync::{SyncBroadcaster, resources};
use crate::utils::{AppError, AppResult};

/// Checkout parameters, everything else comes from the cart
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub source: OrderSource,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
}

#[derive(Clone)]
pub struct CheckoutService {
    orders: OrderRepository,
    menu: MenuItemRepository,
    users: UserRepository,
    carts: Arc<CartStore>,
    notify: NotifyService,
    sync: Arc<SyncBroadcaster>,
}

impl CheckoutService {
    pub fn new(
        db: Surreal<Db>,
        carts: Arc<CartStore>,
        notify: NotifyService,
        sync: Arc<SyncBroadcaster>,
    ) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            menu: MenuItemRepository::new(db.clone()),
            users: UserRepository::new(db),
            carts,
            notify,
            sync,
        }
    }

    /// Complete the checkout for one staff member's cart
    ///
    /// 1. Snapshot the cart (empty cart is a business-rule error)
    /// 2. Persist the order — failure here aborts, cart stays intact
    /// 3. Clear the cart
    /// 4. Best-effort: decrement stock per line, floored at zero
    /// 5. Best-effort: sync broadcast + staff/admin notifications
    pub async fn checkout(
        &self,
        staff_id: &str,
        staff_name: &str,
        request: CheckoutRequest,
    ) -> AppResult<Order> {
        let (items, total) = self
            .carts
            .with_cart(staff_id, |cart| (cart.to_order_lines(), cart.total()));

        if items.is_empty() {
            return Err(AppError::business_rule("Cart is empty"));
        }

        let create = OrderCreate {
            items,
            total,
            payment_method: request.payment_method,
            status: OrderStatus::Completed,
            timestamp: shared::util::now_millis(),
            staff_id: staff_id.to_string(),
            source: request.source,
            customer_name: request.customer_name,
            customer_phone: request.customer_phone,
        };

        let order = self.orders.create(create).await?;
        self.carts.with_cart(staff_id, |cart| cart.clear());

        info!(
            order = %order.id_string(),
            staff = %staff_id,
            total = order.total,
            "checkout completed"
        );

        self.apply_stock_decrements(&order).await;
        self.sync
            .publish(resources::ORDER, "created", &order.id_string(), Some(&order));
        self.fan_out_notifications(&order, staff_id, staff_name).await;

        Ok(order)
    }

    /// Decrement stock for every order line, floored at zero.
    /// A failed decrement leaves stock stale until the next manual
    /// adjustment; the order itself is already final.
    async fn apply_stock_decrements(&self, order: &Order) {
        for line in &order.items {
            match self.menu.decrement_stock(&line.item_id, line.quantity).await {
                Ok(item) => {
                    self.sync.publish(
                        resources::MENU_ITEM,
                        "updated",
                        &item.id_string(),
                        Some(&item),
                    );
                }
                Err(e) => {
                    warn!(
                        item = %line.item_id,
                        order = %order.id_string(),
                        "stock decrement failed: {e:?}"
                    );
                }
            }
        }
    }

    /// One notification for the acting staff member, one per admin.
    async fn fan_out_notifications(&self, order: &Order, staff_id: &str, staff_name: &str) {
        self.notify.send(
            staff_id.to_string(),
            format!("Đơn hàng {} VND đã hoàn tất", order.total),
            NotificationKind::Order,
        );

        let admins = match self.users.find_admins().await {
            Ok(admins) => admins,
            Err(e) => {
                warn!("could not load admins for order notification: {e:?}");
                return;
            }
        };

        let message = format!(
            "{} vừa chốt đơn {} VND",
            staff_name, order.total
        );
        for admin in &admins {
            if admin.id_string() == staff_id {
                continue;
            }
            self.notify
                .send(admin.id_string(), message.clone(), NotificationKind::Order);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{Category, MenuItemCreate};

    async fn service_with_db() -> (CheckoutService, Surreal<Db>, Arc<CartStore>) {
        let db = DbService::in_memory().await.unwrap().db;
        let carts = Arc::new(CartStore::new());
        let (notify, _rx) = NotifyService::with_capacity(8);
        let sync = Arc::new(SyncBroadcaster::default());
        let service = CheckoutService::new(db.clone(), carts.clone(), notify, sync);
        (service, db, carts)
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            payment_method: PaymentMethod::Cash,
            source: OrderSource::App,
            customer_name: None,
            customer_phone: None,
        }
    }

    #[tokio::test]
    async fn empty_cart_cannot_check_out() {
        let (service, _db, _carts) = service_with_db().await;
        let err = service
            .checkout("user:a", "Linh", request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn checkout_writes_order_clears_cart_and_decrements_stock() {
        let (service, db, carts) = service_with_db().await;

        let menu = MenuItemRepository::new(db.clone());
        let item = menu
            .create(MenuItemCreate {
                name: "Bánh mì thịt".to_string(),
                price: 20000,
                category: Category::Food,
                stock: 10,
                media_url: None,
            })
            .await
            .unwrap();

        carts
            .with_cart("user:a", |cart| {
                cart.add_item(&item).unwrap();
                cart.add_item(&item).unwrap();
            });

        let order = service.checkout("user:a", "Linh", request()).await.unwrap();
        assert_eq!(order.total, 40000);
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 2);

        assert!(carts.with_cart("user:a", |cart| cart.is_empty()));

        let after = menu.find_by_id(&item.id_string()).await.unwrap().unwrap();
        assert_eq!(after.stock, 8);
    }

    #[tokio::test]
    async fn stock_never_goes_below_zero() {
        let (service, db, carts) = service_with_db().await;

        let menu = MenuItemRepository::new(db.clone());
        let item = menu
            .create(MenuItemCreate {
                name: "Trà đá".to_string(),
                price: 5000,
                category: Category::Drink,
                stock: 1,
                media_url: None,
            })
            .await
            .unwrap();

        // Another terminal sold the last one after this cart was built
        carts.with_cart("user:a", |cart| cart.add_item(&item).unwrap());
        menu.adjust_stock(&item.id_string(), -1).await.unwrap();

        let order = service.checkout("user:a", "Linh", request()).await.unwrap();
        assert_eq!(order.total, 5000);

        let after = menu.find_by_id(&item.id_string()).await.unwrap().unwrap();
        assert_eq!(after.stock, 0);
    }
}
