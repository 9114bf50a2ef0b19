//! 结账全流程集成测试 - 内存数据库
//!
//! 覆盖：登录查找、购物车 → 结账 → 库存扣减、通知落库

use std::time::Duration;

use pos_server::db::DbService;
use pos_server::db::models::{
    Category, MenuItemCreate, OrderSource, OrderStatus, PaymentMethod, UserCreate, UserRole,
    UserStatus,
};
use pos_server::db::repository::{
    MenuItemRepository, NotificationRepository, OrderRepository, UserRepository,
};
use pos_server::orders::CheckoutRequest;
use pos_server::{Config, ServerState};
use tokio::time::sleep;

async fn test_state() -> ServerState {
    let db = DbService::in_memory().await.unwrap().db;
    let config = Config::with_overrides("/tmp/pos-test", 0);
    ServerState::with_db(&config, db)
}

async fn seed_user(
    state: &ServerState,
    username: &str,
    role: UserRole,
    status: UserStatus,
) -> String {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .create(UserCreate {
            name: format!("NV {username}"),
            username: username.to_string(),
            password: "matkhau123".to_string(),
            role,
            status,
            phone: None,
        })
        .await
        .unwrap();
    user.id_string()
}

fn cash_checkout() -> CheckoutRequest {
    CheckoutRequest {
        payment_method: PaymentMethod::Cash,
        source: OrderSource::App,
        customer_name: None,
        customer_phone: None,
    }
}

#[tokio::test]
async fn login_lookup_accepts_username_or_phone_case_insensitive() {
    let state = test_state().await;
    let repo = UserRepository::new(state.get_db());

    let user = repo
        .create(UserCreate {
            name: "Linh".to_string(),
            username: "Linh".to_string(),
            password: "matkhau123".to_string(),
            role: UserRole::Staff,
            status: UserStatus::Active,
            phone: Some("0901234567".to_string()),
        })
        .await
        .unwrap();

    let by_username = repo.find_by_login("linh").await.unwrap().unwrap();
    assert_eq!(by_username.id_string(), user.id_string());

    let by_phone = repo.find_by_login("0901234567").await.unwrap().unwrap();
    assert_eq!(by_phone.id_string(), user.id_string());

    assert!(repo.find_by_login("khongco").await.unwrap().is_none());

    assert!(by_username.verify_password("matkhau123").unwrap());
    assert!(!by_username.verify_password("saimatkhau").unwrap());
}

#[tokio::test]
async fn checkout_persists_order_decrements_stock_and_notifies_admin() {
    let state = test_state().await;
    state.start_background_tasks();

    let admin_id = seed_user(&state, "quanly", UserRole::Admin, UserStatus::Active).await;
    let staff_id = seed_user(&state, "linh", UserRole::Staff, UserStatus::Active).await;

    let menu = MenuItemRepository::new(state.get_db());
    let banh_mi = menu
        .create(MenuItemCreate {
            name: "Bánh mì thịt nướng".to_string(),
            price: 25000,
            category: Category::Food,
            stock: 5,
            media_url: None,
        })
        .await
        .unwrap();
    let ca_phe = menu
        .create(MenuItemCreate {
            name: "Cà phê sữa đá".to_string(),
            price: 15000,
            category: Category::Drink,
            stock: 10,
            media_url: None,
        })
        .await
        .unwrap();

    state.carts.with_cart(&staff_id, |cart| {
        cart.add_item(&banh_mi).unwrap();
        cart.add_item(&banh_mi).unwrap();
        cart.add_item(&ca_phe).unwrap();
    });

    let order = state
        .checkout
        .checkout(&staff_id, "Linh", cash_checkout())
        .await
        .unwrap();

    assert_eq!(order.total, 65000);
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.staff_id, staff_id);
    assert!(state.carts.with_cart(&staff_id, |cart| cart.is_empty()));

    let banh_mi_after = menu
        .find_by_id(&banh_mi.id_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(banh_mi_after.stock, 3);
    let ca_phe_after = menu.find_by_id(&ca_phe.id_string()).await.unwrap().unwrap();
    assert_eq!(ca_phe_after.stock, 9);

    let orders = OrderRepository::new(state.get_db()).find_completed().await.unwrap();
    assert_eq!(orders.len(), 1);

    // The notification write goes through the background worker
    let notifications = NotificationRepository::new(state.get_db());
    let mut admin_inbox = Vec::new();
    for _ in 0..50 {
        admin_inbox = notifications.find_for_user(&admin_id).await.unwrap();
        if !admin_inbox.is_empty() {
            break;
        }
        sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(admin_inbox.len(), 1);
    assert!(admin_inbox[0].message.contains("65000"));
}

#[tokio::test]
async fn second_checkout_on_empty_cart_is_rejected() {
    let state = test_state().await;
    let staff_id = seed_user(&state, "linh", UserRole::Staff, UserStatus::Active).await;

    let menu = MenuItemRepository::new(state.get_db());
    let item = menu
        .create(MenuItemCreate {
            name: "Trà đá".to_string(),
            price: 5000,
            category: Category::Drink,
            stock: 3,
            media_url: None,
        })
        .await
        .unwrap();

    state
        .carts
        .with_cart(&staff_id, |cart| cart.add_item(&item).unwrap());
    state
        .checkout
        .checkout(&staff_id, "Linh", cash_checkout())
        .await
        .unwrap();

    // Cart was cleared by the first checkout
    assert!(state
        .checkout
        .checkout(&staff_id, "Linh", cash_checkout())
        .await
        .is_err());

    let orders = OrderRepository::new(state.get_db()).find_all().await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn cart_add_is_refused_beyond_available_stock() {
    let state = test_state().await;
    let staff_id = seed_user(&state, "linh", UserRole::Staff, UserStatus::Active).await;

    let menu = MenuItemRepository::new(state.get_db());
    let item = menu
        .create(MenuItemCreate {
            name: "Bánh mì chả".to_string(),
            price: 20000,
            category: Category::Food,
            stock: 2,
            media_url: None,
        })
        .await
        .unwrap();

    let results = state.carts.with_cart(&staff_id, |cart| {
        [
            cart.add_item(&item),
            cart.add_item(&item),
            cart.add_item(&item),
        ]
    });

    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(results[2].is_err());
    assert_eq!(state.carts.with_cart(&staff_id, |cart| cart.total()), 40000);
}
