//! Order API Module
//!
//! 购物车操作、结账和订单历史。
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders/cart | GET / DELETE | 查看 / 清空当前购物车 |
//! | /api/orders/cart/items | POST | 加一件商品 |
//! | /api/orders/cart/items/{item_id} | PUT | 调整数量 (±delta) |
//! | /api/orders/checkout | POST | 结账 |
//! | /api/orders | GET | 订单历史 (管理员全部，员工本人) |
//! | /api/orders/{id} | GET | 单个订单 |

mod handler;

use axum::{Router, routing::get, routing::post, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/cart", get(handler::get_cart).delete(handler::clear_cart))
        .route("/cart/items", post(handler::add_to_cart))
        .route("/cart/items/{item_id}", put(handler::set_quantity))
        .route("/checkout", post(handler::checkout))
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
}
