//! Statistics API Handlers
//!
//! Handlers load the completed-order history and run the pure
//! reductions from [`crate::stats`]. The `date` query parameter
//! defaults to today in the business timezone.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::{OrderRepository, ShiftRepository};
use crate::stats::{self, ItemSales, StaffDayStats};
use crate::utils::{AppResult, time};

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// YYYY-MM-DD, business timezone. Defaults to today.
    pub date: Option<String>,
}

impl DateQuery {
    fn resolve(&self, state: &ServerState) -> AppResult<chrono::NaiveDate> {
        match &self.date {
            Some(date) => time::parse_date(date),
            None => Ok(time::today(state.config.timezone)),
        }
    }
}

/// Revenue summary for one date
#[derive(Debug, Serialize)]
pub struct RevenueSummary {
    pub date: String,
    /// Revenue of the calendar day
    pub day_revenue: i64,
    /// Order count of the calendar day
    pub day_orders: usize,
    /// Revenue since Monday of that week
    pub week_revenue: i64,
    /// Revenue of the calendar month
    pub month_revenue: i64,
    /// Best-selling item of the day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_seller: Option<ItemSales>,
}

/// Day / week / month revenue for one date
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<RevenueSummary>> {
    let date = query.resolve(&state)?;
    let tz = state.config.timezone;

    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_completed().await?;

    let day = stats::orders_on_day(&orders, date, tz);
    let week = stats::orders_in_week_of(&orders, date, tz);
    let month = stats::orders_in_month(&orders, date, tz);

    Ok(Json(RevenueSummary {
        date: date.format("%Y-%m-%d").to_string(),
        day_revenue: stats::revenue(&day),
        day_orders: day.len(),
        week_revenue: stats::revenue(&week),
        month_revenue: stats::revenue(&month),
        best_seller: stats::best_seller(&day),
    }))
}

/// Per-item sales of one day, best seller first
pub async fn items(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<ItemSales>>> {
    let date = query.resolve(&state)?;
    let tz = state.config.timezone;

    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_completed().await?;
    let day = stats::orders_on_day(&orders, date, tz);

    Ok(Json(stats::item_breakdown(&day)))
}

/// Per-staff order count and revenue of one day
pub async fn staff(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<StaffDayStats>>> {
    let date = query.resolve(&state)?;
    let tz = state.config.timezone;

    let orders = OrderRepository::new(state.db.clone()).find_completed().await?;
    let shifts = ShiftRepository::new(state.db.clone()).find_all().await?;

    Ok(Json(stats::staff_day_stats(&orders, &shifts, date, tz)))
}
