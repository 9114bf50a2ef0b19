//! Statistics aggregation
//!
//! Pure reductions over the order history for the revenue views. Only
//! completed orders count. Everything is recomputed from the full list
//! on each request — at this data scale no incremental aggregate state
//! is worth carrying.
//!
//! All calendar logic runs in the business timezone (config), Monday
//! being the first day of the week.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::db::models::{Order, OrderStatus, Shift};
use crate::utils::time;

/// Per-item sales aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSales {
    pub item_id: String,
    pub name: String,
    pub quantity: i64,
    pub revenue: i64,
}

/// Per-staff aggregate for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffDayStats {
    pub staff_id: String,
    pub orders: i64,
    pub revenue: i64,
}

fn completed(orders: &[Order]) -> impl Iterator<Item = &Order> {
    orders.iter().filter(|o| o.status == OrderStatus::Completed)
}

/// Completed orders whose local calendar date equals `date`
pub fn orders_on_day<'a>(orders: &'a [Order], date: NaiveDate, tz: Tz) -> Vec<&'a Order> {
    completed(orders)
        .filter(|o| time::local_date(o.timestamp, tz) == date)
        .collect()
}

/// Completed orders on or after the Monday of the week containing `date`
pub fn orders_in_week_of<'a>(orders: &'a [Order], date: NaiveDate, tz: Tz) -> Vec<&'a Order> {
    let monday = time::monday_of_week(date);
    let week_start = time::day_start_millis(monday, tz);
    completed(orders)
        .filter(|o| o.timestamp >= week_start)
        .collect()
}

/// Completed orders whose local month and year equal those of `date`
pub fn orders_in_month<'a>(orders: &'a [Order], date: NaiveDate, tz: Tz) -> Vec<&'a Order> {
    completed(orders)
        .filter(|o| {
            let d = time::local_date(o.timestamp, tz);
            d.month() == date.month() && d.year() == date.year()
        })
        .collect()
}

/// Σ total over a selected order set
pub fn revenue(orders: &[&Order]) -> i64 {
    orders.iter().map(|o| o.total).sum()
}

/// Quantity and revenue per item identity across a selected order set,
/// sorted descending by quantity. The top entry is the best seller.
pub fn item_breakdown(orders: &[&Order]) -> Vec<ItemSales> {
    let mut by_item: BTreeMap<String, ItemSales> = BTreeMap::new();

    for order in orders {
        if order.status != OrderStatus::Completed {
            continue;
        }
        for line in &order.items {
            let entry = by_item
                .entry(line.item_id.clone())
                .or_insert_with(|| ItemSales {
                    item_id: line.item_id.clone(),
                    name: line.name.clone(),
                    quantity: 0,
                    revenue: 0,
                });
            entry.quantity += line.quantity;
            entry.revenue += line.subtotal();
        }
    }

    let mut sales: Vec<ItemSales> = by_item.into_values().collect();
    sales.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));
    sales
}

/// The top-selling item of a selected order set, if any
pub fn best_seller(orders: &[&Order]) -> Option<ItemSales> {
    item_breakdown(orders).into_iter().next()
}

/// Order count and revenue per staff id for one day
///
/// A staff id is included when it has nonzero revenue that day or
/// appears in that day's shift schedule (so scheduled staff with no
/// sales still show a zero row).
pub fn staff_day_stats(
    orders: &[Order],
    shifts: &[Shift],
    date: NaiveDate,
    tz: Tz,
) -> Vec<StaffDayStats> {
    let mut by_staff: BTreeMap<String, StaffDayStats> = BTreeMap::new();

    for order in orders_on_day(orders, date, tz) {
        let entry = by_staff
            .entry(order.staff_id.clone())
            .or_insert_with(|| StaffDayStats {
                staff_id: order.staff_id.clone(),
                orders: 0,
                revenue: 0,
            });
        entry.orders += 1;
        entry.revenue += order.total;
    }

    let date_str = date.format("%Y-%m-%d").to_string();
    for shift in shifts.iter().filter(|s| s.date == date_str) {
        for staff_id in &shift.staff_ids {
            by_staff
                .entry(staff_id.clone())
                .or_insert_with(|| StaffDayStats {
                    staff_id: staff_id.clone(),
                    orders: 0,
                    revenue: 0,
                });
        }
    }

    let mut stats: Vec<StaffDayStats> = by_staff.into_values().collect();
    stats.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.staff_id.cmp(&b.staff_id)));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{OrderLine, OrderSource, PaymentMethod};
    use chrono::TimeZone;
    use chrono_tz::Asia::Ho_Chi_Minh;

    const TZ: Tz = Ho_Chi_Minh;

    fn at(y: i32, m: u32, d: u32, h: u32) -> i64 {
        TZ.with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn order(timestamp: i64, staff: &str, lines: Vec<(&str, i64, i64)>) -> Order {
        let items: Vec<OrderLine> = lines
            .into_iter()
            .map(|(id, price, quantity)| OrderLine {
                item_id: format!("menu_item:{id}"),
                name: id.to_string(),
                price,
                quantity,
            })
            .collect();
        let total = items.iter().map(OrderLine::subtotal).sum();
        Order {
            id: None,
            items,
            total,
            payment_method: PaymentMethod::Cash,
            status: OrderStatus::Completed,
            timestamp,
            staff_id: format!("user:{staff}"),
            source: OrderSource::App,
            customer_name: None,
            customer_phone: None,
        }
    }

    fn pending(mut o: Order) -> Order {
        o.status = OrderStatus::Pending;
        o
    }

    #[test]
    fn day_aggregation_uses_local_calendar_date() {
        // 2024-06-01 23:30 local and 2024-06-02 00:30 local straddle midnight
        let orders = vec![
            order(at(2024, 6, 1, 23), "a", vec![("x", 20000, 1)]),
            order(at(2024, 6, 2, 0), "a", vec![("x", 20000, 2)]),
        ];
        let d1 = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();

        assert_eq!(revenue(&orders_on_day(&orders, d1, TZ)), 20000);
        assert_eq!(revenue(&orders_on_day(&orders, d2, TZ)), 40000);
    }

    #[test]
    fn pending_orders_are_excluded_everywhere() {
        let ts = at(2024, 6, 3, 10);
        let orders = vec![
            order(ts, "a", vec![("x", 20000, 1)]),
            pending(order(ts, "a", vec![("x", 20000, 5)])),
        ];
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

        assert_eq!(revenue(&orders_on_day(&orders, date, TZ)), 20000);
        assert_eq!(revenue(&orders_in_week_of(&orders, date, TZ)), 20000);
        assert_eq!(revenue(&orders_in_month(&orders, date, TZ)), 20000);
    }

    #[test]
    fn week_starts_monday_local_time() {
        // 2024-06-03 is a Monday
        let orders = vec![
            order(at(2024, 6, 2, 23), "a", vec![("x", 10000, 1)]), // Sunday before
            order(at(2024, 6, 3, 0), "a", vec![("x", 10000, 2)]),  // Monday 00:00
            order(at(2024, 6, 5, 12), "a", vec![("x", 10000, 3)]),
        ];
        let wednesday = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();

        assert_eq!(revenue(&orders_in_week_of(&orders, wednesday, TZ)), 50000);
    }

    #[test]
    fn per_day_sums_partition_the_month_aggregate() {
        let orders = vec![
            order(at(2024, 6, 1, 9), "a", vec![("x", 15000, 1)]),
            order(at(2024, 6, 11, 9), "a", vec![("x", 15000, 2)]),
            order(at(2024, 6, 11, 17), "b", vec![("y", 25000, 1)]),
            order(at(2024, 6, 30, 23), "b", vec![("y", 25000, 3)]),
            order(at(2024, 7, 1, 0), "b", vec![("y", 25000, 1)]), // next month
        ];
        let june = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        let month_total = revenue(&orders_in_month(&orders, june, TZ));

        let mut daily_sum = 0;
        for day in 1..=30 {
            let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
            daily_sum += revenue(&orders_on_day(&orders, date, TZ));
        }

        assert_eq!(daily_sum, month_total);
        assert_eq!(month_total, 15000 + 30000 + 25000 + 75000);
    }

    #[test]
    fn item_breakdown_sums_quantity_and_picks_best_seller() {
        let ts = at(2024, 6, 3, 10);
        let orders = vec![
            order(ts, "a", vec![("A", 20000, 2), ("B", 10000, 1)]),
            order(ts, "b", vec![("A", 20000, 1)]),
        ];
        let refs: Vec<&Order> = orders.iter().collect();

        let breakdown = item_breakdown(&refs);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].name, "A");
        assert_eq!(breakdown[0].quantity, 3);
        assert_eq!(breakdown[0].revenue, 60000);
        assert_eq!(breakdown[1].name, "B");
        assert_eq!(breakdown[1].quantity, 1);

        assert_eq!(best_seller(&refs).unwrap().name, "A");
    }

    #[test]
    fn staff_stats_include_scheduled_staff_with_zero_revenue() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let orders = vec![
            order(at(2024, 6, 3, 9), "a", vec![("x", 20000, 2)]),
            order(at(2024, 6, 3, 14), "a", vec![("x", 20000, 1)]),
        ];
        let shifts = vec![Shift {
            id: None,
            staff_ids: vec!["user:a".to_string(), "user:b".to_string()],
            date: "2024-06-03".to_string(),
            start_time: "07:00".to_string(),
            end_time: "15:00".to_string(),
            note: None,
        }];

        let stats = staff_day_stats(&orders, &shifts, date, TZ);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].staff_id, "user:a");
        assert_eq!(stats[0].orders, 2);
        assert_eq!(stats[0].revenue, 60000);
        assert_eq!(stats[1].staff_id, "user:b");
        assert_eq!(stats[1].orders, 0);
        assert_eq!(stats[1].revenue, 0);
    }

    #[test]
    fn unscheduled_staff_without_revenue_are_absent() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let orders = vec![order(at(2024, 6, 4, 9), "c", vec![("x", 20000, 1)])];

        let stats = staff_day_stats(&orders, &[], date, TZ);
        assert!(stats.is_empty());
    }
}
