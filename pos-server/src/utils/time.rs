//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 和统计层只接收 `i64` Unix millis 或 `NaiveDate`。

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 时间戳 (Unix millis) → 业务时区的本地日期
pub fn local_date(timestamp_millis: i64, tz: Tz) -> NaiveDate {
    millis_to_datetime(timestamp_millis, tz).date_naive()
}

/// 当前业务时区的本地日期
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// 某日期所在周的周一 (本地历法)
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(offset)
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

fn millis_to_datetime(timestamp_millis: i64, tz: Tz) -> DateTime<Tz> {
    tz.timestamp_millis_opt(timestamp_millis)
        .latest()
        .unwrap_or_else(|| Utc.timestamp_millis_opt(0).unwrap().with_timezone(&tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Ho_Chi_Minh;

    #[test]
    fn monday_of_week_handles_sunday() {
        // 2024-06-09 is a Sunday; its week starts Monday 2024-06-03
        let sunday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        assert_eq!(
            monday_of_week(sunday),
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
        );

        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(monday_of_week(monday), monday);
    }

    #[test]
    fn local_date_respects_timezone() {
        // 2024-06-01 17:30 UTC is 2024-06-02 00:30 in UTC+7
        let millis = Utc
            .with_ymd_and_hms(2024, 6, 1, 17, 30, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(
            local_date(millis, Ho_Chi_Minh),
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
        );
    }

    #[test]
    fn day_start_round_trips() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let start = day_start_millis(date, Ho_Chi_Minh);
        assert_eq!(local_date(start, Ho_Chi_Minh), date);
        assert_eq!(local_date(start - 1, Ho_Chi_Minh), date.pred_opt().unwrap());
    }
}
