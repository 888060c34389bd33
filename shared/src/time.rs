//! 时间工具函数: reservation wall-clock helpers
//!
//! Reservations carry their date as `YYYY-MM-DD` and their times as `HH:MM`
//! strings in the restaurant's local time. Everything inside the engine works
//! on `NaiveDate` / `NaiveDateTime`; conversion happens here.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{AppError, AppResult};

/// Date format used by reservation `date_string`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format used by reservation `start_time` / `end_time`
pub const TIME_FORMAT: &str = "%H:%M";

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|_| AppError::invalid_date(date))
}

/// 解析时间字符串 (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time.trim(), TIME_FORMAT).map_err(|_| AppError::invalid_time(time))
}

/// Format a date the way reservations store it
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 日期 + 时分 → 本地时间点
pub fn combine(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

/// Drop seconds and sub-second precision
pub fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

/// Smallest whole minute that is `>= at`
pub fn ceil_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    let floor = truncate_to_minute(at);
    if floor == at {
        floor
    } else {
        floor + Duration::minutes(1)
    }
}

/// Current local wall-clock time
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}
