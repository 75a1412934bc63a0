// ==========================================
// TaskRay 示例数据导入器 - 日期计算
// ==========================================
// 职责: 相对日期表达式 / YYYY-MM-DD → UTC 零点毫秒时间戳
// ==========================================

use crate::domain::RelativeDate;
use chrono::{Days, NaiveDate, NaiveTime, Utc};

/// 当前 UTC 日期
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// 指定日期 UTC 零点的毫秒时间戳
pub fn start_of_day_millis(day: NaiveDate) -> i64 {
    day.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// 相对日期 → 毫秒时间戳
///
/// # 返回
/// - None: 偏移超出日期可表示范围
pub fn resolve_relative(token: RelativeDate, today: NaiveDate) -> Option<i64> {
    let day = match token {
        RelativeDate::Today => Some(today),
        RelativeDate::DaysAfter(n) => shift_days(today, n),
        RelativeDate::DaysBefore(n) => shift_days(today, n.checked_neg()?),
    }?;
    Some(start_of_day_millis(day))
}

fn shift_days(day: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = Days::new(offset.unsigned_abs());
    if offset >= 0 {
        day.checked_add_days(days)
    } else {
        day.checked_sub_days(days)
    }
}

/// `YYYY-MM-DD` → 毫秒时间戳（格式不符返回 None）
pub fn parse_calendar_date(value: &str) -> Option<i64> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .map(start_of_day_millis)
}
