//! 时间计算
//!
//! 所有时间均为不带时区的本地时间，格式为 `YYYY-MM-DDTHH:mm`。

use chrono::{Days, Duration, NaiveDateTime};

/// 输出格式，精确到分钟
pub const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// 可接受的输入格式，仅精确到分钟
const ACCEPTED_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// 解析本地时间，空串或无法解析时返回 `None`
pub fn parse_local(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// 格式化为本地时间字符串
pub fn format_local(value: &NaiveDateTime) -> String {
    value.format(LOCAL_FORMAT).to_string()
}

/// 计算结束时间 = 开始时间 + 时长；开始时间无效时返回空串
pub fn compute_end(start: &str, duration_minutes: u32) -> String {
    parse_local(start)
        .and_then(|start| start.checked_add_signed(Duration::minutes(i64::from(duration_minutes))))
        .map(|end| format_local(&end))
        .unwrap_or_default()
}

/// 按自然日相加，保留一天中的时刻
pub fn add_days(value: NaiveDateTime, days: u64) -> Option<NaiveDateTime> {
    value.checked_add_days(Days::new(days))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_end() {
        assert_eq!(compute_end("2024-01-16T09:00", 30), "2024-01-16T09:30");
        assert_eq!(compute_end("2024-01-31T23:30", 60), "2024-02-01T00:30");
        assert_eq!(compute_end("2024-02-28T10:00", 0), "2024-02-28T10:00");
    }

    #[test]
    fn test_compute_end_invalid_start() {
        assert_eq!(compute_end("", 30), "");
        assert_eq!(compute_end("amanhã", 30), "");
        assert_eq!(compute_end("2024-13-01T09:00", 30), "");
    }

    #[test]
    fn test_compute_end_round_trip() {
        let start = "2024-03-09T22:15";
        for duration in [0u32, 1, 45, 90, 24 * 60, 3 * 24 * 60 + 7] {
            let end = parse_local(&compute_end(start, duration)).unwrap();
            let begin = parse_local(start).unwrap();
            assert_eq!((end - begin).num_minutes(), i64::from(duration));
        }
    }

    #[test]
    fn test_seconds_are_unparseable() {
        // 带秒的时间会破坏分钟精度的结束时间，统一视为无效
        for start in ["2024-01-01T09:00:45", "2024-01-01T09:00:00", "2024-01-01T09:00:00.000"] {
            assert!(parse_local(start).is_none());
            assert_eq!(compute_end(start, 30), "");
            assert_eq!(compute_end(start, 0), "");
        }
    }

    #[test]
    fn test_add_days_calendar_rollover() {
        let start = parse_local("2024-01-01T09:00").unwrap();
        assert_eq!(format_local(&add_days(start, 15).unwrap()), "2024-01-16T09:00");
        assert_eq!(format_local(&add_days(start, 30).unwrap()), "2024-01-31T09:00");
        assert_eq!(format_local(&add_days(start, 60).unwrap()), "2024-03-01T09:00");

        // 跨越夏令时切换日期时仍保持同一时刻
        let before_dst = parse_local("2024-03-30T08:45").unwrap();
        assert_eq!(format_local(&add_days(before_dst, 1).unwrap()), "2024-03-31T08:45");
    }

    #[test]
    fn test_parse_local_formats() {
        assert!(parse_local("2024-01-01T09:00").is_some());
        assert!(parse_local("2024-01-01 09:00").is_some());
        assert!(parse_local(" 2024-01-01T09:00 ").is_some());
        assert!(parse_local("2024-01-01").is_none());
        assert!(parse_local("   ").is_none());
    }
}
