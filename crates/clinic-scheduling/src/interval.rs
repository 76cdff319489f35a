//! 间隔解析
//!
//! 从自由文本中提取 "N 天" 形式的间隔，无法识别时回退到默认天数。

use regex::Regex;
use std::sync::LazyLock;

/// 解析失败时的默认间隔天数
pub const DEFAULT_INTERVAL_DAYS: u32 = 7;

static DAYS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:dias?|days?)\b").expect("interval pattern is valid")
});

/// 解析间隔天数，失败时返回 7
pub fn parse_interval_days(text: &str) -> u32 {
    parse_interval_days_or(text, DEFAULT_INTERVAL_DAYS)
}

/// 解析间隔天数，失败或为零时返回 `fallback`
pub fn parse_interval_days_or(text: &str, fallback: u32) -> u32 {
    DAYS_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
        .filter(|days| *days > 0)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_interval_days("15 dias"), 15);
        assert_eq!(parse_interval_days("1 dia"), 1);
        assert_eq!(parse_interval_days("30DIAS"), 30);
        assert_eq!(parse_interval_days("a cada 21 Dias"), 21);
        assert_eq!(parse_interval_days("10 days"), 10);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(parse_interval_days("entre 15 dias e 30 dias"), 15);
        // 数字后不是"天"的不计入
        assert_eq!(parse_interval_days("2 semanas ou 20 dias"), 20);
    }

    #[test]
    fn test_default_on_unparseable() {
        assert_eq!(parse_interval_days(""), 7);
        assert_eq!(parse_interval_days("algumas semanas"), 7);
        assert_eq!(parse_interval_days("2 semanas"), 7);
        assert_eq!(parse_interval_days("diariamente"), 7);
    }

    #[test]
    fn test_always_positive() {
        assert_eq!(parse_interval_days("0 dias"), 7);
        assert_eq!(parse_interval_days("99999999999999999999 dias"), 7);
        assert_eq!(parse_interval_days_or("sem intervalo", 10), 10);
    }
}
