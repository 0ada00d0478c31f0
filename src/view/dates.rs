use chrono::{DateTime, NaiveDate};

/// 把 CMS 的日期字串（RFC 3339 或 `YYYY-MM-DD`）轉成卡片上顯示的格式，例如 `Mar 05, 2025`
pub fn format_published(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%b %d, %Y").to_string())
}
