use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Форматирует число с разделителями тысяч (запятыми)
///
/// # Примеры
/// ```
/// use contracts::shared::format::format_thousands;
/// assert_eq!(format_thousands(1234567), "1,234,567");
/// assert_eq!(format_thousands(42), "42");
/// ```
pub fn format_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Сумма в вонах: "1,234,567원"
pub fn format_won(amount: u64) -> String {
    format!("{}원", format_thousands(amount))
}

/// Часовой пояс отображения (KST, UTC+9)
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap_or_else(|| Utc.fix())
}

/// Дата и время заявки: "2025. 03. 01. 19:00"
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&kst()).format("%Y. %m. %d. %H:%M").to_string()
}

/// Только дата: "2025-03-01"
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&kst()).format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_format_won() {
        assert_eq!(format_won(150000), "150,000원");
        assert_eq!(format_won(0), "0원");
    }

    #[test]
    fn test_format_timestamp_kst() {
        let ts: DateTime<Utc> = "2025-03-01T10:00:00Z".parse().unwrap();
        assert_eq!(format_timestamp(&ts), "2025. 03. 01. 19:00");

        let late: DateTime<Utc> = "2025-03-01T20:30:00Z".parse().unwrap();
        assert_eq!(format_date(&late), "2025-03-02");
    }
}
