use serde::{Deserialize, Serialize};

/// Последняя заявка для бегущей строки
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentLog {
    pub name: String,
    pub business: String,
    pub date: String,
}

/// Сводная статистика посещений и заявок
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitStats {
    #[serde(rename = "totalVisitCount", default)]
    pub total_visit_count: u64,
    #[serde(rename = "todayVisitCount", default)]
    pub today_visit_count: u64,
    #[serde(rename = "quoteCount", default)]
    pub quote_count: u64,
    #[serde(rename = "recentLogs", default)]
    pub recent_logs: Vec<RecentLog>,
}

/// Ответ на `recordVisit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitAck {
    pub ok: bool,
}

/// Скрыть середину имени: "홍길동" -> "홍*동", "김철" -> "김*"
pub fn mask_name(name: &str) -> String {
    let chars: Vec<char> = name.trim().chars().collect();
    match chars.len() {
        0 => String::new(),
        1 => chars[0].to_string(),
        2 => format!("{}*", chars[0]),
        n => {
            let mut masked = String::new();
            masked.push(chars[0]);
            masked.push_str(&"*".repeat(n - 2));
            masked.push(chars[n - 1]);
            masked
        }
    }
}
