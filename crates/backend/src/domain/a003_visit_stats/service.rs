use chrono::{DateTime, TimeZone, Utc};
use contracts::domain::a002_consultation::aggregate::ConsultationRecord;
use contracts::domain::a003_visit_stats::aggregate::{mask_name, RecentLog, VisitStats};
use contracts::shared::format::{format_date, kst};

use super::repository;
use crate::domain::a002_consultation::repository as consultation_repository;

pub async fn record_visit() -> anyhow::Result<()> {
    repository::insert(Utc::now()).await
}

/// Сводка для `getStats`; `recent_limit`: длина бегущей строки
pub async fn get_stats(recent_limit: u64) -> anyhow::Result<VisitStats> {
    let total_visit_count = repository::count_all().await?;
    let today_visit_count = repository::count_since(start_of_day_kst(Utc::now())).await?;
    let quote_count = consultation_repository::count_all().await?;
    let recent_logs = consultation_repository::list_recent(recent_limit)
        .await?
        .iter()
        .map(to_recent_log)
        .collect();

    Ok(VisitStats {
        total_visit_count,
        today_visit_count,
        quote_count,
        recent_logs,
    })
}

/// Полночь текущих суток по KST, выраженная в UTC
pub fn start_of_day_kst(now: DateTime<Utc>) -> DateTime<Utc> {
    let offset = kst();
    let local_midnight = now.with_timezone(&offset).date_naive().and_hms_opt(0, 0, 0);
    local_midnight
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now)
}

/// Публичная строка: имя маскируется
pub fn to_recent_log(record: &ConsultationRecord) -> RecentLog {
    RecentLog {
        name: mask_name(&record.name),
        business: record.industry.clone(),
        date: format_date(&record.timestamp),
    }
}
