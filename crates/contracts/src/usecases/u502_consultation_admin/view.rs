use serde::{Deserialize, Serialize};

use crate::domain::a002_consultation::aggregate::{ConsultationRecord, ConsultationStatus};

/// Фильтр по статусу
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ConsultationStatus),
}

impl StatusFilter {
    /// Значение для `<select>`: "all" или код статуса
    pub fn code(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.code(),
        }
    }

    pub fn from_code(code: &str) -> Self {
        ConsultationStatus::from_code(code)
            .map(StatusFilter::Only)
            .unwrap_or(StatusFilter::All)
    }

    pub fn matches(&self, status: ConsultationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => *s == status,
        }
    }
}

/// Порядок сортировки списка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "oldest")]
    Oldest,
    #[serde(rename = "amount-high")]
    AmountHigh,
    #[serde(rename = "amount-low")]
    AmountLow,
}

impl SortOrder {
    pub fn code(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::AmountHigh => "amount-high",
            SortOrder::AmountLow => "amount-low",
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "oldest" => SortOrder::Oldest,
            "amount-high" => SortOrder::AmountHigh,
            "amount-low" => SortOrder::AmountLow,
            _ => SortOrder::Newest,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "최신순",
            SortOrder::Oldest => "오래된순",
            SortOrder::AmountHigh => "금액 높은순",
            SortOrder::AmountLow => "금액 낮은순",
        }
    }

    pub fn all() -> [SortOrder; 4] {
        [
            SortOrder::Newest,
            SortOrder::Oldest,
            SortOrder::AmountHigh,
            SortOrder::AmountLow,
        ]
    }
}

/// Параметры представления списка
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub status: StatusFilter,
    pub sort: SortOrder,
    pub search: String,
}

impl ViewQuery {
    fn matches(&self, record: &ConsultationRecord, needle: &str) -> bool {
        if !self.status.matches(record.status) {
            return false;
        }
        if needle.is_empty() {
            return true;
        }
        record.name.to_lowercase().contains(needle)
            || record.industry.to_lowercase().contains(needle)
            || record.region.to_lowercase().contains(needle)
    }
}

/// Отфильтрованное и отсортированное представление. Исходный список не меняется.
///
/// Сортировка стабильная: при равных ключах сохраняется исходный порядок.
pub fn apply_view<'a>(
    records: &'a [ConsultationRecord],
    query: &ViewQuery,
) -> Vec<&'a ConsultationRecord> {
    let needle = query.search.to_lowercase();
    let mut view: Vec<&ConsultationRecord> = records
        .iter()
        .filter(|r| query.matches(r, &needle))
        .collect();

    match query.sort {
        SortOrder::Newest => view.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::Oldest => view.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortOrder::AmountHigh => view.sort_by(|a, b| b.total_amount.cmp(&a.total_amount)),
        SortOrder::AmountLow => view.sort_by(|a, b| a.total_amount.cmp(&b.total_amount)),
    }
    view
}

/// Счётчики по статусам: всегда по полному списку
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAggregates {
    pub waiting: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub total: usize,
}

pub fn compute_aggregates(records: &[ConsultationRecord]) -> RecordAggregates {
    records
        .iter()
        .fold(RecordAggregates::default(), |mut acc, r| {
            match r.status {
                ConsultationStatus::Waiting => acc.waiting += 1,
                ConsultationStatus::InProgress => acc.in_progress += 1,
                ConsultationStatus::Completed => acc.completed += 1,
            }
            acc.total += 1;
            acc
        })
}


#[cfg(test)]
mod tests {
    use super::fixtures::{record, three_records};
    use super::*;
    use crate::domain::a002_consultation::aggregate::RowIndex;

    fn rows(view: &[&ConsultationRecord]) -> Vec<i64> {
        view.iter().map(|r| r.row_index.value()).collect()
    }

    #[test]
    fn test_aggregates_one_of_each() {
        assert_eq!(
            compute_aggregates(&three_records()),
            RecordAggregates {
                waiting: 1,
                in_progress: 1,
                completed: 1,
                total: 3
            }
        );
        assert_eq!(compute_aggregates(&[]), RecordAggregates::default());
    }

    #[test]
    fn test_sort_by_timestamp() {
        let records = three_records();
        let newest = apply_view(&records, &ViewQuery::default());
        assert_eq!(rows(&newest), vec![3, 4, 2]);

        let oldest = apply_view(
            &records,
            &ViewQuery {
                sort: SortOrder::Oldest,
                ..ViewQuery::default()
            },
        );
        assert_eq!(rows(&oldest), vec![2, 4, 3]);
    }

    #[test]
    fn test_amount_sort_is_stable_both_ways() {
        let records = vec![
            record(1, "a", ConsultationStatus::Waiting, 300, "2025-01-01T00:00:00Z"),
            record(2, "b", ConsultationStatus::Waiting, 100, "2025-01-01T00:00:00Z"),
            record(3, "c", ConsultationStatus::Waiting, 300, "2025-01-01T00:00:00Z"),
            record(4, "d", ConsultationStatus::Waiting, 200, "2025-01-01T00:00:00Z"),
            record(5, "e", ConsultationStatus::Waiting, 100, "2025-01-01T00:00:00Z"),
        ];
        let high = apply_view(
            &records,
            &ViewQuery {
                sort: SortOrder::AmountHigh,
                ..ViewQuery::default()
            },
        );
        let low = apply_view(
            &records,
            &ViewQuery {
                sort: SortOrder::AmountLow,
                ..ViewQuery::default()
            },
        );

        let high_prices: Vec<u64> = high.iter().map(|r| r.total_amount).collect();
        let mut low_prices: Vec<u64> = low.iter().map(|r| r.total_amount).collect();
        low_prices.reverse();
        assert_eq!(high_prices, low_prices);

        // равные суммы сохраняют исходный относительный порядок в обоих направлениях
        assert_eq!(rows(&high), vec![1, 3, 4, 2, 5]);
        assert_eq!(rows(&low), vec![2, 5, 4, 1, 3]);
    }

    #[test]
    fn test_filter_and_search() {
        let mut records = three_records();
        records[1].region = "Busan".into();

        let waiting = apply_view(
            &records,
            &ViewQuery {
                status: StatusFilter::Only(ConsultationStatus::Waiting),
                ..ViewQuery::default()
            },
        );
        assert_eq!(rows(&waiting), vec![2]);

        let by_region = apply_view(
            &records,
            &ViewQuery {
                search: "BUS".into(),
                ..ViewQuery::default()
            },
        );
        assert_eq!(rows(&by_region), vec![3]);

        let by_name = apply_view(
            &records,
            &ViewQuery {
                search: "par".into(),
                ..ViewQuery::default()
            },
        );
        assert_eq!(rows(&by_name), vec![4]);

        let by_industry = apply_view(
            &records,
            &ViewQuery {
                search: "카페".into(),
                status: StatusFilter::Only(ConsultationStatus::Completed),
                ..ViewQuery::default()
            },
        );
        assert_eq!(rows(&by_industry), vec![4]);
    }

    #[test]
    fn test_apply_view_is_idempotent_and_pure() {
        let records = three_records();
        let before = records.clone();
        let query = ViewQuery {
            sort: SortOrder::AmountLow,
            search: "e".into(),
            ..ViewQuery::default()
        };
        let first = rows(&apply_view(&records, &query));
        let second = rows(&apply_view(&records, &query));
        assert_eq!(first, second);
        assert_eq!(records, before);
        assert_eq!(records[0].row_index, RowIndex(2));
    }

    #[test]
    fn test_select_codes() {
        assert_eq!(StatusFilter::from_code("all"), StatusFilter::All);
        assert_eq!(
            StatusFilter::from_code("완료"),
            StatusFilter::Only(ConsultationStatus::Completed)
        );
        for order in SortOrder::all() {
            assert_eq!(SortOrder::from_code(order.code()), order);
        }
    }
}
