use chrono::{DateTime, Utc};
use contracts::domain::a002_consultation::aggregate::{
    ConsultationRecord, ConsultationStatus, RequiredField, RowIndex, SubmitConsultationRequest,
};
use thiserror::Error;

use super::repository::{self, NewConsultation};

#[derive(Debug, Error)]
pub enum ConsultationError {
    #[error("Required fields are empty: {}", join_labels(.0))]
    MissingFields(Vec<RequiredField>),

    #[error("Total amount is out of range: {0}")]
    InvalidTotal(u64),

    #[error("Consultation row {0} not found")]
    RowNotFound(RowIndex),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

fn join_labels(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Строка для вставки: проверка полей, снимок выбора в JSON, статус «대기중»
pub fn build_row(
    request: &SubmitConsultationRequest,
    now: DateTime<Utc>,
) -> Result<NewConsultation, ConsultationError> {
    let missing = request.customer_info.missing_fields();
    if !missing.is_empty() {
        return Err(ConsultationError::MissingFields(missing));
    }
    let total_amount = i64::try_from(request.total_amount)
        .map_err(|_| ConsultationError::InvalidTotal(request.total_amount))?;

    let snapshot_total: u64 = request
        .selected_services
        .iter()
        .map(|s| s.subtotal())
        .sum();
    if snapshot_total != request.total_amount {
        tracing::warn!(
            "Submitted total {} differs from snapshot sum {}",
            request.total_amount,
            snapshot_total
        );
    }

    let selected_services = serde_json::to_string(&request.selected_services)
        .map_err(|e| anyhow::anyhow!("Failed to serialize selected services: {}", e))?;

    let info = &request.customer_info;
    Ok(NewConsultation {
        timestamp: now,
        name: info.name.clone(),
        industry: info.industry.clone(),
        phone: info.phone.clone(),
        region: info.region.clone(),
        selected_services,
        total_amount,
        status: ConsultationStatus::Waiting,
    })
}

pub async fn submit(request: &SubmitConsultationRequest) -> Result<RowIndex, ConsultationError> {
    let row = build_row(request, Utc::now())?;
    let row_index = repository::insert(row).await?;
    tracing::info!(
        "Consultation {} submitted: {} / {} / {}",
        row_index,
        request.customer_info.industry,
        request.customer_info.region,
        request.total_amount
    );
    Ok(row_index)
}

pub async fn list_all() -> anyhow::Result<Vec<ConsultationRecord>> {
    repository::list_all().await
}

pub async fn update_status(
    row_index: RowIndex,
    status: ConsultationStatus,
) -> Result<(), ConsultationError> {
    if !repository::update_status(row_index, status).await? {
        return Err(ConsultationError::RowNotFound(row_index));
    }
    tracing::info!("Consultation {} status -> {}", row_index, status);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_consultation::aggregate::{
        CustomerInfo, IndustrySummary, ServiceLine,
    };

    fn request() -> SubmitConsultationRequest {
        SubmitConsultationRequest {
            customer_info: CustomerInfo {
                name: "홍길동".into(),
                industry: "카페".into(),
                phone: "010-1234-5678".into(),
                region: "서울".into(),
            },
            selected_services: vec![IndustrySummary {
                industry: "카페".into(),
                icon: "☕".into(),
                services: vec![ServiceLine {
                    service_name: "로고 디자인".into(),
                    option_label: "로고만".into(),
                    price: 200_000,
                }],
            }],
            total_amount: 200_000,
        }
    }

    #[test]
    fn test_build_row() {
        let now: DateTime<Utc> = "2025-03-01T10:00:00Z".parse().unwrap();
        let row = build_row(&request(), now).unwrap();
        assert_eq!(row.status, ConsultationStatus::Waiting);
        assert_eq!(row.total_amount, 200_000);
        assert_eq!(row.timestamp, now);

        let snapshot: Vec<IndustrySummary> = serde_json::from_str(&row.selected_services).unwrap();
        assert_eq!(snapshot, request().selected_services);
    }

    #[test]
    fn test_build_row_rejects_missing_fields() {
        let mut req = request();
        req.customer_info.name.clear();
        req.customer_info.region.clear();
        match build_row(&req, Utc::now()) {
            Err(ConsultationError::MissingFields(fields)) => {
                assert_eq!(fields, vec![RequiredField::Name, RequiredField::Region])
            }
            other => panic!("unexpected: {:?}", other.map(|r| r.total_amount)),
        }
    }

    #[test]
    fn test_build_row_rejects_huge_total() {
        let mut req = request();
        req.total_amount = u64::MAX;
        assert!(matches!(
            build_row(&req, Utc::now()),
            Err(ConsultationError::InvalidTotal(_))
        ));
    }
}
