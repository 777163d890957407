use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ID Type
// ============================================================================

/// Номер строки, присвоенный хранилищем. Клиент его не вычисляет и не меняет.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowIndex(pub i64);

impl RowIndex {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Status
// ============================================================================

/// Статус заявки на консультацию
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsultationStatus {
    #[serde(rename = "대기중")]
    Waiting,
    #[serde(rename = "진행중")]
    InProgress,
    #[serde(rename = "완료")]
    Completed,
}

impl ConsultationStatus {
    /// Значение, которое хранится в таблице и передаётся по сети
    pub fn code(&self) -> &'static str {
        match self {
            ConsultationStatus::Waiting => "대기중",
            ConsultationStatus::InProgress => "진행중",
            ConsultationStatus::Completed => "완료",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "대기중" => Some(ConsultationStatus::Waiting),
            "진행중" => Some(ConsultationStatus::InProgress),
            "완료" => Some(ConsultationStatus::Completed),
            _ => None,
        }
    }

    pub fn all() -> [ConsultationStatus; 3] {
        [
            ConsultationStatus::Waiting,
            ConsultationStatus::InProgress,
            ConsultationStatus::Completed,
        ]
    }
}

impl Default for ConsultationStatus {
    fn default() -> Self {
        ConsultationStatus::Waiting
    }
}

impl fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Snapshot of selected services
// ============================================================================

/// Строка снимка: выбранный вариант одной услуги
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLine {
    #[serde(rename = "serviceName")]
    pub service_name: String,
    #[serde(rename = "optionLabel")]
    pub option_label: String,
    pub price: u64,
}

/// Группа снимка по отрасли
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustrySummary {
    pub industry: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub services: Vec<ServiceLine>,
}

impl IndustrySummary {
    pub fn subtotal(&self) -> u64 {
        self.services.iter().map(|s| s.price).sum()
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// Заявка на консультацию
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationRecord {
    #[serde(rename = "rowIndex")]
    pub row_index: RowIndex,
    pub name: String,
    pub industry: String,
    pub phone: String,
    pub region: String,
    pub status: ConsultationStatus,
    #[serde(rename = "totalAmount")]
    pub total_amount: u64,
    pub timestamp: DateTime<Utc>,
    /// JSON-строка со снимком `Vec<IndustrySummary>` на момент подачи
    #[serde(rename = "selectedServices", default)]
    pub selected_services: String,
}

impl ConsultationRecord {
    /// Разобрать снимок выбранных услуг. Битый JSON даёт пустой список.
    pub fn selected_services(&self) -> Vec<IndustrySummary> {
        if self.selected_services.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str(&self.selected_services) {
            Ok(v) => v,
            Err(e) => {
                log::warn!(
                    "Failed to parse selectedServices of row {}: {}",
                    self.row_index,
                    e
                );
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Поля, обязательные при подаче заявки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequiredField {
    Name,
    Industry,
    Phone,
    Region,
}

impl RequiredField {
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::Name => "이름",
            RequiredField::Industry => "업종",
            RequiredField::Phone => "연락처",
            RequiredField::Region => "지역",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Контактные данные клиента
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub industry: String,
    pub phone: String,
    pub region: String,
}

impl CustomerInfo {
    /// Список незаполненных обязательных полей (пусто: форма валидна)
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push(RequiredField::Name);
        }
        if self.industry.is_empty() {
            missing.push(RequiredField::Industry);
        }
        if self.phone.is_empty() {
            missing.push(RequiredField::Phone);
        }
        if self.region.is_empty() {
            missing.push(RequiredField::Region);
        }
        missing
    }
}

/// Тело POST-запроса подачи заявки
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitConsultationRequest {
    #[serde(rename = "customerInfo")]
    pub customer_info: CustomerInfo,
    #[serde(rename = "selectedServices")]
    pub selected_services: Vec<IndustrySummary>,
    #[serde(rename = "totalAmount")]
    pub total_amount: u64,
}

/// Значение поля `action` у запроса смены статуса
pub const UPDATE_STATUS_ACTION: &str = "updateStatus";

/// Тело POST-запроса смены статуса
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub action: String,
    #[serde(rename = "rowIndex")]
    pub row_index: RowIndex,
    pub status: ConsultationStatus,
}

impl UpdateStatusRequest {
    pub fn new(row_index: RowIndex, status: ConsultationStatus) -> Self {
        Self {
            action: UPDATE_STATUS_ACTION.to_string(),
            row_index,
            status,
        }
    }
}

/// Конверт записи, как он приходит на POST-эндпоинт шлюза
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WriteEnvelope {
    UpdateStatus(UpdateStatusRequest),
    Submit(SubmitConsultationRequest),
}

impl WriteEnvelope {
    pub fn parse(body: &str) -> Result<Self, String> {
        let envelope: WriteEnvelope =
            serde_json::from_str(body).map_err(|e| format!("Invalid request body: {}", e))?;
        if let WriteEnvelope::UpdateStatus(req) = &envelope {
            if req.action != UPDATE_STATUS_ACTION {
                return Err(format!("Unknown action: {}", req.action));
            }
        }
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(selected: &str) -> ConsultationRecord {
        ConsultationRecord {
            row_index: RowIndex(2),
            name: "홍길동".into(),
            industry: "카페".into(),
            phone: "010-0000-0000".into(),
            region: "서울".into(),
            status: ConsultationStatus::Waiting,
            total_amount: 1000,
            timestamp: "2025-03-01T10:00:00Z".parse().unwrap(),
            selected_services: selected.into(),
        }
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&ConsultationStatus::InProgress).unwrap(),
            "\"진행중\""
        );
        for status in ConsultationStatus::all() {
            assert_eq!(ConsultationStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(ConsultationStatus::from_code("unknown"), None);
    }

    #[test]
    fn test_record_payload_shape() {
        let json = r#"{
            "rowIndex": 7, "name": "김", "industry": "식당", "phone": "010",
            "region": "부산", "status": "완료", "totalAmount": 52000,
            "timestamp": "2025-01-02T03:04:05Z",
            "selectedServices": "[{\"industry\":\"식당\",\"icon\":\"🍽️\",\"services\":[{\"serviceName\":\"메뉴\",\"optionLabel\":\"기본\",\"price\":52000}]}]"
        }"#;
        let record: ConsultationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.row_index, RowIndex(7));
        assert_eq!(record.status, ConsultationStatus::Completed);

        let snapshot = record.selected_services();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].services[0].option_label, "기본");
        assert_eq!(snapshot[0].subtotal(), 52000);
    }

    #[test]
    fn test_broken_snapshot_is_empty() {
        assert!(record("{not json").selected_services().is_empty());
        assert!(record("").selected_services().is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let info = CustomerInfo {
            name: "홍길동".into(),
            industry: "카페".into(),
            phone: String::new(),
            region: "서울".into(),
        };
        assert_eq!(info.missing_fields(), vec![RequiredField::Phone]);
        assert_eq!(CustomerInfo::default().missing_fields().len(), 4);
    }

    #[test]
    fn test_write_envelope_dispatch() {
        let update = r#"{"action":"updateStatus","rowIndex":3,"status":"진행중"}"#;
        match WriteEnvelope::parse(update).unwrap() {
            WriteEnvelope::UpdateStatus(req) => {
                assert_eq!(req.row_index, RowIndex(3));
                assert_eq!(req.status, ConsultationStatus::InProgress);
            }
            other => panic!("unexpected envelope: {:?}", other),
        }

        let submit = r#"{
            "customerInfo": {"name":"a","industry":"b","phone":"c","region":"d"},
            "selectedServices": [],
            "totalAmount": 0
        }"#;
        assert!(matches!(
            WriteEnvelope::parse(submit).unwrap(),
            WriteEnvelope::Submit(_)
        ));

        let unknown = r#"{"action":"dropTable","rowIndex":3,"status":"완료"}"#;
        assert!(WriteEnvelope::parse(unknown).is_err());
        assert!(WriteEnvelope::parse("garbage").is_err());
    }
}
