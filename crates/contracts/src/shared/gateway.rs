//! Граница с удалённым шлюзом данных.
//!
//! Чтение возвращает JSON-полезную нагрузку либо объект `{ error, message }`.
//! Запись отвечает буквальной строкой `Success`, любая другая строка: отказ.

use async_trait::async_trait;
use futures::future::{select, Either};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::domain::a001_service_catalog::aggregate::ServiceCatalog;
use crate::domain::a002_consultation::aggregate::{
    ConsultationRecord, SubmitConsultationRequest, UpdateStatusRequest,
};
use crate::domain::a003_visit_stats::aggregate::VisitStats;
use crate::shared::error::GatewayError;

/// Ответ шлюза на успешную запись
pub const SUCCESS_TEXT: &str = "Success";

/// Таймаут чтения по умолчанию
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 8_000;

/// Операции чтения шлюза (значение параметра `action`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GatewayAction {
    GetServiceData,
    GetConsultations,
    GetStats,
    RecordVisit,
}

impl GatewayAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayAction::GetServiceData => "getServiceData",
            GatewayAction::GetConsultations => "getConsultations",
            GatewayAction::GetStats => "getStats",
            GatewayAction::RecordVisit => "recordVisit",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "getServiceData" => Some(GatewayAction::GetServiceData),
            "getConsultations" => Some(GatewayAction::GetConsultations),
            "getStats" => Some(GatewayAction::GetStats),
            "recordVisit" => Some(GatewayAction::RecordVisit),
            _ => None,
        }
    }

    /// Требует ли операция токен администратора
    pub fn requires_admin(&self) -> bool {
        matches!(self, GatewayAction::GetConsultations)
    }
}

/// Ошибочная полезная нагрузка чтения
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: bool,
    pub message: String,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}

/// Квитанция записи
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteAck {
    Success,
    Failure(String),
}

impl WriteAck {
    /// Успех: только точное совпадение с `Success`
    pub fn from_text(text: &str) -> Self {
        if text == SUCCESS_TEXT {
            WriteAck::Success
        } else {
            WriteAck::Failure(text.to_string())
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            WriteAck::Success => SUCCESS_TEXT,
            WriteAck::Failure(text) => text,
        }
    }

    pub fn into_result(self) -> Result<(), GatewayError> {
        match self {
            WriteAck::Success => Ok(()),
            WriteAck::Failure(text) => Err(GatewayError::Rejected(text)),
        }
    }
}

/// Разобрать ответ операции чтения.
///
/// Объект с полем `error` (true или строка) превращается в `GatewayError::Rejected`.
pub fn decode_read_payload<T: DeserializeOwned>(text: &str) -> Result<T, GatewayError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| GatewayError::Malformed(e.to_string()))?;

    if let Some(obj) = value.as_object() {
        let flagged = match obj.get("error") {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(_)) => true,
            _ => false,
        };
        if flagged {
            let message = obj
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| obj.get("error").and_then(|e| e.as_str()))
                .unwrap_or("unknown error")
                .to_string();
            return Err(GatewayError::Rejected(message));
        }
    }

    serde_json::from_value(value).map_err(|e| GatewayError::Malformed(e.to_string()))
}

/// Запрос с дедлайном: если `timer` завершится раньше, запрос отбрасывается.
///
/// Таймер передаёт вызывающий код (gloo-timers в браузере, tokio в тестах).
pub async fn with_deadline<T, F, S>(request: F, timer: S, after_ms: u64) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
    S: Future<Output = ()>,
{
    futures::pin_mut!(request);
    futures::pin_mut!(timer);
    match select(request, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(GatewayError::Timeout { after_ms }),
    }
}

/// Клиент шлюза данных
#[async_trait(?Send)]
pub trait QuoteGateway {
    async fn fetch_service_catalog(&self) -> Result<ServiceCatalog, GatewayError>;

    async fn fetch_consultations(&self) -> Result<Vec<ConsultationRecord>, GatewayError>;

    async fn fetch_stats(&self) -> Result<VisitStats, GatewayError>;

    async fn record_visit(&self) -> Result<(), GatewayError>;

    async fn submit_consultation(
        &self,
        request: &SubmitConsultationRequest,
    ) -> Result<WriteAck, GatewayError>;

    async fn update_status(&self, request: &UpdateStatusRequest) -> Result<WriteAck, GatewayError>;
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;

    /// Шлюз в памяти: отдаёт заранее заданные ответы и запоминает записи
    #[derive(Default)]
    pub struct FakeGateway {
        pub catalog: RefCell<Option<Result<ServiceCatalog, GatewayError>>>,
        pub consultations: RefCell<Option<Result<Vec<ConsultationRecord>, GatewayError>>>,
        pub stats: RefCell<Option<Result<VisitStats, GatewayError>>>,
        pub write_reply: RefCell<Option<Result<WriteAck, GatewayError>>>,
        pub submitted: RefCell<Vec<SubmitConsultationRequest>>,
        pub status_updates: RefCell<Vec<UpdateStatusRequest>>,
        pub visits: RefCell<u32>,
    }

    impl FakeGateway {
        pub fn replying(ack: Result<WriteAck, GatewayError>) -> Self {
            let gateway = Self::default();
            *gateway.write_reply.borrow_mut() = Some(ack);
            gateway
        }

        fn write(&self) -> Result<WriteAck, GatewayError> {
            self.write_reply
                .borrow()
                .clone()
                .unwrap_or(Ok(WriteAck::Success))
        }
    }

    #[async_trait(?Send)]
    impl QuoteGateway for FakeGateway {
        async fn fetch_service_catalog(&self) -> Result<ServiceCatalog, GatewayError> {
            self.catalog
                .borrow()
                .clone()
                .unwrap_or_else(|| Ok(ServiceCatalog::default()))
        }

        async fn fetch_consultations(&self) -> Result<Vec<ConsultationRecord>, GatewayError> {
            self.consultations
                .borrow()
                .clone()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn fetch_stats(&self) -> Result<VisitStats, GatewayError> {
            self.stats
                .borrow()
                .clone()
                .unwrap_or_else(|| Ok(VisitStats::default()))
        }

        async fn record_visit(&self) -> Result<(), GatewayError> {
            *self.visits.borrow_mut() += 1;
            Ok(())
        }

        async fn submit_consultation(
            &self,
            request: &SubmitConsultationRequest,
        ) -> Result<WriteAck, GatewayError> {
            self.submitted.borrow_mut().push(request.clone());
            self.write()
        }

        async fn update_status(
            &self,
            request: &UpdateStatusRequest,
        ) -> Result<WriteAck, GatewayError> {
            self.status_updates.borrow_mut().push(request.clone());
            self.write()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_write_ack_exact_match() {
        assert_eq!(WriteAck::from_text("Success"), WriteAck::Success);
        assert_eq!(
            WriteAck::from_text("success"),
            WriteAck::Failure("success".into())
        );
        assert_eq!(
            WriteAck::from_text("Success\n"),
            WriteAck::Failure("Success\n".into())
        );
        assert_eq!(
            WriteAck::from_text("Error: sheet locked").into_result(),
            Err(GatewayError::Rejected("Error: sheet locked".into()))
        );
    }

    #[test]
    fn test_decode_error_payload() {
        let res: Result<Vec<ConsultationRecord>, _> =
            decode_read_payload(r#"{"error": true, "message": "시트 없음"}"#);
        assert_eq!(res, Err(GatewayError::Rejected("시트 없음".into())));

        let res: Result<Vec<ConsultationRecord>, _> =
            decode_read_payload(r#"{"error": "boom"}"#);
        assert_eq!(res, Err(GatewayError::Rejected("boom".into())));
    }

    #[test]
    fn test_decode_data_payload() {
        let stats: VisitStats = decode_read_payload(
            r#"{"totalVisitCount": 10, "todayVisitCount": 2, "quoteCount": 1, "recentLogs": []}"#,
        )
        .unwrap();
        assert_eq!(stats.total_visit_count, 10);

        let bad: Result<VisitStats, _> = decode_read_payload("<html>");
        assert!(matches!(bad, Err(GatewayError::Malformed(_))));
    }

    #[test]
    fn test_action_names() {
        for action in [
            GatewayAction::GetServiceData,
            GatewayAction::GetConsultations,
            GatewayAction::GetStats,
            GatewayAction::RecordVisit,
        ] {
            assert_eq!(GatewayAction::parse(action.as_str()), Some(action));
        }
        assert!(GatewayAction::GetConsultations.requires_admin());
        assert!(!GatewayAction::GetStats.requires_admin());
    }

    #[tokio::test]
    async fn test_with_deadline_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, GatewayError>(1)
        };
        let res = with_deadline(slow, tokio::time::sleep(Duration::from_millis(10)), 10).await;
        assert_eq!(res, Err(GatewayError::Timeout { after_ms: 10 }));
    }

    #[tokio::test]
    async fn test_with_deadline_passes_result() {
        let fast = async { Ok::<_, GatewayError>(7) };
        let res = with_deadline(fast, tokio::time::sleep(Duration::from_secs(5)), 5000).await;
        assert_eq!(res, Ok(7));
    }
}
