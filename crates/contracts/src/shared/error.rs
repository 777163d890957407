//! Ошибки шлюза данных, мастера расчёта и админ-списка.
//!
//! Ни одна из них не фатальна: страница остаётся рабочей, состояние
//! откатывается к значению до попытки.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::a001_service_catalog::aggregate::IndustryKey;
use crate::domain::a002_consultation::aggregate::RequiredField;
use crate::usecases::u501_quote_wizard::navigation::WizardPage;
use crate::usecases::u502_consultation_admin::record_store::AdminOperation;

/// Ошибка обращения к шлюзу данных
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GatewayError {
    /// Сеть недоступна или транспорт упал
    #[error("Gateway unreachable: {0}")]
    Unreachable(String),

    /// Шлюз вернул структурированную ошибку или отказ записи
    #[error("Gateway error: {0}")]
    Rejected(String),

    /// Нет ответа за отведённое время
    #[error("Gateway timeout after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("Not authorized")]
    Unauthorized,

    /// Ответ не удалось разобрать
    #[error("Malformed gateway response: {0}")]
    Malformed(String),
}

/// Ошибка мастера расчёта стоимости
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Required fields are empty: {}", join_fields(.0))]
    Validation(Vec<RequiredField>),

    /// Попытка выбрать вариант для отрасли, которая не отмечена
    #[error("Industry '{industry}' is not selected")]
    StaleState { industry: IndustryKey },

    #[error("Cannot move from {from:?} to {to:?}")]
    NavigationBlocked { from: WizardPage, to: WizardPage },

    #[error("Submission is already in progress")]
    RequestInFlight,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Ошибка админ-списка заявок
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    /// Список не загружен; прежние данные не тронуты
    #[error("Failed to load consultations: {0}")]
    Load(GatewayError),

    #[error("Failed to update status: {0}")]
    StatusUpdate(GatewayError),

    #[error("{0:?} is already in progress")]
    RequestInFlight(AdminOperation),
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}
