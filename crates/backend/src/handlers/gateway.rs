//! Шлюз данных: GET с `action` для чтения, POST с текстовым JSON-телом для записи.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::domain::a002_consultation::aggregate::WriteEnvelope;
use contracts::domain::a003_visit_stats::aggregate::VisitAck;
use contracts::shared::gateway::{ErrorPayload, GatewayAction, SUCCESS_TEXT};
use serde::{Deserialize, Serialize};

use crate::domain::a001_service_catalog::service as catalog_service;
use crate::domain::a002_consultation::service::{self as consultation_service, ConsultationError};
use crate::domain::a003_visit_stats::service as stats_service;
use crate::shared::config::get_config;
use crate::system::auth::extractor::MaybeAdmin;

const NOT_AUTHORIZED: &str = "관리자 로그인이 필요합니다";

#[derive(Debug, Deserialize)]
pub struct GatewayQuery {
    pub action: Option<String>,
}

/// Разобрать имя действия и проверить права
fn resolve_action(name: Option<&str>, is_admin: bool) -> Result<GatewayAction, (StatusCode, ErrorPayload)> {
    let name = name.unwrap_or_default();
    let action = GatewayAction::parse(name).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            ErrorPayload::new(format!("Unknown action: {}", name)),
        )
    })?;
    if action.requires_admin() && !is_admin {
        return Err((StatusCode::UNAUTHORIZED, ErrorPayload::new(NOT_AUTHORIZED)));
    }
    Ok(action)
}

fn error_reply(status: StatusCode, payload: ErrorPayload) -> Response {
    (status, Json(payload)).into_response()
}

fn json_or_error<T: Serialize>(action: GatewayAction, result: anyhow::Result<T>) -> Response {
    match result {
        Ok(v) => Json(v).into_response(),
        Err(e) => {
            tracing::error!("{} failed: {:#}", action.as_str(), e);
            error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorPayload::new(e.to_string()),
            )
        }
    }
}

/// GET /api/gateway?action=...
pub async fn read(Query(query): Query<GatewayQuery>, admin: MaybeAdmin) -> Response {
    let action = match resolve_action(query.action.as_deref(), admin.is_admin()) {
        Ok(action) => action,
        Err((status, payload)) => {
            tracing::warn!("Gateway read rejected: {}", payload.message);
            return error_reply(status, payload);
        }
    };

    match action {
        GatewayAction::GetServiceData => json_or_error(action, catalog_service::get_catalog().await),
        GatewayAction::GetConsultations => {
            json_or_error(action, consultation_service::list_all().await)
        }
        GatewayAction::GetStats => json_or_error(
            action,
            stats_service::get_stats(get_config().gateway.recent_log_limit).await,
        ),
        GatewayAction::RecordVisit => json_or_error(
            action,
            stats_service::record_visit()
                .await
                .map(|_| VisitAck { ok: true }),
        ),
    }
}

/// Текстовый ответ на запись: ровно `Success` или сообщение об ошибке
fn write_reply(result: Result<(), ConsultationError>) -> (StatusCode, String) {
    match result {
        Ok(()) => (StatusCode::OK, SUCCESS_TEXT.to_string()),
        Err(e) => {
            let status = match &e {
                ConsultationError::MissingFields(_) | ConsultationError::InvalidTotal(_) => {
                    StatusCode::BAD_REQUEST
                }
                ConsultationError::RowNotFound(_) => StatusCode::NOT_FOUND,
                ConsultationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, format!("Error: {}", e))
        }
    }
}

/// POST /api/gateway (text/plain JSON body)
pub async fn write(admin: MaybeAdmin, body: String) -> (StatusCode, String) {
    let envelope = match WriteEnvelope::parse(&body) {
        Ok(envelope) => envelope,
        Err(message) => {
            tracing::warn!("Gateway write rejected: {}", message);
            return (StatusCode::BAD_REQUEST, format!("Error: {}", message));
        }
    };

    let reply = match envelope {
        WriteEnvelope::UpdateStatus(request) => {
            if !admin.is_admin() {
                return (StatusCode::UNAUTHORIZED, format!("Error: {}", NOT_AUTHORIZED));
            }
            write_reply(consultation_service::update_status(request.row_index, request.status).await)
        }
        WriteEnvelope::Submit(request) => {
            write_reply(consultation_service::submit(&request).await.map(|_| ()))
        }
    };

    if reply.0 != StatusCode::OK {
        tracing::warn!("Gateway write failed: {}", reply.1);
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_consultation::aggregate::{RequiredField, RowIndex};

    #[test]
    fn test_resolve_action() {
        assert_eq!(
            resolve_action(Some("getStats"), false).unwrap(),
            GatewayAction::GetStats
        );
        assert_eq!(
            resolve_action(Some("getConsultations"), true).unwrap(),
            GatewayAction::GetConsultations
        );

        let (status, payload) = resolve_action(Some("getConsultations"), false).unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(payload.error);

        let (status, payload) = resolve_action(Some("dropTables"), true).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload.message, "Unknown action: dropTables");

        let (_, payload) = resolve_action(None, false).unwrap_err();
        assert_eq!(payload.message, "Unknown action: ");
    }

    #[test]
    fn test_write_reply() {
        assert_eq!(write_reply(Ok(())), (StatusCode::OK, "Success".to_string()));

        let (status, text) = write_reply(Err(ConsultationError::MissingFields(vec![
            RequiredField::Phone,
        ])));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, "Error: Required fields are empty: 연락처");

        let (status, text) = write_reply(Err(ConsultationError::RowNotFound(RowIndex(9))));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_ne!(text, "Success");
    }
}
