//! HTTP-клиент шлюза данных для браузера.

use async_trait::async_trait;
use contracts::domain::a001_service_catalog::aggregate::ServiceCatalog;
use contracts::domain::a002_consultation::aggregate::{
    ConsultationRecord, SubmitConsultationRequest, UpdateStatusRequest,
};
use contracts::domain::a003_visit_stats::aggregate::{VisitAck, VisitStats};
use contracts::shared::error::GatewayError;
use contracts::shared::gateway::{
    decode_read_payload, with_deadline, GatewayAction, QuoteGateway, WriteAck,
    DEFAULT_READ_TIMEOUT_MS,
};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::shared::api_utils::api_url;

const GATEWAY_PATH: &str = "/api/gateway";

#[derive(Clone, Debug)]
pub struct HttpGateway {
    access_token: Option<String>,
    read_timeout_ms: u64,
}

impl Default for HttpGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpGateway {
    /// Публичный клиент (мастер, статистика)
    pub fn new() -> Self {
        Self {
            access_token: None,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }

    /// Клиент администратора: токен уходит в `Authorization: Bearer`
    pub fn with_token(access_token: Option<String>) -> Self {
        Self {
            access_token,
            ..Self::new()
        }
    }

    fn authorize(&self, builder: gloo_net::http::RequestBuilder) -> gloo_net::http::RequestBuilder {
        match &self.access_token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn fetch_text(&self, action: GatewayAction) -> Result<String, GatewayError> {
        let url = format!("{}?action={}", api_url(GATEWAY_PATH), action.as_str());
        let response = self
            .authorize(Request::get(&url))
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        if response.status() == 401 {
            return Err(GatewayError::Unauthorized);
        }

        response
            .text()
            .await
            .map_err(|e| GatewayError::Unreachable(format!("Failed to read response: {}", e)))
    }

    /// Чтение с дедлайном; по истечении запрос отбрасывается
    async fn read<T: DeserializeOwned>(&self, action: GatewayAction) -> Result<T, GatewayError> {
        let timeout = self.read_timeout_ms;
        let text = with_deadline(
            self.fetch_text(action),
            TimeoutFuture::new(timeout as u32),
            timeout,
        )
        .await
        .map_err(|e| {
            log::warn!("{} failed: {}", action.as_str(), e);
            e
        })?;
        decode_read_payload(&text)
    }

    /// Запись: JSON как text/plain, ответ, буквальная строка
    async fn write<B: Serialize>(&self, body: &B) -> Result<WriteAck, GatewayError> {
        let body = serde_json::to_string(body)
            .map_err(|e| GatewayError::Malformed(format!("Failed to serialize request: {}", e)))?;

        let response = self
            .authorize(Request::post(&api_url(GATEWAY_PATH)))
            .header("Content-Type", "text/plain;charset=utf-8")
            .body(body)
            .map_err(|e| GatewayError::Malformed(e.to_string()))?
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        if response.status() == 401 {
            return Err(GatewayError::Unauthorized);
        }

        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Unreachable(format!("Failed to read response: {}", e)))?;
        Ok(WriteAck::from_text(&text))
    }
}

#[async_trait(?Send)]
impl QuoteGateway for HttpGateway {
    async fn fetch_service_catalog(&self) -> Result<ServiceCatalog, GatewayError> {
        self.read(GatewayAction::GetServiceData).await
    }

    async fn fetch_consultations(&self) -> Result<Vec<ConsultationRecord>, GatewayError> {
        self.read(GatewayAction::GetConsultations).await
    }

    async fn fetch_stats(&self) -> Result<VisitStats, GatewayError> {
        self.read(GatewayAction::GetStats).await
    }

    async fn record_visit(&self) -> Result<(), GatewayError> {
        let _: VisitAck = self.read(GatewayAction::RecordVisit).await?;
        Ok(())
    }

    async fn submit_consultation(
        &self,
        request: &SubmitConsultationRequest,
    ) -> Result<WriteAck, GatewayError> {
        self.write(request).await
    }

    async fn update_status(&self, request: &UpdateStatusRequest) -> Result<WriteAck, GatewayError> {
        self.write(request).await
    }
}
