//! Панель статистики посещений: опрос `getStats` по таймеру.

use crate::domain::a003_visit_stats::aggregate::VisitStats;
use crate::shared::error::GatewayError;
use crate::shared::gateway::QuoteGateway;

/// Период опроса по умолчанию
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 30_000;

#[derive(Debug, Clone, Default)]
pub struct StatsBoard {
    stats: Option<VisitStats>,
    polling: bool,
    last_error: Option<GatewayError>,
}

impl StatsBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Текущие значения; до первого ответа: нули
    pub fn stats(&self) -> VisitStats {
        self.stats.clone().unwrap_or_default()
    }

    pub fn has_data(&self) -> bool {
        self.stats.is_some()
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn last_error(&self) -> Option<&GatewayError> {
        self.last_error.as_ref()
    }

    /// `false`: предыдущий опрос ещё не вернулся, новый не запускаем
    pub fn begin_poll(&mut self) -> bool {
        if self.polling {
            return false;
        }
        self.polling = true;
        true
    }

    /// При ошибке остаются прежние данные, а если их не было: нули
    pub fn finish_poll(&mut self, result: Result<VisitStats, GatewayError>) {
        self.polling = false;
        match result {
            Ok(stats) => {
                self.stats = Some(stats);
                self.last_error = None;
            }
            Err(e) => {
                log::warn!("Stats poll failed: {}", e);
                if self.stats.is_none() {
                    self.stats = Some(VisitStats::default());
                }
                self.last_error = Some(e);
            }
        }
    }

    /// Один цикл опроса. `false`, если опрос пропущен.
    pub async fn poll<G: QuoteGateway + ?Sized>(&mut self, gateway: &G) -> bool {
        if !self.begin_poll() {
            return false;
        }
        let result = gateway.fetch_stats().await;
        self.finish_poll(result);
        true
    }
}
