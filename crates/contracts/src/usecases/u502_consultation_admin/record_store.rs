//! Список заявок в памяти админ-панели.
//!
//! Статус меняется только после подтверждения `Success` от шлюза.
//! Идентичность записи: `RowIndex` из хранилища, клиент его не пересчитывает.

use std::collections::HashSet;

use crate::domain::a002_consultation::aggregate::{
    ConsultationRecord, ConsultationStatus, RowIndex, UpdateStatusRequest,
};
use crate::shared::error::{AdminError, GatewayError};
use crate::shared::gateway::{QuoteGateway, WriteAck};

use super::view::{apply_view, compute_aggregates, RecordAggregates, ViewQuery};

/// Операции, у которых одновременно может быть не больше одного запроса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminOperation {
    Load,
    UpdateStatus(RowIndex),
}

#[derive(Debug, Clone, Default)]
pub struct AdminRecordStore {
    records: Vec<ConsultationRecord>,
    loaded: bool,
    pending: HashSet<AdminOperation>,
}

impl AdminRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ConsultationRecord] {
        &self.records
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_pending(&self, op: AdminOperation) -> bool {
        self.pending.contains(&op)
    }

    pub fn find(&self, row_index: RowIndex) -> Option<&ConsultationRecord> {
        self.records.iter().find(|r| r.row_index == row_index)
    }

    fn begin(&mut self, op: AdminOperation) -> Result<(), AdminError> {
        if !self.pending.insert(op) {
            return Err(AdminError::RequestInFlight(op));
        }
        Ok(())
    }

    pub fn begin_load(&mut self) -> Result<(), AdminError> {
        self.begin(AdminOperation::Load)
    }

    /// Заменить список целиком. При ошибке прежний список остаётся.
    pub fn finish_load(
        &mut self,
        result: Result<Vec<ConsultationRecord>, GatewayError>,
    ) -> Result<usize, AdminError> {
        self.pending.remove(&AdminOperation::Load);
        let records = result.map_err(AdminError::Load)?;
        self.records = records;
        self.loaded = true;
        Ok(self.records.len())
    }

    pub async fn load<G: QuoteGateway + ?Sized>(&mut self, gateway: &G) -> Result<usize, AdminError> {
        self.begin_load()?;
        let result = gateway.fetch_consultations().await;
        let outcome = self.finish_load(result);
        match &outcome {
            Ok(count) => log::info!("Consultations loaded: {}", count),
            Err(e) => log::error!("{}", e),
        }
        outcome
    }

    pub fn begin_status_update(
        &mut self,
        row_index: RowIndex,
        status: ConsultationStatus,
    ) -> Result<UpdateStatusRequest, AdminError> {
        self.begin(AdminOperation::UpdateStatus(row_index))?;
        Ok(UpdateStatusRequest::new(row_index, status))
    }

    /// Применить ответ шлюза. `Ok(true)`: запись найдена и изменена.
    pub fn finish_status_update(
        &mut self,
        row_index: RowIndex,
        status: ConsultationStatus,
        result: Result<WriteAck, GatewayError>,
    ) -> Result<bool, AdminError> {
        self.pending.remove(&AdminOperation::UpdateStatus(row_index));
        result
            .and_then(WriteAck::into_result)
            .map_err(AdminError::StatusUpdate)?;

        match self.records.iter_mut().find(|r| r.row_index == row_index) {
            Some(record) => {
                record.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn update_status<G: QuoteGateway + ?Sized>(
        &mut self,
        gateway: &G,
        row_index: RowIndex,
        status: ConsultationStatus,
    ) -> Result<bool, AdminError> {
        let request = self.begin_status_update(row_index, status)?;
        let result = gateway.update_status(&request).await;
        let outcome = self.finish_status_update(row_index, status, result);
        if let Err(e) = &outcome {
            log::error!("Row {}: {}", row_index, e);
        }
        outcome
    }

    pub fn apply_view(&self, query: &ViewQuery) -> Vec<&ConsultationRecord> {
        apply_view(&self.records, query)
    }

    pub fn compute_aggregates(&self) -> RecordAggregates {
        compute_aggregates(&self.records)
    }
}
