use chrono::{DateTime, Utc};
use contracts::domain::a002_consultation::aggregate::{
    ConsultationRecord, ConsultationStatus, RowIndex,
};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue::NotSet, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_consultation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub row_index: i64,
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub industry: String,
    pub phone: String,
    pub region: String,
    pub selected_services: String,
    pub total_amount: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ConsultationRecord {
    fn from(m: Model) -> Self {
        let status = ConsultationStatus::from_code(&m.status).unwrap_or_else(|| {
            tracing::warn!(
                "Row {} has unknown status '{}', treating as waiting",
                m.row_index,
                m.status
            );
            ConsultationStatus::default()
        });
        ConsultationRecord {
            row_index: RowIndex(m.row_index),
            name: m.name,
            industry: m.industry,
            phone: m.phone,
            region: m.region,
            status,
            total_amount: u64::try_from(m.total_amount).unwrap_or(0),
            timestamp: m.timestamp,
            selected_services: m.selected_services,
        }
    }
}

/// Новая строка заявки (row_index назначает база)
pub struct NewConsultation {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub industry: String,
    pub phone: String,
    pub region: String,
    pub selected_services: String,
    pub total_amount: i64,
    pub status: ConsultationStatus,
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Все заявки, новые первыми
pub async fn list_all() -> anyhow::Result<Vec<ConsultationRecord>> {
    let items = Entity::find()
        .order_by_desc(Column::RowIndex)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn list_recent(limit: u64) -> anyhow::Result<Vec<ConsultationRecord>> {
    let items = Entity::find()
        .order_by_desc(Column::RowIndex)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn count_all() -> anyhow::Result<u64> {
    let count = Entity::find().count(conn()).await?;
    Ok(count)
}

pub async fn insert(row: NewConsultation) -> anyhow::Result<RowIndex> {
    let active = ActiveModel {
        row_index: NotSet,
        timestamp: Set(row.timestamp),
        name: Set(row.name),
        industry: Set(row.industry),
        phone: Set(row.phone),
        region: Set(row.region),
        selected_services: Set(row.selected_services),
        total_amount: Set(row.total_amount),
        status: Set(row.status.code().to_string()),
    };
    let inserted = active.insert(conn()).await?;
    Ok(RowIndex(inserted.row_index))
}

/// `false`: строки с таким номером нет
pub async fn update_status(row_index: RowIndex, status: ConsultationStatus) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(status.code()))
        .filter(Column::RowIndex.eq(row_index.value()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
