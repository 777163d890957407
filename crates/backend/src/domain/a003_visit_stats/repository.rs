use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

/// Одно посещение главной страницы
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_visit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub visited_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn insert(visited_at: DateTime<Utc>) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: NotSet,
        visited_at: Set(visited_at),
    };
    active.insert(get_connection()).await?;
    Ok(())
}

pub async fn count_all() -> anyhow::Result<u64> {
    let count = Entity::find().count(get_connection()).await?;
    Ok(count)
}

pub async fn count_since(since: DateTime<Utc>) -> anyhow::Result<u64> {
    let count = Entity::find()
        .filter(Column::VisitedAt.gte(since))
        .count(get_connection())
        .await?;
    Ok(count)
}
