//! Каталог услуг хранится в трёх таблицах: отрасль / услуга / вариант.

use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};

use crate::shared::data::db::get_connection;

pub mod industry {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a001_service_industry")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub key: String,
        pub name: String,
        pub icon: String,
        pub sort_order: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod item {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a001_service_item")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub industry_key: String,
        pub code: String,
        pub name: String,
        pub sort_order: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod service_option {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a001_service_option")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub industry_key: String,
        pub service_code: String,
        pub code: String,
        pub label: String,
        pub price: i64,
        pub sort_order: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub async fn list_industries() -> anyhow::Result<Vec<industry::Model>> {
    let items = industry::Entity::find()
        .order_by_asc(industry::Column::SortOrder)
        .all(get_connection())
        .await?;
    Ok(items)
}

pub async fn list_items() -> anyhow::Result<Vec<item::Model>> {
    let items = item::Entity::find()
        .order_by_asc(item::Column::SortOrder)
        .order_by_asc(item::Column::Id)
        .all(get_connection())
        .await?;
    Ok(items)
}

pub async fn list_options() -> anyhow::Result<Vec<service_option::Model>> {
    let items = service_option::Entity::find()
        .order_by_asc(service_option::Column::SortOrder)
        .order_by_asc(service_option::Column::Id)
        .all(get_connection())
        .await?;
    Ok(items)
}

pub async fn count_industries() -> anyhow::Result<u64> {
    let count = industry::Entity::find().count(get_connection()).await?;
    Ok(count)
}

pub async fn insert_industries(models: Vec<industry::ActiveModel>) -> anyhow::Result<()> {
    if models.is_empty() {
        return Ok(());
    }
    industry::Entity::insert_many(models)
        .exec(get_connection())
        .await?;
    Ok(())
}

pub async fn insert_items(models: Vec<item::ActiveModel>) -> anyhow::Result<()> {
    if models.is_empty() {
        return Ok(());
    }
    item::Entity::insert_many(models)
        .exec(get_connection())
        .await?;
    Ok(())
}

pub async fn insert_options(models: Vec<service_option::ActiveModel>) -> anyhow::Result<()> {
    if models.is_empty() {
        return Ok(());
    }
    service_option::Entity::insert_many(models)
        .exec(get_connection())
        .await?;
    Ok(())
}
