use anyhow::Result;
use contracts::system::auth::UserInfo;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::shared::data::db::get_connection;

/// Учётная запись администратора (`sys_users`)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sys_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub type User = Model;

impl From<Model> for UserInfo {
    fn from(m: Model) -> Self {
        UserInfo {
            id: m.id,
            username: m.username,
            full_name: m.full_name,
            is_admin: m.is_admin,
        }
    }
}

pub async fn insert(user: Model) -> Result<()> {
    let active: ActiveModel = user.into();
    active.insert(get_connection()).await?;
    Ok(())
}

pub async fn get_by_id(id: &str) -> Result<Option<Model>> {
    Ok(Entity::find_by_id(id.to_string())
        .one(get_connection())
        .await?)
}

pub async fn get_by_username(username: &str) -> Result<Option<Model>> {
    Ok(Entity::find()
        .filter(Column::Username.eq(username))
        .one(get_connection())
        .await?)
}

pub async fn count_users() -> Result<u64> {
    Ok(Entity::find().count(get_connection()).await?)
}

pub async fn touch_last_login(user: Model, at: String) -> Result<()> {
    let mut active: ActiveModel = user.into();
    active.last_login_at = Set(Some(at));
    active.update(get_connection()).await?;
    Ok(())
}
