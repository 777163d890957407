use anyhow::{bail, Result};
use chrono::Utc;

use super::repository::{self, User};
use crate::system::auth::password;

/// Завести пользователя; возвращает его id
pub async fn create(
    username: &str,
    plain_password: &str,
    full_name: Option<String>,
    is_admin: bool,
) -> Result<String> {
    if username.trim().is_empty() {
        bail!("Username cannot be empty");
    }
    if repository::get_by_username(username).await?.is_some() {
        bail!("Username already exists: {}", username);
    }

    password::validate_password_strength(plain_password)?;
    let now = Utc::now().to_rfc3339();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: username.to_string(),
        password_hash: password::hash_password(plain_password)?,
        full_name,
        is_active: true,
        is_admin,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };
    let id = user.id.clone();
    repository::insert(user).await?;
    Ok(id)
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

/// Проверка логина и пароля. `None`: нет такого, отключён или пароль неверный.
pub async fn verify_credentials(username: &str, plain_password: &str) -> Result<Option<User>> {
    let user = match repository::get_by_username(username).await? {
        Some(user) if user.is_active => user,
        _ => return Ok(None),
    };
    if !password::verify_password(plain_password, &user.password_hash)? {
        return Ok(None);
    }

    let at = Utc::now().to_rfc3339();
    if let Err(e) = repository::touch_last_login(user.clone(), at).await {
        tracing::warn!("Failed to update last_login_at for {}: {}", user.username, e);
    }
    Ok(Some(user))
}
