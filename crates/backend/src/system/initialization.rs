use anyhow::Result;

use crate::shared::config::AuthConfig;
use crate::system::users::{repository, service};

/// Пустая `sys_users`: создать администратора из `[auth]`
pub async fn ensure_admin_user_exists(auth: &AuthConfig) -> Result<()> {
    if repository::count_users().await? > 0 {
        return Ok(());
    }

    let admin_id = service::create(
        &auth.admin_username,
        &auth.admin_password,
        Some("관리자".to_string()),
        true,
    )
    .await?;

    tracing::warn!(
        "Admin user '{}' created (id {}); password comes from config.toml [auth], change it",
        auth.admin_username,
        admin_id
    );
    Ok(())
}
