use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

use crate::shared::config::get_config;

/// Claims for a token issued now and valid for `lifetime_hours`
pub fn build_claims(user_id: &str, username: &str, is_admin: bool, lifetime_hours: i64) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        is_admin,
        exp: (now + chrono::Duration::hours(lifetime_hours)).timestamp() as usize,
        iat: now.timestamp() as usize,
    }
}

/// HS256 encode with an explicit secret
pub fn encode_claims(claims: &TokenClaims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

/// HS256 decode and validate expiry with an explicit secret
pub fn decode_claims(token: &str, secret: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;
    Ok(token_data.claims)
}

/// Generate JWT access token; lifetime comes from `[auth] access_token_hours`
pub async fn generate_access_token(user_id: &str, username: &str, is_admin: bool) -> Result<String> {
    let hours = get_config().auth.access_token_hours;
    let claims = build_claims(user_id, username, is_admin, hours);
    let secret = get_jwt_secret().await?;
    encode_claims(&claims, &secret)
}

/// Validate JWT token and extract claims
pub async fn validate_token(token: &str) -> Result<TokenClaims> {
    let secret = get_jwt_secret().await?;
    decode_claims(token, &secret)
}

/// Get or create JWT secret from database
pub async fn get_jwt_secret() -> Result<String> {
    if let Some(secret) = get_jwt_secret_from_db().await? {
        return Ok(secret);
    }
    let secret = generate_jwt_secret();
    save_jwt_secret_to_db(&secret).await?;
    tracing::info!("JWT secret generated and stored in sys_settings");
    Ok(get_jwt_secret_from_db().await?.unwrap_or(secret))
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

async fn get_jwt_secret_from_db() -> Result<Option<String>> {
    use crate::shared::data::db::get_connection;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let result = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            ["jwt_secret".into()],
        ))
        .await?;

    match result {
        Some(row) => {
            let secret: String = row.try_get("", "value")?;
            Ok(Some(secret))
        }
        None => Ok(None),
    }
}

async fn save_jwt_secret_to_db(secret: &str) -> Result<()> {
    use crate::shared::data::db::get_connection;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let now = Utc::now().to_rfc3339();

    // INSERT OR IGNORE: при гонке двух первых запросов побеждает первый секрет
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR IGNORE INTO sys_settings (key, value, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                "jwt_secret".into(),
                secret.to_string().into(),
                "Auto-generated JWT secret for authentication".into(),
                now.clone().into(),
                now.into(),
            ],
        ))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let claims = build_claims("u-1", "admin", true, 24);
        let token = encode_claims(&claims, "test-secret").unwrap();
        let decoded = decode_claims(&token, "test-secret").unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = build_claims("u-1", "admin", true, 24);
        let token = encode_claims(&claims, "test-secret").unwrap();
        assert!(decode_claims(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // с запасом больше допуска leeway (60 с)
        let claims = build_claims("u-1", "admin", true, -2);
        let token = encode_claims(&claims, "test-secret").unwrap();
        assert!(decode_claims(&token, "test-secret").is_err());
    }

    #[test]
    fn test_generated_secret_length() {
        use base64::{engine::general_purpose, Engine as _};
        let secret = generate_jwt_secret();
        assert_eq!(general_purpose::STANDARD.decode(secret).unwrap().len(), 32);
    }
}
