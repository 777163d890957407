//! Вход администратора: тела запросов и JWT claims, общие для backend и frontend.

use serde::{Deserialize, Serialize};

/// `POST /api/system/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Пользователь без секретов
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl UserInfo {
    /// Имя для шапки: полное, если задано, иначе логин
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }
}

/// Ответ на вход. Refresh-токенов нет: по истечении access-токена вход заново.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserInfo,
}

/// HS256 claims; `exp`/`iat` в секундах Unix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub username: String,
    pub is_admin: bool,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut user = UserInfo {
            id: "u1".into(),
            username: "admin".into(),
            full_name: Some("관리자".into()),
            is_admin: true,
        };
        assert_eq!(user.display_name(), "관리자");
        user.full_name = Some("  ".into());
        assert_eq!(user.display_name(), "admin");
    }

    #[test]
    fn test_user_info_defaults() {
        let user: UserInfo = serde_json::from_str(r#"{"id":"1","username":"a"}"#).unwrap();
        assert!(!user.is_admin);
        assert_eq!(user.full_name, None);
    }
}
