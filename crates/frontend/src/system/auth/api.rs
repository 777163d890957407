use contracts::system::auth::{LoginRequest, LoginResponse, UserInfo};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use crate::shared::api_utils::api_url;

const LOGIN_PATH: &str = "/api/system/auth/login";
const ME_PATH: &str = "/api/system/auth/me";

async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, String> {
    if !response.ok() {
        return Err(format!("{} failed: HTTP {}", what, response.status()));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| format!("{}: failed to parse response: {}", what, e))
}

/// Вход по логину и паролю
pub async fn login(username: String, password: String) -> Result<LoginResponse, String> {
    let response = Request::post(&api_url(LOGIN_PATH))
        .json(&LoginRequest { username, password })
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("서버에 연결할 수 없습니다: {}", e))?;

    if response.status() == 401 {
        return Err("아이디 또는 비밀번호가 올바르지 않습니다".to_string());
    }
    parse_json(response, "Login").await
}

/// Проверка сохранённого токена при загрузке страницы
pub async fn get_current_user(access_token: &str) -> Result<UserInfo, String> {
    let response = Request::get(&api_url(ME_PATH))
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    parse_json(response, "Session check").await
}
