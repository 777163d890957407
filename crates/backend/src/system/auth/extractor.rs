use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
};
use contracts::system::auth::TokenClaims;

/// Токен из заголовка `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Extractor for getting current user from JWT token
/// Usage in handlers: `async fn handler(CurrentUser(claims): CurrentUser) -> Response`
pub struct CurrentUser(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Extract TokenClaims from request extensions (set by middleware)
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// Необязательная авторизация: публичные действия шлюза работают без токена,
/// админские проверяют `is_admin` сами
pub struct MaybeAdmin(pub Option<TokenClaims>);

impl MaybeAdmin {
    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(|c| c.is_admin)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAdmin
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(MaybeAdmin(None));
        };
        match super::jwt::validate_token(token).await {
            Ok(claims) => Ok(MaybeAdmin(Some(claims))),
            Err(e) => {
                tracing::debug!("Bearer token rejected: {:#}", e);
                Ok(MaybeAdmin(None))
            }
        }
    }
}
