use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};

use super::{extractor::bearer_token, jwt};

/// Маршрут только с действующим токеном; claims кладутся в extensions для `CurrentUser`
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let Some(token) = bearer_token(req.headers()) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    match jwt::validate_token(token).await {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::debug!("Rejected bearer token on {}: {}", req.uri().path(), e);
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
