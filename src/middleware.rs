use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use std::net::SocketAddr;

use crate::constants::TOKEN_COOKIE;
use crate::error::{AppError, Result};
use crate::security::verify_token;
use crate::AppState;

/// Identity attached to requests that passed [`require_session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: u64,
}

/// Resolve a raw token into the authenticated user
///
/// Shared by the HTTP middleware and the realtime handshake.
pub fn authenticate(token: Option<&str>, secret: &str) -> Result<AuthenticatedUser> {
    let token = token.filter(|t| !t.is_empty()).ok_or(AppError::NoToken)?;

    let claims = verify_token(token, secret).map_err(|e| {
        tracing::debug!("Token rejected: {}", e);
        AppError::InvalidToken
    })?;

    Ok(AuthenticatedUser {
        user_id: claims.user_id,
    })
}

/// Session middleware - requires a valid token cookie
///
/// Runs before the body is read, so unauthenticated requests never reach
/// a generation backend.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = jar.get(TOKEN_COOKIE).map(|c| c.value());
    let user = authenticate(token, &state.config.jwt_secret)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Rate limiting middleware - counts requests per client IP
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "127.0.0.1".to_string());

    let now = chrono::Utc::now().timestamp();
    state
        .rate_limits
        .hit(
            &ip,
            now,
            state.config.rate_limit_requests,
            state.config.rate_limit_window_secs,
        )
        .await
        .map_err(|retry_after_secs| AppError::RateLimitExceeded { retry_after_secs })?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::issue_token;

    const SECRET: &str = "middleware-secret";

    #[test]
    fn test_authenticate_valid_token() {
        let token = issue_token(5, SECRET).unwrap();
        let user = authenticate(Some(&token), SECRET).unwrap();
        assert_eq!(user.user_id, 5);
    }

    #[test]
    fn test_authenticate_missing_token() {
        assert!(matches!(authenticate(None, SECRET), Err(AppError::NoToken)));
        assert!(matches!(authenticate(Some(""), SECRET), Err(AppError::NoToken)));
    }

    #[test]
    fn test_authenticate_wrong_secret() {
        let token = issue_token(5, "other-secret").unwrap();
        assert!(matches!(
            authenticate(Some(&token), SECRET),
            Err(AppError::InvalidToken)
        ));
    }
}
