use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::constants::{MSG_LOGGED_OUT, MSG_LOGIN_OK, MSG_PASSWORD_RESET, MSG_USER_CREATED};
use crate::db::UpsertOutcome;
use crate::error::{AppError, Result};
use crate::routes::validation::{validate_login, validate_signup, ValidJson};
use crate::security::{
    cleared_session_cookie, hash_password, issue_token, session_cookie, verify_password,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Sign up a new user
///
/// Creates the user with the next sequential id, stores a bcrypt hash of the
/// password, and sets the session cookie (201).
///
/// If the username already exists and password reset on signup is enabled,
/// the stored hash is replaced and 200 is returned without issuing a token.
/// Otherwise an existing username is a 409 Conflict.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidJson(payload): ValidJson<CredentialsRequest>,
) -> Result<Response> {
    validate_signup(&payload.username, &payload.password)?;

    let cost = state.config.bcrypt_cost;
    let password = payload.password;
    let password_hash =
        tokio::task::spawn_blocking(move || hash_password(&password, cost)).await??;

    let outcome = if state.config.signup_resets_password {
        state.users.upsert(&payload.username, password_hash).await?
    } else {
        // Existence check and write share the store lock
        UpsertOutcome::Created(state.users.insert(&payload.username, password_hash).await?)
    };

    match outcome {
        UpsertOutcome::PasswordReset(_) => Ok((
            StatusCode::OK,
            Json(MessageResponse {
                message: MSG_PASSWORD_RESET,
            }),
        )
            .into_response()),
        UpsertOutcome::Created(user) => {
            let token = issue_token(user.id, &state.config.jwt_secret)?;
            let jar = jar.add(session_cookie(token, state.config.is_production()));

            Ok((
                StatusCode::CREATED,
                jar,
                Json(MessageResponse {
                    message: MSG_USER_CREATED,
                }),
            )
                .into_response())
        }
    }
}

/// Log in with username and password
///
/// Unknown usernames and wrong passwords both return 401 `Invalid credentials`.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidJson(payload): ValidJson<CredentialsRequest>,
) -> Result<(CookieJar, Json<MessageResponse>)> {
    validate_login(&payload.username, &payload.password)?;

    let user = state
        .users
        .find_by_username(&payload.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let password = payload.password;
    let stored_hash = user.password_hash.clone();
    let matches =
        tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await??;

    if !matches {
        tracing::info!("Failed login for user {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    let token = issue_token(user.id, &state.config.jwt_secret)?;
    let jar = jar.add(session_cookie(token, state.config.is_production()));

    tracing::info!("User {} logged in", user.id);
    Ok((jar, Json(MessageResponse { message: MSG_LOGIN_OK })))
}

/// Clear the session cookie
///
/// Tokens stay cryptographically valid until they expire.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(cleared_session_cookie(state.config.is_production()));
    (jar, Json(MessageResponse {
        message: MSG_LOGGED_OUT,
    }))
}
