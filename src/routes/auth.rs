//! Auth routes: password signup/login, Google OAuth flow, session cookie.

use axum::extract::{FromRef, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use super::ApiError;
use crate::services::auth::{self as auth_svc, AuthError, SignupRequest};
use crate::services::{oauth, session};
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";
const OAUTH_STATE_COOKIE_NAME: &str = "oauth_state";

fn session_cookie(token: String, secure: bool, ttl_days: i64) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::days(ttl_days))
        .build()
}

fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

pub(crate) fn auth_error_to_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::Validation(_) => StatusCode::BAD_REQUEST,
        AuthError::NicknameTaken | AuthError::EmailTaken => StatusCode::CONFLICT,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Hash(_) | AuthError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn auth_error_response(err: AuthError) -> ApiError {
    let status = auth_error_to_status(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "auth request failed");
        return ApiError::from(status);
    }
    ApiError::new(status, err.to_string())
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: session::SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(ApiError::new(StatusCode::UNAUTHORIZED, "Please sign in."));
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                ApiError::from(StatusCode::INTERNAL_SERVER_ERROR)
            })?
            .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Please sign in."))?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// PASSWORD AUTH
// =============================================================================

/// `POST /api/auth/signup`: validate, create user, start session.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    let valid = auth_svc::validate_signup(&body).map_err(auth_error_response)?;
    let user_id = auth_svc::signup(&state.pool, &valid)
        .await
        .map_err(auth_error_response)?;
    tracing::info!(%user_id, nickname = %valid.nickname, "user signed up");
    start_session(&state, jar, user_id, StatusCode::CREATED).await
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: String,
}

impl LoginRequest {
    fn identifier(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or_default()
    }
}

/// `POST /api/auth/login`: nickname (or email) + password.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let user_id = auth_svc::login(&state.pool, body.identifier(), &body.password)
        .await
        .map_err(auth_error_response)?;
    start_session(&state, jar, user_id, StatusCode::OK).await
}

async fn start_session(
    state: &AppState,
    jar: CookieJar,
    user_id: uuid::Uuid,
    status: StatusCode,
) -> Result<Response, ApiError> {
    let token = session::create_session(&state.pool, user_id, state.config.session_ttl_days)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "session creation failed");
            ApiError::from(StatusCode::INTERNAL_SERVER_ERROR)
        })?;
    let user = session::validate_session(&state.pool, &token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "session lookup failed");
            ApiError::from(StatusCode::INTERNAL_SERVER_ERROR)
        })?
        .ok_or_else(|| ApiError::from(StatusCode::INTERNAL_SERVER_ERROR))?;

    let jar = jar.add(session_cookie(token, state.config.cookie_secure, state.config.session_ttl_days));
    Ok((status, jar, Json(user)).into_response())
}

// =============================================================================
// GOOGLE OAUTH
// =============================================================================

/// `GET /auth/google`: redirect to the Google consent page.
pub async fn google_redirect(State(state): State<AppState>) -> Response {
    let Some(config) = &state.config.google else {
        return ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Google sign-in is not configured.").into_response();
    };

    let oauth_state = session::generate_token();
    let url = match oauth::authorize_url(config, &oauth_state) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(error = %e, "google authorize url failed");
            return ApiError::from(StatusCode::INTERNAL_SERVER_ERROR).into_response();
        }
    };

    let cookie = Cookie::build((OAUTH_STATE_COOKIE_NAME, oauth_state))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure)
        .max_age(Duration::minutes(10));

    let jar = CookieJar::new().add(cookie);
    (jar, Redirect::temporary(&url)).into_response()
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// `GET /auth/google/callback`: verify state, exchange code, upsert user,
/// set the session cookie, redirect to `/`.
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    let Some(config) = &state.config.google else {
        return ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Google sign-in is not configured.").into_response();
    };
    let secure = state.config.cookie_secure;

    if let Some(error) = params.error.as_deref() {
        tracing::warn!(error, "google sign-in was declined");
        return ApiError::new(StatusCode::UNAUTHORIZED, "Google sign-in failed.").into_response();
    }
    let Some(code) = params.code.as_deref().filter(|c| !c.is_empty()) else {
        return ApiError::new(StatusCode::BAD_REQUEST, "missing authorization code").into_response();
    };

    // Verify OAuth CSRF state from cookie.
    let Some(callback_state) = params.state.as_deref() else {
        return ApiError::new(StatusCode::BAD_REQUEST, "missing oauth state").into_response();
    };
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE_NAME)
        .map(Cookie::value)
        .unwrap_or_default();
    if expected_state.is_empty() || expected_state != callback_state {
        return ApiError::new(StatusCode::UNAUTHORIZED, "invalid oauth state").into_response();
    }

    let access_token = match oauth::exchange_code(&state.http, config, code).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "oauth code exchange failed");
            return ApiError::new(StatusCode::BAD_GATEWAY, "Google sign-in failed.").into_response();
        }
    };

    let google_user = match oauth::fetch_google_user(&state.http, &access_token).await {
        Ok(u) => u,
        Err(e) => {
            tracing::error!(error = %e, "google profile fetch failed");
            return ApiError::new(StatusCode::BAD_GATEWAY, "Google sign-in failed.").into_response();
        }
    };

    let user_id = match oauth::upsert_user(&state.pool, &google_user).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "user upsert failed");
            return ApiError::from(StatusCode::INTERNAL_SERVER_ERROR).into_response();
        }
    };

    let token = match session::create_session(&state.pool, user_id, state.config.session_ttl_days).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "session creation failed");
            return ApiError::from(StatusCode::INTERNAL_SERVER_ERROR).into_response();
        }
    };

    tracing::info!(%user_id, "google sign-in complete");
    let jar = jar
        .add(session_cookie(token, secure, state.config.session_ttl_days))
        .add(expired_cookie(OAUTH_STATE_COOKIE_NAME, secure));
    (jar, Redirect::temporary("/")).into_response()
}

// =============================================================================
// SESSION
// =============================================================================

/// `GET /api/auth/me`: return current user.
pub async fn me(auth: AuthUser) -> Json<session::SessionUser> {
    Json(auth.user)
}

/// `POST /api/auth/logout`: delete session, clear cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::warn!(error = %e, "session delete failed");
    }
    let jar = CookieJar::new().add(expired_cookie(COOKIE_NAME, state.config.cookie_secure));
    (jar, StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
