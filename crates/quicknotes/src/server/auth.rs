use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::{Owner, Session, CODE_VERIFIER_COOKIE, SESSION_COOKIE};
use crate::server::error::ApiError;
use crate::server::ServerState;

const LOGIN_PATH: &str = "/login";
const DEFAULT_ERROR: &str = "An error occurred";
const INVALID_LINK: &str = "Invalid or expired link";

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CallbackQuery {
    /// Authorization code issued by the auth service.
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

fn login_with_error(message: &str) -> Redirect {
    Redirect::to(&format!(
        "{LOGIN_PATH}?error={}",
        urlencoding::encode(message)
    ))
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|value| !value.is_empty())
}

fn session_cookie(session: &Session) -> String {
    let max_age = session
        .expires_in
        .map(|seconds| format!("; Max-Age={seconds}"))
        .unwrap_or_default();
    format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax{max_age}",
        session.access_token
    )
}

fn expired_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Reads a cookie value from every `Cookie` header on the request.
pub(crate) fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The access token of the request, from `Authorization: Bearer` or the session cookie.
pub(crate) fn request_token(headers: &HeaderMap) -> Option<&str> {
    bearer_token(headers).or_else(|| cookie_value(headers, SESSION_COOKIE))
}

/// Resolves the caller of a notes request to the owner every store call is scoped to.
pub(crate) async fn authenticate(
    state: &ServerState,
    headers: &HeaderMap,
) -> Result<Owner, ApiError> {
    let token = request_token(headers).ok_or_else(|| ApiError::unauthorized("sign in required"))?;
    let user_id = state.auth.user_for_token(token).await?;
    Ok(Owner::with_token(user_id, token))
}

#[utoipa::path(
    get,
    path = "/auth/callback",
    tag = "auth",
    params(CallbackQuery),
    responses(
        (status = 303, description = "Redirect to / on success, otherwise to /login"),
    )
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn callback(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Query(params): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = non_empty(params.error.as_ref()) {
        let message = non_empty(params.error_description.as_ref()).unwrap_or(DEFAULT_ERROR);
        tracing::warn!(error, message, "auth provider reported an error");
        return login_with_error(message).into_response();
    }

    let Some(code) = non_empty(params.code.as_ref()) else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let verifier = cookie_value(&headers, CODE_VERIFIER_COOKIE);
    match state.auth.exchange_code(code, verifier).await {
        Ok(session) => {
            tracing::info!(user_id = %session.user_id, "session established");
            (
                AppendHeaders([
                    (SET_COOKIE, session_cookie(&session)),
                    (SET_COOKIE, expired_cookie(CODE_VERIFIER_COOKIE)),
                ]),
                Redirect::to("/"),
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!(%error, "code exchange failed");
            login_with_error(INVALID_LINK).into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 303, description = "Session cleared, redirect to /login"),
    )
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn logout(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    if let Some(token) = request_token(&headers) {
        if let Err(error) = state.auth.sign_out(token).await {
            tracing::warn!(%error, "sign-out failed, clearing the cookie anyway");
        }
    }
    (
        AppendHeaders([(SET_COOKIE, expired_cookie(SESSION_COOKIE))]),
        Redirect::to(LOGIN_PATH),
    )
        .into_response()
}
