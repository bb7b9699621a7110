// ============================================================================
// Study API - Auth Handlers
// File: crates/study-api/src/handlers/auth.rs
// ============================================================================
//! Signup, login, logout, token refresh and current profile

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use validator::Validate;

use study_core::domain::{CallerContext, Role};

use crate::cookies::{clear_refresh_cookie, clear_session_cookie, read_cookie, refresh_cookie, session_cookie};
use crate::dto::{AuthenticationRequest, AuthenticationResponse, RefreshResponse, UserDto, UserRequest};
use crate::error::ApiError;
use crate::extract::{ApiJson, AuthUser};
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

const TOKEN_TYPE: &str = "Bearer";

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.sessions.me(&auth.user_id).await?;
    Ok(Json(ApiResponse::success(UserDto::from(&user))))
}

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    payload.validate()?;

    let role = Role::from_code(payload.role)
        .ok_or(study_core::DomainError::InvalidRole(payload.role))?;
    let user = state
        .users
        .create(&CallerContext::anonymous(), payload.into(), role, None)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(UserDto::from(&user)))))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AuthenticationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let result = state.sessions.authenticate(&payload.email, &payload.password).await?;
    let session_ttl = state.sessions.session_token_expiry();
    let refresh_ttl = state.sessions.refresh_token_expiry();

    let cookies = AppendHeaders([
        (SET_COOKIE, session_cookie(&state.config.cookie, &result.session_token, session_ttl)),
        (SET_COOKIE, refresh_cookie(&state.config.cookie, &result.refresh_token.token, refresh_ttl)),
    ]);

    let body = AuthenticationResponse {
        user: UserDto::from(&result.user),
        access_token: result.session_token,
        refresh_token: result.refresh_token.token,
        token_type: TOKEN_TYPE,
        expires_in: session_ttl,
    };

    Ok((cookies, Json(ApiResponse::success(body))))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let refresh = read_cookie(&headers, &state.config.cookie.refresh_name);
    state.sessions.signout(refresh.as_deref()).await?;

    let cookies = AppendHeaders([
        (SET_COOKIE, clear_session_cookie(&state.config.cookie)),
        (SET_COOKIE, clear_refresh_cookie(&state.config.cookie)),
    ]);
    Ok((cookies, Json(ApiResponse::success(MessageResponse::new("You've been signed out")))))
}

/// POST /api/v1/auth/refresh-token
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let refresh = read_cookie(&headers, &state.config.cookie.refresh_name);
    let result = state.sessions.refresh(refresh.as_deref()).await?;
    let session_ttl = state.sessions.session_token_expiry();

    let cookie = AppendHeaders([(
        SET_COOKIE,
        session_cookie(&state.config.cookie, &result.session_token, session_ttl),
    )]);

    let body = RefreshResponse {
        access_token: result.session_token,
        token_type: TOKEN_TYPE,
        expires_in: session_ttl,
    };
    Ok((cookie, Json(ApiResponse::success(body))))
}
