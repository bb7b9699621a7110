//! Request extractors: the authenticated caller and envelope-aware body/query parsing

use axum::{
    extract::{FromRequest, FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use uuid::Uuid;

use study_core::domain::{CallerContext, Role};

use crate::cookies::read_cookie;
use crate::error::ApiError;
use crate::state::AppState;

/// Caller proven by a valid session token, taken from `Authorization: Bearer`
/// or, failing that, the session cookie.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn caller(&self) -> CallerContext {
        CallerContext::authenticated(self.user_id, self.role)
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| read_cookie(&parts.headers, &state.config.cookie.session_name))
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Missing session token".into()))?;

        let claims = state
            .jwt
            .validate_session_token(&token)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        let user_id = claims.user_id().map_err(|e| ApiError::Unauthorized(e.to_string()))?;
        let role = Role::from_code(claims.role as i32)
            .ok_or_else(|| ApiError::Unauthorized("Unknown role in token".into()))?;

        Ok(AuthUser { user_id, role })
    }
}

/// Authenticated caller holding the admin role
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(ApiError::Forbidden("Admin role required".into()));
        }
        Ok(AdminUser(user))
    }
}

/// `Json` body whose parse failures answer with the `VALIDATION_ERROR` envelope
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query` counterpart of [`ApiJson`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
