//! Forgot-password endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// POST /api/v1/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    payload.validate()?;
    state.password_reset.request_reset(&payload.email).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "A reset code has been sent",
    ))))
}

/// POST /api/v1/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    payload.validate()?;
    state
        .password_reset
        .reset_password(&payload.email, payload.otp, &payload.password)
        .await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password has been changed",
    ))))
}
