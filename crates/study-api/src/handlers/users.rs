//! User management endpoints
//!
//! Writes take `multipart/form-data`: a `data` part holding the JSON body and
//! an optional `image` part with the avatar file.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use study_core::domain::Role;
use study_core::ports::ImageUpload;
use study_core::DomainError;

use crate::dto::{RoleQuery, UserDto, UserRequest, UserUpdateRequest};
use crate::error::ApiError;
use crate::extract::{AdminUser, ApiQuery, AuthUser};
use crate::response::ApiResponse;
use crate::state::AppState;

struct UserForm<T> {
    data: T,
    image: Option<ImageUpload>,
}

async fn read_form<T: DeserializeOwned + Validate>(mut multipart: Multipart) -> Result<UserForm<T>, ApiError> {
    let mut data = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("data") => {
                let raw = field.bytes().await?;
                let parsed: T = serde_json::from_slice(&raw)
                    .map_err(|e| ApiError::BadRequest(format!("Invalid data part: {e}")))?;
                data = Some(parsed);
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or("avatar").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was picked
                if !bytes.is_empty() {
                    image = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| ApiError::BadRequest("Missing data part".into()))?;
    data.validate()?;
    Ok(UserForm { data, image })
}

fn role_of(code: i32) -> Result<Role, ApiError> {
    Role::from_code(code).ok_or_else(|| DomainError::InvalidRole(code).into())
}

/// GET /api/v1/users?role=N
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiQuery(query): ApiQuery<RoleQuery>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.users.get_all_users(role_of(query.role)?).await?;
    Ok(Json(ApiResponse::success(users.iter().map(UserDto::from).collect())))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.users.get_user(&id).await?;
    Ok(Json(ApiResponse::success(UserDto::from(&user))))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let form: UserForm<UserRequest> = read_form(multipart).await?;
    let role = role_of(form.data.role)?;

    let user = state
        .users
        .create(&admin.caller(), form.data.into(), role, form.image)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(UserDto::from(&user)))))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let form: UserForm<UserUpdateRequest> = read_form(multipart).await?;

    let user = state
        .users
        .update(&auth.caller(), &id, form.data.into(), form.image)
        .await?;

    Ok(Json(ApiResponse::success(UserDto::from(&user))))
}
