//! User administration endpoints

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use shared::{NewUser, Role, UserId, UserProfileUpdate};

use super::{JsonResult, ok, success};
use crate::error::WebServerError;
use crate::web::ApiState;
use crate::web::auth::{CallerId, authorize};

#[derive(Debug, Deserialize)]
pub struct RolesRequest {
    pub roles: Vec<Role>,
}

pub async fn list_users(State(state): State<ApiState>, caller: CallerId) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Admin]).await?;
    ok(state.services.users.list_users().await?)
}

pub async fn create_user(
    State(state): State<ApiState>,
    caller: CallerId,
    Json(user): Json<NewUser>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Admin]).await?;
    let created = state.services.users.create_user(user).await?;
    success("User created.", created)
}

pub async fn get_user(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(id): Path<UserId>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Admin]).await?;
    let user = state
        .services
        .users
        .get_user(&id)
        .await?
        .ok_or_else(|| WebServerError::not_found("user", &id))?;
    ok(user)
}

pub async fn update_user(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(id): Path<UserId>,
    Json(update): Json<UserProfileUpdate>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Admin]).await?;
    let user = state
        .services
        .users
        .update_profile(&id, update)
        .await?
        .ok_or_else(|| WebServerError::not_found("user", &id))?;
    success("Profile updated.", user)
}

pub async fn delete_user(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(id): Path<UserId>,
) -> JsonResult {
    let caller = authorize(state.services.access.as_ref(), caller, &[Role::Admin]).await?;
    if caller.id == id {
        return Err(WebServerError::Conflict("You cannot delete your own account.".to_string()));
    }
    if !state.services.users.delete_user(&id).await? {
        return Err(WebServerError::not_found("user", &id));
    }
    success("User deleted.", id)
}

pub async fn set_roles(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(id): Path<UserId>,
    Json(request): Json<RolesRequest>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Admin]).await?;
    let user = state
        .services
        .users
        .set_roles(&id, request.roles)
        .await?
        .ok_or_else(|| WebServerError::not_found("user", &id))?;
    success("Roles updated.", user)
}

pub async fn list_instructors(State(state): State<ApiState>, caller: CallerId) -> JsonResult {
    authorize(
        state.services.access.as_ref(),
        caller,
        &[Role::Admin, Role::Instructor],
    )
    .await?;
    ok(state.services.users.list_instructors().await?)
}
