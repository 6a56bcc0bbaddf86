use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use service::user::{User, UserPatch};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{parse_id, MessageResponse};
use crate::errors::ApiError;
use crate::middleware::AuthUser;
use crate::state::ServerState;

/// Public projection of a user. The password hash is never serialized.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self { Self { id: u.id, email: u.email, name: u.name } }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchUserRequest {
    pub name: Option<String>,
}

#[utoipa::path(get, path = "/api/v1/users", tag = "users", responses((status = 200, description = "All users", body = [UserResponse])))]
pub async fn find_all(State(state): State<ServerState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.find_all_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(get, path = "/api/v1/users/{id}", tag = "users", params(("id" = Uuid, Path, description = "User id")),
    responses((status = 200, description = "User", body = UserResponse), (status = 404, description = "Not found")))]
pub async fn find_by_id(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.find_user_by_id(parse_id(&id)?).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(get, path = "/api/v1/users/me", tag = "users", security(("bearer" = [])),
    responses((status = 200, description = "Current user", body = UserResponse), (status = 401, description = "Missing or invalid token")))]
pub async fn me(State(state): State<ServerState>, Extension(AuthUser(id)): Extension<AuthUser>) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.find_user_by_id(id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(patch, path = "/api/v1/users/{id}", tag = "users", params(("id" = Uuid, Path, description = "User id")),
    request_body = PatchUserRequest,
    responses((status = 200, description = "Updated user", body = UserResponse), (status = 400, description = "Invalid name"), (status = 404, description = "Not found")))]
pub async fn patch(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<PatchUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    let user = state.users.patch_user(id, UserPatch { name: body.name }).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(delete, path = "/api/v1/users/{id}", tag = "users", params(("id" = Uuid, Path, description = "User id")),
    responses((status = 200, description = "Deleted", body = MessageResponse), (status = 404, description = "Not found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<MessageResponse>, ApiError> {
    state.users.delete_user(parse_id(&id)?).await?;
    Ok(Json(MessageResponse::new("user deleted")))
}
