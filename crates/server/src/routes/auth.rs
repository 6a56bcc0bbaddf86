use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use service::user::{LoginInput, RegisterInput};
use utoipa::ToSchema;

use super::users::UserResponse;
use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SigninResponse {
    pub user: UserResponse,
    pub token: String,
}

#[utoipa::path(post, path = "/api/v1/auth/signup", tag = "auth", request_body = RegisterRequest,
    responses((status = 201, description = "Registered", body = UserResponse), (status = 400, description = "Invalid input"), (status = 409, description = "Email taken")))]
pub async fn signup(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(body) = payload?;
    let input = RegisterInput { email: body.email, password: body.password, name: body.name.unwrap_or_default() };
    let user = state.users.register(input).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(post, path = "/api/v1/auth/signin", tag = "auth", request_body = LoginRequest,
    responses((status = 200, description = "Signed in", body = SigninResponse), (status = 401, description = "Invalid email or password")))]
pub async fn signin(
    State(state): State<ServerState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SigninResponse>, ApiError> {
    let Json(body) = payload?;
    let session = state.users.login(LoginInput { email: body.email, password: body.password }).await?;
    Ok(Json(SigninResponse { user: session.user.into(), token: session.token }))
}
