use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use service::order::{NewOrder, Order, OrderPatch};
use utoipa::ToSchema;

use super::{parse_id, MessageResponse};
use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub total: f64,
}

/// Absent `total` leaves the order unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchOrderRequest {
    pub total: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub total: f64,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self { Self { id: o.id, total: o.total } }
}

#[utoipa::path(post, path = "/api/v1/orders", tag = "orders", request_body = CreateOrderRequest,
    responses((status = 201, description = "Created", body = OrderResponse), (status = 400, description = "Invalid total")))]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(body) = payload?;
    let order = state.orders.create(NewOrder { total: body.total }).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

#[utoipa::path(get, path = "/api/v1/orders", tag = "orders", responses((status = 200, description = "All orders", body = [OrderResponse])))]
pub async fn find_all(State(state): State<ServerState>) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.orders.find_all().await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

#[utoipa::path(get, path = "/api/v1/orders/{id}", tag = "orders", params(("id" = i32, Path, description = "Order id")),
    responses((status = 200, description = "Order", body = OrderResponse), (status = 404, description = "Not found")))]
pub async fn find_by_id(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.find_by_id(parse_id(&id)?).await?;
    Ok(Json(order.into()))
}

#[utoipa::path(patch, path = "/api/v1/orders/{id}", tag = "orders", params(("id" = i32, Path, description = "Order id")),
    request_body = PatchOrderRequest,
    responses((status = 200, description = "Updated order", body = OrderResponse), (status = 400, description = "Invalid input"), (status = 404, description = "Not found")))]
pub async fn patch(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<PatchOrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    let order = state.orders.patch(id, OrderPatch { total: body.total }).await?;
    Ok(Json(order.into()))
}

#[utoipa::path(delete, path = "/api/v1/orders/{id}", tag = "orders", params(("id" = i32, Path, description = "Order id")),
    responses((status = 200, description = "Deleted", body = MessageResponse), (status = 404, description = "Not found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<MessageResponse>, ApiError> {
    state.orders.delete(parse_id(&id)?).await?;
    Ok(Json(MessageResponse::new("order deleted")))
}
