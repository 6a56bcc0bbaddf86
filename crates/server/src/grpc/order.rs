use std::sync::Arc;

use service::order::{NewOrder, Order, OrderPatch, OrderRepository, OrderService};
use tonic::{Request, Response, Status};

use super::proto;
use super::proto::order_service_server::{OrderService as OrderRpc, OrderServiceServer};
use crate::errors::to_status;

impl From<Order> for proto::Order {
    fn from(o: Order) -> Self { Self { id: o.id, total: o.total } }
}

/// Order RPC handler. Decodes messages, calls the shared use case and
/// translates errors through the common mapping.
#[derive(Clone)]
pub struct GrpcOrderHandler {
    orders: Arc<OrderService<dyn OrderRepository>>,
}

impl GrpcOrderHandler {
    pub fn new(orders: Arc<OrderService<dyn OrderRepository>>) -> Self { Self { orders } }

    pub fn into_server(self) -> OrderServiceServer<Self> { OrderServiceServer::new(self) }
}

#[tonic::async_trait]
impl OrderRpc for GrpcOrderHandler {
    async fn create_order(&self, request: Request<proto::CreateOrderRequest>) -> Result<Response<proto::Order>, Status> {
        let req = request.into_inner();
        let order = self.orders.create(NewOrder { total: req.total }).await.map_err(to_status)?;
        Ok(Response::new(order.into()))
    }

    async fn find_order_by_id(&self, request: Request<proto::FindOrderByIdRequest>) -> Result<Response<proto::Order>, Status> {
        let order = self.orders.find_by_id(request.into_inner().id).await.map_err(to_status)?;
        Ok(Response::new(order.into()))
    }

    async fn find_all_orders(
        &self,
        _request: Request<proto::FindAllOrdersRequest>,
    ) -> Result<Response<proto::FindAllOrdersResponse>, Status> {
        let orders = self.orders.find_all().await.map_err(to_status)?;
        Ok(Response::new(proto::FindAllOrdersResponse { orders: orders.into_iter().map(Into::into).collect() }))
    }

    async fn patch_order(&self, request: Request<proto::PatchOrderRequest>) -> Result<Response<proto::Order>, Status> {
        let req = request.into_inner();
        let order = self.orders.patch(req.id, OrderPatch { total: req.total }).await.map_err(to_status)?;
        Ok(Response::new(order.into()))
    }

    async fn delete_order(
        &self,
        request: Request<proto::DeleteOrderRequest>,
    ) -> Result<Response<proto::DeleteOrderResponse>, Status> {
        self.orders.delete(request.into_inner().id).await.map_err(to_status)?;
        Ok(Response::new(proto::DeleteOrderResponse { message: "order deleted".into() }))
    }
}
