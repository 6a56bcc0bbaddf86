use async_trait::async_trait;

use super::domain::{NewOrder, Order, OrderPatch};
use crate::errors::ServiceError;

/// Repository abstraction for order persistence.
///
/// `find_by_id`, `patch` and `delete` fail with `NotFound` for an unknown id.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn save(&self, input: NewOrder) -> Result<Order, ServiceError>;
    async fn find_all(&self) -> Result<Vec<Order>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Order, ServiceError>;
    async fn patch(&self, id: i32, patch: &OrderPatch) -> Result<(), ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct InMemoryOrderRepository {
        inner: RwLock<Inner>,
    }

    #[derive(Default)]
    struct Inner {
        last_id: i32,
        orders: BTreeMap<i32, Order>,
    }

    impl InMemoryOrderRepository {
        pub async fn len(&self) -> usize { self.inner.read().await.orders.len() }
    }

    #[async_trait]
    impl OrderRepository for InMemoryOrderRepository {
        async fn save(&self, input: NewOrder) -> Result<Order, ServiceError> {
            let mut inner = self.inner.write().await;
            inner.last_id += 1;
            let order = Order { id: inner.last_id, total: input.total };
            inner.orders.insert(order.id, order.clone());
            Ok(order)
        }

        async fn find_all(&self) -> Result<Vec<Order>, ServiceError> {
            Ok(self.inner.read().await.orders.values().cloned().collect())
        }

        async fn find_by_id(&self, id: i32) -> Result<Order, ServiceError> {
            self.inner.read().await.orders.get(&id).cloned().ok_or_else(|| ServiceError::not_found("order"))
        }

        async fn patch(&self, id: i32, patch: &OrderPatch) -> Result<(), ServiceError> {
            let mut inner = self.inner.write().await;
            let order = inner.orders.get_mut(&id).ok_or_else(|| ServiceError::not_found("order"))?;
            if let Some(total) = patch.total {
                order.total = total;
            }
            Ok(())
        }

        async fn delete(&self, id: i32) -> Result<(), ServiceError> {
            match self.inner.write().await.orders.remove(&id) {
                Some(_) => Ok(()),
                None => Err(ServiceError::not_found("order")),
            }
        }
    }
}
