use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{validate_total, NewOrder, Order, OrderPatch};
use super::repository::OrderRepository;
use crate::errors::ServiceError;

/// Order use cases, shared by the REST and RPC transports.
pub struct OrderService<R: OrderRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: OrderRepository + ?Sized> OrderService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create an order with a positive total.
    ///
    /// # Examples
    /// ```
    /// use service::order::{NewOrder, OrderService, repository::mock::InMemoryOrderRepository};
    /// use std::sync::Arc;
    /// let svc = OrderService::new(Arc::new(InMemoryOrderRepository::default()));
    /// let order = tokio_test::block_on(svc.create(NewOrder { total: 100.50 })).unwrap();
    /// assert_eq!(order.total, 100.50);
    /// assert!(tokio_test::block_on(svc.create(NewOrder { total: 0.0 })).is_err());
    /// ```
    #[instrument(skip(self))]
    pub async fn create(&self, input: NewOrder) -> Result<Order, ServiceError> {
        validate_total(input.total)?;
        let order = self.repo.save(input).await?;
        info!(order_id = order.id, "order_created");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Order>, ServiceError> {
        self.repo.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Order, ServiceError> {
        self.repo.find_by_id(id).await
    }

    /// Apply a partial update and return the stored state afterwards.
    #[instrument(skip(self))]
    pub async fn patch(&self, id: i32, patch: OrderPatch) -> Result<Order, ServiceError> {
        if let Some(total) = patch.total {
            validate_total(total)?;
        }
        self.repo.patch(id, &patch).await?;
        let order = self.repo.find_by_id(id).await?;
        info!(order_id = id, "order_updated");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete(id).await?;
        info!(order_id = id, "order_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::repo::seaorm::SeaOrmOrderRepository;
    use crate::order::repository::mock::InMemoryOrderRepository;
    use crate::test_support::get_db;
    use crate::ErrorKind;

    fn mock_service() -> (Arc<InMemoryOrderRepository>, OrderService<InMemoryOrderRepository>) {
        let repo = Arc::new(InMemoryOrderRepository::default());
        (repo.clone(), OrderService::new(repo))
    }

    #[tokio::test]
    async fn order_lifecycle() {
        let (_, svc) = mock_service();
        let created = svc.create(NewOrder { total: 100.50 }).await.unwrap();
        assert_eq!(svc.find_by_id(created.id).await.unwrap(), created);

        let patched = svc.patch(created.id, OrderPatch { total: Some(250.0) }).await.unwrap();
        assert_eq!(patched, Order { id: created.id, total: 250.0 });

        svc.delete(created.id).await.unwrap();
        assert_eq!(svc.find_by_id(created.id).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(svc.delete(created.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn invalid_totals_never_reach_the_repository() {
        let (repo, svc) = mock_service();
        for bad in [0.0, -5.0, f64::NAN] {
            let err = svc.create(NewOrder { total: bad }).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidData);
            assert_eq!(err.to_string(), "total must be positive");
        }
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn invalid_patch_leaves_order_unchanged() {
        let (_, svc) = mock_service();
        let created = svc.create(NewOrder { total: 10.0 }).await.unwrap();
        let err = svc.patch(created.id, OrderPatch { total: Some(-1.0) }).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(svc.find_by_id(created.id).await.unwrap().total, 10.0);
    }

    #[tokio::test]
    async fn empty_patch_returns_current_state_or_not_found() {
        let (_, svc) = mock_service();
        let created = svc.create(NewOrder { total: 7.0 }).await.unwrap();
        assert_eq!(svc.patch(created.id, OrderPatch::default()).await.unwrap(), created);
        let err = svc.patch(999, OrderPatch::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn find_all_lists_every_order() {
        let (_, svc) = mock_service();
        assert!(svc.find_all().await.unwrap().is_empty());
        svc.create(NewOrder { total: 1.0 }).await.unwrap();
        svc.create(NewOrder { total: 2.0 }).await.unwrap();
        let totals: Vec<f64> = svc.find_all().await.unwrap().into_iter().map(|o| o.total).collect();
        assert_eq!(totals, vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn works_through_trait_object_over_sqlite() -> Result<(), anyhow::Error> {
        let repo: Arc<dyn OrderRepository> = Arc::new(SeaOrmOrderRepository::new(get_db().await?));
        let svc: OrderService<dyn OrderRepository> = OrderService::new(repo);
        let created = svc.create(NewOrder { total: 100.50 }).await?;
        let patched = svc.patch(created.id, OrderPatch { total: Some(250.0) }).await?;
        assert_eq!(patched.total, 250.0);
        svc.delete(created.id).await?;
        assert_eq!(svc.find_by_id(created.id).await.unwrap_err().kind(), ErrorKind::NotFound);
        Ok(())
    }
}
