use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};

use models::order;

use crate::errors::ServiceError;
use crate::order::domain::{NewOrder, Order, OrderPatch};
use crate::order::repository::OrderRepository;

const ENTITY: &str = "order";

pub struct SeaOrmOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn save(&self, input: NewOrder) -> Result<Order, ServiceError> {
        let now = Utc::now().into();
        let am = order::ActiveModel {
            id: NotSet,
            total: Set(input.total),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = am.insert(&self.db).await.map_err(|e| ServiceError::from_db(ENTITY, e))?;
        Ok(created.into())
    }

    async fn find_all(&self) -> Result<Vec<Order>, ServiceError> {
        let rows = order::Entity::find()
            .order_by_asc(order::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::from_db(ENTITY, e))?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Order, ServiceError> {
        order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::from_db(ENTITY, e))?
            .map(Order::from)
            .ok_or_else(|| ServiceError::not_found(ENTITY))
    }

    /// Single conditional UPDATE; zero affected rows means the id is unknown.
    async fn patch(&self, id: i32, patch: &OrderPatch) -> Result<(), ServiceError> {
        let Some(total) = patch.total else {
            return self.find_by_id(id).await.map(|_| ());
        };
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let res = order::Entity::update_many()
            .col_expr(order::Column::Total, Expr::value(total))
            .col_expr(order::Column::UpdatedAt, Expr::value(now))
            .filter(order::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::from_db(ENTITY, e))?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found(ENTITY));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let res = order::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::from_db(ENTITY, e))?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found(ENTITY));
        }
        Ok(())
    }
}
