use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::auth::{HashCost, PasswordHasher, TokenKeys};
use service::order::repo::seaorm::SeaOrmOrderRepository;
use service::order::{OrderRepository, OrderService};
use service::user::repo::seaorm::SeaOrmUserRepository;
use service::user::{UserRepository, UserService};
use service::ServiceError;

/// Shared use-case graph handed to both transports.
#[derive(Clone)]
pub struct ServerState {
    pub orders: Arc<OrderService<dyn OrderRepository>>,
    pub users: Arc<UserService<dyn UserRepository>>,
}

impl ServerState {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        tokens: Arc<TokenKeys>,
    ) -> Self {
        Self {
            orders: Arc::new(OrderService::new(orders)),
            users: Arc::new(UserService::new(users, hasher, tokens)),
        }
    }

    /// Wire the SeaORM repositories over one connection pool.
    pub fn from_db(db: DatabaseConnection, auth: &configs::AuthConfig) -> Result<Self, ServiceError> {
        let hasher = PasswordHasher::new(HashCost::from_config(auth))?;
        let tokens = Arc::new(TokenKeys::from_config(auth));
        Ok(Self::new(
            Arc::new(SeaOrmOrderRepository::new(db.clone())),
            Arc::new(SeaOrmUserRepository::new(db)),
            hasher,
            tokens,
        ))
    }

    pub fn tokens(&self) -> &Arc<TokenKeys> { self.users.tokens() }
}
