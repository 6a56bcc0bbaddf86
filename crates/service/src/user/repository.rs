use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewUser, User, UserPatch};
use crate::errors::ServiceError;

/// Repository abstraction for user persistence.
///
/// `save` generates the identifier and fails with `AlreadyExists` when the
/// email is taken. `find_by_email` reports absence as `Ok(None)`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, input: NewUser) -> Result<User, ServiceError>;
    async fn find_all(&self) -> Result<Vec<User>, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<User, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;
    async fn patch(&self, id: Uuid, patch: &UserPatch) -> Result<(), ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        users: RwLock<Vec<User>>,
    }

    impl InMemoryUserRepository {
        pub async fn count_by_email(&self, email: &str) -> usize {
            self.users.read().await.iter().filter(|u| u.email == email).count()
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn save(&self, input: NewUser) -> Result<User, ServiceError> {
            let mut users = self.users.write().await;
            if users.iter().any(|u| u.email == input.email) {
                return Err(ServiceError::already_exists("user"));
            }
            let user = User { id: Uuid::new_v4(), email: input.email, name: input.name, password_hash: input.password_hash };
            users.push(user.clone());
            Ok(user)
        }

        async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
            Ok(self.users.read().await.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<User, ServiceError> {
            self.users.read().await.iter().find(|u| u.id == id).cloned().ok_or_else(|| ServiceError::not_found("user"))
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
            Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
        }

        async fn patch(&self, id: Uuid, patch: &UserPatch) -> Result<(), ServiceError> {
            let mut users = self.users.write().await;
            let user = users.iter_mut().find(|u| u.id == id).ok_or_else(|| ServiceError::not_found("user"))?;
            if let Some(name) = &patch.name {
                user.name = name.clone();
            }
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
            let mut users = self.users.write().await;
            let before = users.len();
            users.retain(|u| u.id != id);
            if users.len() == before {
                return Err(ServiceError::not_found("user"));
            }
            Ok(())
        }
    }
}
