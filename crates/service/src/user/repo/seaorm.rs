use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use models::user;

use crate::errors::ServiceError;
use crate::user::domain::{NewUser, User, UserPatch};
use crate::user::repository::UserRepository;

const ENTITY: &str = "user";

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn save(&self, input: NewUser) -> Result<User, ServiceError> {
        let now = Utc::now().into();
        let am = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            password: Set(input.password_hash),
            name: Set(input.name),
            created_at: Set(now),
            updated_at: Set(now),
        };
        // the unique index on email is the final word on duplicates
        let created = am.insert(&self.db).await.map_err(|e| ServiceError::from_db(ENTITY, e))?;
        Ok(created.into())
    }

    async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        let rows = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::from_db(ENTITY, e))?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<User, ServiceError> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::from_db(ENTITY, e))?
            .map(User::from)
            .ok_or_else(|| ServiceError::not_found(ENTITY))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let row = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::from_db(ENTITY, e))?;
        Ok(row.map(User::from))
    }

    async fn patch(&self, id: Uuid, patch: &UserPatch) -> Result<(), ServiceError> {
        let Some(name) = patch.name.clone() else {
            return self.find_by_id(id).await.map(|_| ());
        };
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let res = user::Entity::update_many()
            .col_expr(user::Column::Name, Expr::value(name))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::from_db(ENTITY, e))?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found(ENTITY));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let res = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::from_db(ENTITY, e))?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found(ENTITY));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use crate::ErrorKind;

    fn new_user(email: &str) -> NewUser {
        NewUser { email: email.into(), name: "Ann".into(), password_hash: "$argon2id$stub".into() }
    }

    #[tokio::test]
    async fn save_and_lookup() -> Result<(), anyhow::Error> {
        let repo = SeaOrmUserRepository::new(get_db().await?);
        let saved = repo.save(new_user("a@x.com")).await?;
        assert_eq!(repo.find_by_id(saved.id).await?, saved);
        assert_eq!(repo.find_by_email("a@x.com").await?, Some(saved.clone()));
        assert_eq!(repo.find_by_email("b@x.com").await?, None);
        assert_eq!(repo.find_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_already_exists() -> Result<(), anyhow::Error> {
        let repo = SeaOrmUserRepository::new(get_db().await?);
        repo.save(new_user("dup@x.com")).await?;
        let err = repo.save(new_user("dup@x.com")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(repo.find_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn patch_and_delete() -> Result<(), anyhow::Error> {
        let repo = SeaOrmUserRepository::new(get_db().await?);
        let saved = repo.save(new_user("p@x.com")).await?;

        repo.patch(saved.id, &UserPatch { name: Some("Bea".into()) }).await?;
        let patched = repo.find_by_id(saved.id).await?;
        assert_eq!(patched.name, "Bea");
        assert_eq!(patched.email, saved.email);
        assert_eq!(patched.password_hash, saved.password_hash);

        repo.delete(saved.id).await?;
        assert_eq!(repo.find_by_id(saved.id).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(repo.delete(saved.id).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(
            repo.patch(saved.id, &UserPatch { name: Some("x".into()) }).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(repo.patch(saved.id, &UserPatch::default()).await.unwrap_err().kind(), ErrorKind::NotFound);
        Ok(())
    }
}
