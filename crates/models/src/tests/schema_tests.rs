use anyhow::Result;
use chrono::Utc;
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, Set, SqlErr};
use uuid::Uuid;

use crate::db::connect_with_config;
use crate::{order, user};

async fn setup_test_db() -> Result<DatabaseConnection> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), max_connections: 1, min_connections: 1, ..DatabaseConfig::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn new_user(email: &str) -> user::ActiveModel {
    let now = Utc::now().into();
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password: Set("$argon2id$placeholder".into()),
        name: Set("Someone".into()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[tokio::test]
async fn order_ids_are_store_assigned() -> Result<()> {
    let db = setup_test_db().await?;
    let now = Utc::now().into();
    let first = order::ActiveModel { id: NotSet, total: Set(10.0), created_at: Set(now), updated_at: Set(now) }
        .insert(&db)
        .await?;
    let second = order::ActiveModel { id: NotSet, total: Set(20.0), created_at: Set(now), updated_at: Set(now) }
        .insert(&db)
        .await?;
    assert!(first.id > 0);
    assert_ne!(first.id, second.id);
    assert_eq!(order::Entity::find().all(&db).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_violates_unique_constraint() -> Result<()> {
    let db = setup_test_db().await?;
    new_user("dup@example.com").insert(&db).await?;
    let err = new_user("dup@example.com").insert(&db).await.unwrap_err();
    assert!(matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))), "unexpected error: {err}");
    assert_eq!(user::Entity::find().all(&db).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn rejects_invalid_config_before_connecting() {
    let cfg = DatabaseConfig::default();
    assert!(connect_with_config(&cfg).await.is_err());
}
