//! 测试辅助：内存 SQLite + 正式迁移

use crate::entities::{UserRole, user_entity as users};
use crate::services::level_for;
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

pub async fn test_db() -> DatabaseConnection {
    // 内存库每个连接独立，必须只保留一个连接
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn insert_user(
    db: &DatabaseConnection,
    username: &str,
    role: UserRole,
    points: i64,
    all_points: i64,
) -> users::Model {
    users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(Some(format!("{username}@example.com"))),
        role: Set(role),
        points: Set(points),
        all_points: Set(all_points),
        level: Set(level_for(all_points)),
        created_at: Set(Some(Utc::now())),
        updated_at: Set(Some(Utc::now())),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
