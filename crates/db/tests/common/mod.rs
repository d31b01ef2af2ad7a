//! Shared setup for repository tests: a migrated in-memory SQLite database.

#![allow(dead_code)]

use gridx_db::UserRepository;
use gridx_db::migration::{Migrator, MigratorTrait};
use gridx_shared::types::UserId;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Opens a fresh in-memory database with the schema applied.
///
/// The pool holds a single connection; every connection to `sqlite::memory:`
/// would otherwise see its own empty database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Inserts a user with a unique email and returns its id.
pub async fn create_user(db: &DatabaseConnection) -> UserId {
    let email = format!("user-{}@example.com", Uuid::new_v4());
    let user = UserRepository::new(db.clone())
        .create(&email, "not-a-real-hash", "Test User")
        .await
        .expect("Failed to create user");
    UserId::from_uuid(user.id)
}
