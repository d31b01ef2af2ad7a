//! Database seeder for GridX development.
//!
//! Creates a demo user with a starting balance and default auto top-up
//! settings, then prints a bearer token for it. Safe to run repeatedly.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use gridx_core::auto_topup::SettingsInput;
use gridx_core::ledger::TopUpRequest;
use gridx_db::entities::users;
use gridx_db::{AutoTopUpRepository, TopUpRepository};
use gridx_shared::types::UserId;
use gridx_shared::{AppConfig, JwtConfig, JwtService};

/// Demo user id (stable across runs).
const DEMO_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = gridx_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding demo user...");
    seed_demo_user(&db).await?;
    let user_id = UserId::from_uuid(DEMO_USER_ID);

    let top_ups = TopUpRepository::new(db.clone()).with_currency(config.ledger.currency);
    if top_ups.get_balance(user_id).await? == Decimal::ZERO {
        println!("Crediting starting balance...");
        let request = TopUpRequest::new(user_id, Decimal::from(250), "seed", None, None)?;
        let receipt = top_ups.process_top_up(request).await?;
        println!("  Balance is now {}", receipt.new_balance);
    } else {
        println!("  Demo user already has a balance, skipping...");
    }

    let settings = AutoTopUpRepository::new(db.clone()).with_currency(config.ledger.currency);
    if settings.get_settings(user_id).await?.is_none() {
        println!("Saving default auto top-up settings...");
        let input = SettingsInput::new(Decimal::from(50), Decimal::from(100), "monthly")?;
        settings.save_settings(user_id, input).await?;
    }

    let jwt = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_secs: 24 * 60 * 60,
    });
    let token = jwt.generate_access_token(DEMO_USER_ID)?;

    println!("Seeding complete!");
    println!("  User id: {DEMO_USER_ID}");
    println!("  Bearer token (24h): {token}");

    Ok(())
}

/// Inserts the demo user unless it already exists.
async fn seed_demo_user(db: &DatabaseConnection) -> anyhow::Result<()> {
    if users::Entity::find_by_id(DEMO_USER_ID).one(db).await?.is_some() {
        println!("  Demo user already exists, skipping...");
        return Ok(());
    }

    let now = Utc::now().into();
    users::ActiveModel {
        id: Set(DEMO_USER_ID),
        email: Set("demo@gridx.dev".to_string()),
        password_hash: Set("$argon2id$v=19$m=65536,t=3,p=4$demo_hash".to_string()),
        full_name: Set("Demo User".to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    println!("  Created demo@gridx.dev");
    Ok(())
}
