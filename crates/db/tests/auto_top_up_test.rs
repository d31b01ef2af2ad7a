//! Integration tests for auto top-up settings persistence.

mod common;

use gridx_core::auto_topup::{Frequency, SettingsInput};
use gridx_core::ledger::LedgerError;
use gridx_db::AutoTopUpRepository;
use gridx_db::entities::{auto_top_up_settings, notifications};
use gridx_shared::types::UserId;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use common::{create_user, setup_db};

async fn notification_count(db: &sea_orm::DatabaseConnection, user_id: UserId) -> u64 {
    notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user_id.into_inner()))
        .count(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_save_then_get_round_trips_and_enables() {
    let db = setup_db().await;
    let user_id = create_user(&db).await;
    let repo = AutoTopUpRepository::new(db.clone());

    let input = SettingsInput::new(dec!(100), dec!(50), "monthly").unwrap();
    let saved = repo.save_settings(user_id, input).await.unwrap();

    assert_eq!(saved.user_id, user_id);
    assert_eq!(saved.min_balance, dec!(100));
    assert_eq!(saved.top_up_amount, dec!(50));
    assert_eq!(saved.frequency, Frequency::Monthly);
    assert!(saved.is_enabled);

    let loaded = repo.get_settings(user_id).await.unwrap().expect("settings");
    assert_eq!(loaded.min_balance, dec!(100));
    assert_eq!(loaded.top_up_amount, dec!(50));
    assert_eq!(loaded.frequency, Frequency::Monthly);
    assert!(loaded.is_enabled);

    assert_eq!(notification_count(&db, user_id).await, 1);
}

#[tokio::test]
async fn test_save_replaces_existing_row_and_reenables() {
    let db = setup_db().await;
    let user_id = create_user(&db).await;
    let repo = AutoTopUpRepository::new(db.clone());

    repo.save_settings(user_id, SettingsInput::new(dec!(100), dec!(50), "weekly").unwrap())
        .await
        .unwrap();
    assert!(repo.toggle_enabled(user_id, false).await.unwrap());

    repo.save_settings(user_id, SettingsInput::new(dec!(20), dec!(75), "quarterly").unwrap())
        .await
        .unwrap();

    let rows = auto_top_up_settings::Entity::find()
        .filter(auto_top_up_settings::Column::UserId.eq(user_id.into_inner()))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    let loaded = repo.get_settings(user_id).await.unwrap().unwrap();
    assert_eq!(loaded.min_balance, dec!(20));
    assert_eq!(loaded.top_up_amount, dec!(75));
    assert_eq!(loaded.frequency, Frequency::Quarterly);
    assert!(loaded.is_enabled);
}

#[tokio::test]
async fn test_get_settings_none_when_never_saved() {
    let db = setup_db().await;
    let user_id = create_user(&db).await;
    let repo = AutoTopUpRepository::new(db);

    assert!(repo.get_settings(user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_frequency_never_reaches_storage() {
    let db = setup_db().await;
    let user_id = create_user(&db).await;
    let repo = AutoTopUpRepository::new(db.clone());

    let err = SettingsInput::parse("100", "50", "daily").unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));

    assert!(repo.get_settings(user_id).await.unwrap().is_none());
    assert_eq!(auto_top_up_settings::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_toggle_without_settings_creates_nothing() {
    let db = setup_db().await;
    let user_id = create_user(&db).await;
    let repo = AutoTopUpRepository::new(db.clone());

    assert!(!repo.toggle_enabled(user_id, true).await.unwrap());
    assert!(repo.get_settings(user_id).await.unwrap().is_none());
    assert_eq!(notification_count(&db, user_id).await, 0);
}

#[tokio::test]
async fn test_toggle_flips_flag_and_notifies() {
    let db = setup_db().await;
    let user_id = create_user(&db).await;
    let repo = AutoTopUpRepository::new(db.clone());

    repo.save_settings(user_id, SettingsInput::new(dec!(10), dec!(10), "weekly").unwrap())
        .await
        .unwrap();

    assert!(repo.toggle_enabled(user_id, false).await.unwrap());
    let loaded = repo.get_settings(user_id).await.unwrap().unwrap();
    assert!(!loaded.is_enabled);
    assert_eq!(loaded.min_balance, dec!(10));

    assert!(repo.toggle_enabled(user_id, true).await.unwrap());
    assert!(repo.get_settings(user_id).await.unwrap().unwrap().is_enabled);

    assert_eq!(notification_count(&db, user_id).await, 3);
}

#[tokio::test]
async fn test_save_for_unknown_user_is_not_found() {
    let db = setup_db().await;
    let repo = AutoTopUpRepository::new(db.clone());

    let err = repo
        .save_settings(UserId::new(), SettingsInput::new(dec!(1), dec!(1), "weekly").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::NotFound(_)));
    assert_eq!(auto_top_up_settings::Entity::find().count(&db).await.unwrap(), 0);
}

async fn fail_notification_inserts(db: &sea_orm::DatabaseConnection) {
    db.execute_unprepared(
        "CREATE TRIGGER fail_notifications BEFORE INSERT ON notifications \
         BEGIN SELECT RAISE(ABORT, 'notification store offline'); END;",
    )
    .await
    .expect("create trigger");
}

#[tokio::test]
async fn test_failed_notification_rolls_back_first_save() {
    let db = setup_db().await;
    let user_id = create_user(&db).await;
    let repo = AutoTopUpRepository::new(db.clone());
    fail_notification_inserts(&db).await;

    let err = repo
        .save_settings(user_id, SettingsInput::new(dec!(100), dec!(50), "weekly").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::TransactionFailed(_)), "{err:?}");
    assert!(repo.get_settings(user_id).await.unwrap().is_none());
    assert_eq!(auto_top_up_settings::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(notification_count(&db, user_id).await, 0);
}

#[tokio::test]
async fn test_failed_notification_keeps_previous_settings() {
    let db = setup_db().await;
    let user_id = create_user(&db).await;
    let repo = AutoTopUpRepository::new(db.clone());
    repo.save_settings(user_id, SettingsInput::new(dec!(100), dec!(50), "weekly").unwrap())
        .await
        .unwrap();
    assert!(repo.toggle_enabled(user_id, false).await.unwrap());
    fail_notification_inserts(&db).await;

    let err = repo
        .save_settings(user_id, SettingsInput::new(dec!(5), dec!(5), "quarterly").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::TransactionFailed(_)), "{err:?}");

    let err = repo.toggle_enabled(user_id, true).await.unwrap_err();
    assert!(matches!(err, LedgerError::TransactionFailed(_)), "{err:?}");

    let loaded = repo.get_settings(user_id).await.unwrap().unwrap();
    assert_eq!(loaded.min_balance, dec!(100));
    assert_eq!(loaded.top_up_amount, dec!(50));
    assert_eq!(loaded.frequency, Frequency::Weekly);
    assert!(!loaded.is_enabled);
    assert_eq!(notification_count(&db, user_id).await, 2);
}
