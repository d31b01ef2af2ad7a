//! Repository implementations for data access.
//!
//! Every write path runs inside one database transaction and is bounded by
//! the repository's operation timeout. Storage failures surface as
//! [`LedgerError`] so callers see one error taxonomy.

pub mod auto_top_up;
pub mod expense;
pub mod notification;
pub mod top_up;
pub mod user;

pub use auto_top_up::AutoTopUpRepository;
pub use expense::ExpenseRepository;
pub use notification::NotificationRepository;
pub use top_up::TopUpRepository;
pub use user::UserRepository;

use std::future::Future;
use std::time::Duration;

use gridx_core::ledger::LedgerError;
use gridx_shared::types::UserId;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait};

use crate::entities::users;

/// Default bound on a single repository operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Maps a database error onto the ledger taxonomy.
///
/// Pool and connection failures mean the store could not be reached; anything
/// else happened while talking to it.
pub(crate) fn storage_error(err: DbErr) -> LedgerError {
    match &err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            LedgerError::StorageUnavailable(err.to_string())
        }
        _ => LedgerError::TransactionFailed(err.to_string()),
    }
}

/// Runs `fut` with an upper bound on its duration.
///
/// An open transaction inside `fut` is dropped on timeout, which rolls it back.
pub(crate) async fn bounded<T, F>(
    limit: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, LedgerError>
where
    F: Future<Output = Result<T, LedgerError>>,
{
    tokio::time::timeout(limit, fut).await.map_err(|_| {
        LedgerError::StorageUnavailable(format!(
            "{operation} timed out after {}ms",
            limit.as_millis()
        ))
    })?
}

/// Fails with [`LedgerError::NotFound`] unless the user row exists.
pub(crate) async fn ensure_user<C: ConnectionTrait>(
    conn: &C,
    user_id: UserId,
) -> Result<(), LedgerError> {
    users::Entity::find_by_id(user_id.into_inner())
        .one(conn)
        .await
        .map_err(storage_error)?
        .map(|_| ())
        .ok_or(LedgerError::NotFound(user_id))
}
