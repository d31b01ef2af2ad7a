//! Expense repository.

use std::time::Duration;

use gridx_core::ledger::LedgerError;
use gridx_shared::types::{PageRequest, PageResponse, UserId};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use super::{DEFAULT_OPERATION_TIMEOUT, bounded, storage_error};
use crate::entities::expenses;

/// Read access to the expense log. Rows are written by top-ups.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Overrides the per-operation timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lists a user's expenses, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn list(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> Result<PageResponse<expenses::Model>, LedgerError> {
        let page = page.normalized();
        bounded(self.timeout, "list_expenses", async {
            let query = expenses::Entity::find()
                .filter(expenses::Column::UserId.eq(user_id.into_inner()));

            let total = query.clone().count(&self.db).await.map_err(storage_error)?;
            let rows = query
                .order_by_desc(expenses::Column::CreatedAt)
                .order_by_desc(expenses::Column::Id)
                .offset(page.offset())
                .limit(page.limit())
                .all(&self.db)
                .await
                .map_err(storage_error)?;

            Ok(PageResponse::new(rows, page.page, page.per_page, total))
        })
        .await
    }
}
