//! `SeaORM` entity definitions.

pub mod prelude;

pub mod auto_top_up_settings;
pub mod expenses;
pub mod notifications;
pub mod sea_orm_active_enums;
pub mod top_ups;
pub mod user_balances;
pub mod users;
