//! Entity re-exports.

pub use super::auto_top_up_settings::Entity as AutoTopUpSettings;
pub use super::expenses::Entity as Expenses;
pub use super::notifications::Entity as Notifications;
pub use super::top_ups::Entity as TopUps;
pub use super::user_balances::Entity as UserBalances;
pub use super::users::Entity as Users;
