//! Auto top-up settings.
//!
//! Only configuration lives here. Nothing in this crate acts on the settings;
//! a scheduler would read them through the storage layer.

pub mod types;
pub mod validation;

pub use types::{AutoTopUpSettings, Frequency};
pub use validation::SettingsInput;
