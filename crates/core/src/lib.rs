//! Core business logic for GridX.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and derived text live here.
//!
//! # Modules
//!
//! - `ledger` - Top-up validation, planning, and the ledger error taxonomy
//! - `auto_topup` - Auto top-up settings types and validation

pub mod auto_topup;
pub mod ledger;
