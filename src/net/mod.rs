//! Ledger REST client.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the HTTP calls against the ledger gateway and `types`
//! defines the JSON shapes it exchanges.

pub mod api;
pub mod types;
