//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns its data loading and form handling and is mounted by the
//! route outlet once the navigation gate admits its route. Pages never check
//! the session themselves; a token rejected by the ledger is cleared and the
//! next navigation goes through login.

pub mod account;
pub mod accounts;
pub mod groups;
pub mod home;
pub mod login;
pub mod transactions;
