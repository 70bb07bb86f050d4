//! Session token storage and validity.
//!
//! SYSTEM CONTEXT
//! ==============
//! `store` owns the persisted token, `token` defines its shape and decides
//! whether it is usable right now. The navigation gate reads both but never
//! writes.

pub mod store;
pub mod token;

pub use store::{BrowserSlot, MemorySlot, SessionSlot, SessionStore};
pub use token::{Clock, FixedClock, SessionRead, SessionToken, SystemClock, TokenValidator, Validity};
