//! Utility helpers shared across UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (storage, route gating) and pure
//! display logic from page and component code.

pub mod auth;
pub mod format;
pub mod search;
pub mod storage;
