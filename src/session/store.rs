//! Durable single-slot storage for the current session token.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store is created once at startup and handed to the navigation gate and
//! the login/logout views. Nothing else reads the slot.
//!
//! ERROR HANDLING
//! ==============
//! A value that fails to deserialize reads as absent. The gate then denies
//! entry to guarded routes instead of crashing the navigation pipeline.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;

use super::token::{SessionRead, SessionToken};
use crate::util::storage;

/// A single opaque string slot that survives reloads.
pub trait SessionSlot {
    fn read(&self) -> Option<String>;
    fn write(&self, raw: &str);
    fn remove(&self);
}

/// Slot backed by one `localStorage` key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrowserSlot {
    key: String,
}

impl BrowserSlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl SessionSlot for BrowserSlot {
    fn read(&self) -> Option<String> {
        storage::load_raw(&self.key)
    }

    fn write(&self, raw: &str) {
        storage::save_raw(&self.key, raw);
    }

    fn remove(&self) {
        storage::remove(&self.key);
    }
}

/// In-process slot for tests and non-browser builds.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: RefCell<Option<String>>,
}

impl MemorySlot {
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { value: RefCell::new(Some(raw.into())) }
    }
}

impl SessionSlot for MemorySlot {
    fn read(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    fn write(&self, raw: &str) {
        *self.value.borrow_mut() = Some(raw.to_owned());
    }

    fn remove(&self) {
        *self.value.borrow_mut() = None;
    }
}

/// Typed access to the session slot.
#[derive(Clone, Debug, Default)]
pub struct SessionStore<S> {
    slot: S,
}

impl<S: SessionSlot> SessionStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Read the slot, keeping track of whether a stored value was corrupt.
    pub fn load(&self) -> SessionRead {
        let Some(raw) = self.slot.read() else {
            return SessionRead::Absent;
        };
        match serde_json::from_str::<SessionToken>(&raw) {
            Ok(token) => SessionRead::Present(token),
            Err(e) => {
                leptos::logging::warn!("stored session is malformed: {e}");
                SessionRead::Malformed
            }
        }
    }

    pub fn get(&self) -> Option<SessionToken> {
        match self.load() {
            SessionRead::Present(token) => Some(token),
            SessionRead::Absent | SessionRead::Malformed => None,
        }
    }

    pub fn set(&self, token: &SessionToken) {
        match serde_json::to_string(token) {
            Ok(raw) => self.slot.write(&raw),
            Err(e) => leptos::logging::warn!("session token not stored: {e}"),
        }
    }

    pub fn clear(&self) {
        self.slot.remove();
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }
}
