//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `route_outlet` turns the current location into a gated, lazily loaded
//! page; the rest is chrome shared by the pages.

pub mod nav_bar;
pub mod route_outlet;
pub mod search_field;
