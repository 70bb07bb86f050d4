//! Route table, navigation gate, and login-intent handling.
//!
//! SYSTEM CONTEXT
//! ==============
//! `table` and `view` describe what can be navigated to, `gate` decides
//! whether a navigation may proceed, `intent` carries a denied target through
//! the login flow, and `routes` is the ledger UI's concrete declaration.

pub mod gate;
pub mod intent;
pub mod location;
pub mod routes;
pub mod table;
pub mod view;

pub use gate::{Attempt, AttemptTracker, Decision, NavigationGate, NavigationTarget, Redirect};
pub use intent::{IntendedDestination, IntentCarrier};
pub use location::Location;
pub use table::{NodeId, Params, RouteMatch, RouteMeta, RouteNode, RouteSpec, RouteTable};
pub use view::{LazyView, ViewBinding, ViewKind};
