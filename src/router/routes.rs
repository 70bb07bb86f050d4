//! Route declaration for the ledger UI.
//!
//! Everything under the unnamed wrapper node requires a valid session; home
//! and login stay public. List and detail views are lazy bindings so their
//! bundles resolve on first visit.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use super::table::{RouteSpec, RouteTable};
use super::view::{LazyView, ViewBinding, ViewKind};
use crate::error::RouteError;

pub const HOME: &str = "home";
pub const LOGIN: &str = "login";
pub const ACCOUNTS: &str = "accounts";
pub const ACCOUNT: &str = "account";
pub const ACCOUNT_EDIT: &str = "account-edit";
pub const GROUPS: &str = "groups";
pub const TRANSACTIONS: &str = "transactions";

fn lazy(bundle: &str, kind: ViewKind) -> ViewBinding {
    ViewBinding::Lazy(LazyView::ready(bundle, kind))
}

pub fn ledger_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::new("/").named(HOME).eager(ViewKind::Home),
        RouteSpec::new("login").named(LOGIN).eager(ViewKind::Login),
        RouteSpec::new("").needs_auth(true).children(vec![
            RouteSpec::new("accounts").named(ACCOUNTS).view(lazy("accounts", ViewKind::Accounts)).children(vec![
                RouteSpec::new(":id")
                    .named(ACCOUNT)
                    .view(lazy("account_detail", ViewKind::Account))
                    .children(vec![
                        RouteSpec::new("edit").named(ACCOUNT_EDIT).view(lazy("account_edit", ViewKind::AccountEdit)),
                    ]),
            ]),
            RouteSpec::new("groups").named(GROUPS).view(lazy("groups", ViewKind::Groups)),
            RouteSpec::new("transactions").named(TRANSACTIONS).view(lazy("transactions", ViewKind::Transactions)),
        ]),
    ]
}

/// # Errors
///
/// Returns [`RouteError::InvalidDeclaration`] if the declaration is inconsistent.
pub fn ledger_table() -> Result<RouteTable, RouteError> {
    RouteTable::new(ledger_routes())
}
