//! Error types shared across routing, view loading, config, and the REST client.
//!
//! ERROR HANDLING
//! ==============
//! Session problems (missing, expired, malformed token) are not errors here:
//! the navigation gate folds them into a redirect. Only failures that must
//! surface to the user or to the rendering layer get a variant.

/// Route table construction and lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// No routable node matches the requested path.
    #[error("no route matches path {path}")]
    Unresolved { path: String },

    /// No node carries the requested name.
    #[error("no route named {name}")]
    UnknownName { name: String },

    /// A `:param` segment of the named route has no value in the supplied params.
    #[error("route {name} requires param {param}")]
    MissingParam { name: String, param: String },

    /// The route declaration itself is inconsistent.
    #[error("invalid route declaration: {0}")]
    InvalidDeclaration(String),
}

/// A lazily loaded view bundle failed to resolve.
///
/// Cloneable because the resolution future is shared between every consumer
/// awaiting the same node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewLoadError {
    #[error("view bundle {bundle} failed to load: {reason}")]
    Failed { bundle: String, reason: String },
}

/// Application configuration could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config value {key} is empty")]
    Empty { key: &'static str },

    #[error("config value {key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Ledger REST API failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("{operation} failed: {status}")]
    Status { operation: &'static str, status: u16 },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// A bearer token is required but the session store holds none.
    #[error("not signed in")]
    Unauthenticated,

    /// The call is only available in the browser build.
    #[error("not available outside the browser")]
    Unavailable,
}
