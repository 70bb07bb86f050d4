//! View bindings for route nodes, including lazily resolved bundles.
//!
//! DESIGN
//! ======
//! A lazy binding is a loader returning a future. The first request starts it
//! and every later request awaits the same shared future, so a bundle loads
//! at most once. A failed load is forgotten and retried on the next request.
//! Only the route outlet awaits these futures; the navigation gate decides
//! from route metadata alone.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt as _;
use futures::future::{self, BoxFuture, Shared};

use crate::error::ViewLoadError;

/// Presentation a route renders once admitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Home,
    Login,
    Accounts,
    Account,
    AccountEdit,
    Groups,
    Transactions,
}

pub type ViewFuture = BoxFuture<'static, Result<ViewKind, ViewLoadError>>;

type Loader = Arc<dyn Fn() -> ViewFuture + Send + Sync>;

/// A view whose implementation is resolved on first navigation.
#[derive(Clone)]
pub struct LazyView {
    bundle: String,
    loader: Loader,
    pending: Arc<Mutex<Option<Shared<ViewFuture>>>>,
}

impl LazyView {
    pub fn new<F>(bundle: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> ViewFuture + Send + Sync + 'static,
    {
        Self { bundle: bundle.into(), loader: Arc::new(loader), pending: Arc::new(Mutex::new(None)) }
    }

    /// Lazy binding around a view that is already compiled in.
    pub fn ready(bundle: impl Into<String>, kind: ViewKind) -> Self {
        Self::new(bundle, move || future::ready(Ok(kind)).boxed())
    }

    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// Start (or join) resolution of this bundle.
    pub fn resolve(&self) -> Shared<ViewFuture> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(shared) = pending.as_ref() {
            if !matches!(shared.peek(), Some(Err(_))) {
                return shared.clone();
            }
        }
        let shared = (self.loader)().shared();
        *pending = Some(shared.clone());
        shared
    }

    /// `true` once a load finished successfully.
    pub fn is_loaded(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        matches!(pending.as_ref().and_then(Shared::peek), Some(Ok(_)))
    }
}

impl fmt::Debug for LazyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyView")
            .field("bundle", &self.bundle)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

/// What a route node renders.
#[derive(Clone, Debug, Default)]
pub enum ViewBinding {
    /// Structural node only; renders the nearest ancestor view.
    #[default]
    None,
    Eager(ViewKind),
    Lazy(LazyView),
}

impl ViewBinding {
    pub fn lazy<F>(bundle: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> ViewFuture + Send + Sync + 'static,
    {
        ViewBinding::Lazy(LazyView::new(bundle, loader))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ViewBinding::None)
    }

    /// Future yielding the view. Eager bindings resolve immediately.
    pub fn load(&self) -> ViewFuture {
        match self {
            ViewBinding::None => future::ready(Err(ViewLoadError::Failed {
                bundle: "<none>".to_owned(),
                reason: "route has no view".to_owned(),
            }))
            .boxed(),
            ViewBinding::Eager(kind) => future::ready(Ok(*kind)).boxed(),
            ViewBinding::Lazy(lazy) => lazy.resolve().boxed(),
        }
    }
}
