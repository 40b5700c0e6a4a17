//! Error handling for the router.
//!
//! Every fallible router operation returns [`NavigationResult`], whose error
//! side is [`NavigationError`]:
//!
//! | Variant | Raised by | Surfaced as |
//! |---------|-----------|-------------|
//! | `RouteNotFound` / `NamedRouteNotFound` | resolver | before any guard runs |
//! | `NavigationCancelled` | a guard | navigation future |
//! | `NavigationRedirect` | a guard | consumed by the dispatcher |
//! | `InvalidGuard` | guard pipeline | navigation future |
//! | `NavigationFailed` | host callback | navigation future |
//! | `ContextMissing` | `use_router` / `use_route` | accessor call |
//! | `InvalidConfig` | `RouterOptions::from_json` | construction |
//!
//! # Examples
//!
//! ```
//! use uni_mini_router::NavigationError;
//!
//! let err = NavigationError::RouteNotFound { path: "/pages/missing".into() };
//! assert!(err.is_not_found());
//! assert_eq!(err.to_string(), "Route not found: '/pages/missing' is not in the route table");
//! ```

use crate::location::RouteLocationRaw;
use std::fmt;

/// Result alias used across the crate.
pub type NavigationResult<T> = Result<T, NavigationError>;

/// Errors that can occur while resolving or performing a navigation.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display).
#[derive(Debug, Clone)]
pub enum NavigationError {
    /// No route record has this path or alias.
    RouteNotFound { path: String },

    /// No route record has this name.
    NamedRouteNotFound { name: String },

    /// A before-guard cancelled the navigation.
    NavigationCancelled,

    /// A before-guard asked for a different target.
    ///
    /// The router turns this into a fresh navigation; callers never see it
    /// from `push` and friends.
    NavigationRedirect { to: Box<RouteLocationRaw> },

    /// A continuation guard settled without calling `next`.
    InvalidGuard { guard: String },

    /// The host navigation API reported a failure.
    NavigationFailed { message: String },

    /// An accessor was used on a context the router was never installed in.
    ContextMissing { accessor: &'static str },

    /// The route table could not be loaded.
    InvalidConfig { message: String },
}

impl NavigationError {
    /// `true` for both path and name lookup failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RouteNotFound { .. } | Self::NamedRouteNotFound { .. }
        )
    }

    /// `true` when a guard cancelled the navigation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::NavigationCancelled)
    }

    /// `true` for the internal redirect signal.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::NavigationRedirect { .. })
    }

    /// The redirect target, if this is a redirect signal.
    pub fn redirect_target(&self) -> Option<&RouteLocationRaw> {
        match self {
            Self::NavigationRedirect { to } => Some(to),
            _ => None,
        }
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::RouteNotFound { path } => {
                write!(f, "Route not found: '{}' is not in the route table", path)
            }
            NavigationError::NamedRouteNotFound { name } => {
                write!(f, "Route not found: no route is named '{}'", name)
            }
            NavigationError::NavigationCancelled => write!(f, "Navigation cancelled"),
            NavigationError::NavigationRedirect { to } => {
                write!(f, "Navigation redirected to {}", to)
            }
            NavigationError::InvalidGuard { guard } => {
                write!(f, "Invalid navigation guard: {}", guard)
            }
            NavigationError::NavigationFailed { message } => {
                write!(f, "Navigation failed: {}", message)
            }
            NavigationError::ContextMissing { accessor } => write!(
                f,
                "{} can only be used on a context the router was installed in; \
                 call Router::install on the app context first",
                accessor
            ),
            NavigationError::InvalidConfig { message } => {
                write!(f, "Invalid router configuration: {}", message)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

impl From<serde_json::Error> for NavigationError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig {
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
