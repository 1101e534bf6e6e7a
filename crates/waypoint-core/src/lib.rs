//! waypoint-core: HTTP request routing and reverse URL generation
//!
//! Resolves a `(method, path)` pair to the handler registered for it and the
//! path parameters it captured, and rebuilds concrete URLs from named routes.
//! Serving connections and running handlers is left to the caller.
//!
//! ## Example
//! ```
//! use waypoint_core::{RequestContext, RouteDefinition, Router, UrlOverrides};
//!
//! let mut router = Router::new();
//! router.add_route(RouteDefinition::new("/", "GET", "home")).unwrap();
//! router
//!     .add_named_route(
//!         "user",
//!         RouteDefinition::new("/users/:name", "GET", "greet").requirement("name", "[a-zA-Z]+"),
//!     )
//!     .unwrap();
//!
//! let ctx = RequestContext::new("/users/ada?lang=en", "get").unwrap();
//! let m = router.match_route(&ctx).unwrap();
//! assert_eq!(*m.handler, "greet");
//! assert_eq!(m.param("name"), Some("ada"));
//!
//! let url = router.generate_url("user", [("name", "ada")], &UrlOverrides::new()).unwrap();
//! assert_eq!(url, "/users/ada");
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod error;
pub mod method;
pub mod route;
pub mod router;
pub mod url;

// Re-exports
pub use config::RouterConfig;
pub use context::{normalize_path, RequestContext};
pub use error::{Error, Result};
pub use method::Method;
pub use route::{Methods, NamedRoute, RouteDefinition};
pub use router::Router;
pub use url::{UrlGenerator, UrlOptions, UrlOverrides, UrlParams};

pub use waypoint_router::{Constraint, InsertError, Match, NodeRef, NotFound, Requirements, Tree};
