//! Error types for waypoint-core

use crate::Method;
use thiserror::Error;
use waypoint_router::{InsertError, NotFound};

/// Result type alias for waypoint operations
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a caller can get back from routing or URL generation.
///
/// None of these leave the router or the URL generator in a modified state.
#[derive(Debug, Error)]
pub enum Error {
    /// Method outside the allowed set
    #[error("Invalid HTTP method '{0}'. Use a valid HTTP method: {}.", Method::LIST)]
    InvalidMethod(String),

    /// No routes registered for this method
    #[error("Method \"{0}\" is not allowed.")]
    MethodNotAllowed(Method),

    /// Path does not resolve to a bound route
    #[error(transparent)]
    ResourceNotFound(#[from] NotFound),

    /// Route definition rejected at registration
    #[error(transparent)]
    InvalidRoute(#[from] InsertError),

    /// URL generation for a name that was never registered
    #[error("Named route \"{0}\" doesn't exist.")]
    UnknownNamedRoute(String),

    /// Path parameter absent from the supplied values
    #[error("Missing parameter \"{0}\"")]
    MissingParameter(String),

    /// Absolute URL requested without scheme or host
    #[error("Option \"{0}\" is missing to generate absolute url")]
    MissingAbsoluteUrlOption(&'static str),
}

impl Error {
    /// Maps to a 404 at the transport layer
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ResourceNotFound(_))
    }

    /// Maps to a 405 at the transport layer
    pub fn is_method_not_allowed(&self) -> bool {
        matches!(self, Error::MethodNotAllowed(_))
    }
}
