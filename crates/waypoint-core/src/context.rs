//! Request context: the normalized (path, method) pair a lookup runs on

use crate::{Method, Result};

/// Normalize a raw request target into a matchable path.
///
/// Strips trailing `/` characters, guarantees a leading `/`, then drops the
/// query string. Slashes right before a query survive: `/users/?a=1` keeps
/// its empty last segment.
///
/// ```
/// use waypoint_core::normalize_path;
///
/// assert_eq!(normalize_path("/users//"), "/users");
/// assert_eq!(normalize_path("users?page=2"), "/users");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    let path = if !trimmed.starts_with('/') {
        format!("/{trimmed}")
    } else {
        trimmed.to_string()
    };
    match path.split_once('?') {
        Some((path, _)) => path.to_string(),
        None => path,
    }
}

/// Validated request path and method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    path: String,
    method: Method,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            method: Method::Get,
        }
    }
}

impl RequestContext {
    /// Build a context, normalizing the path and validating the method
    pub fn new(path: &str, method: &str) -> Result<Self> {
        Ok(Self {
            path: normalize_path(path),
            method: method.parse()?,
        })
    }

    /// Build from a transport-layer request (request target and method)
    pub fn from_request<B>(req: &http::Request<B>) -> Result<Self> {
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        Ok(Self {
            path: normalize_path(target),
            method: Method::try_from(req.method())?,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn set_path(&mut self, path: &str) {
        self.path = normalize_path(path);
    }

    /// Replace the method. On error the previous method is kept.
    pub fn set_method(&mut self, method: &str) -> Result<()> {
        self.method = method.parse()?;
        Ok(())
    }
}
