//! Reverse routing: build URLs from named routes
//!
//! Path parameters are substituted into the route pattern; anything left over
//! is appended as a query string in the order it was supplied. Values (not
//! query keys) are percent-encoded with the URI component set
//! (`encodeURIComponent` rules).

use crate::route::NamedRoute;
use crate::{Error, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashMap;
use std::fmt::Display;
use tracing::debug;
use waypoint_router::{param_name, split};

/// Everything except unreserved marks is escaped
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(value: &str) -> impl Display + '_ {
    utf8_percent_encode(value, COMPONENT)
}

/// Resolved generation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOptions {
    pub is_absolute: bool,
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            is_absolute: false,
            scheme: Some("http".to_string()),
            host: Some("localhost".to_string()),
            port: Some(3000),
        }
    }
}

/// Per-call options layered over the generator defaults.
///
/// Fields left untouched inherit the default; `without_*` explicitly unsets one.
#[derive(Debug, Clone, Default)]
pub struct UrlOverrides {
    is_absolute: Option<bool>,
    scheme: Option<Option<String>>,
    host: Option<Option<String>>,
    port: Option<Option<u16>>,
}

impl UrlOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absolute(mut self, is_absolute: bool) -> Self {
        self.is_absolute = Some(is_absolute);
        self
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(Some(scheme.into()));
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(Some(host.into()));
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(Some(port));
        self
    }

    pub fn without_scheme(mut self) -> Self {
        self.scheme = Some(None);
        self
    }

    pub fn without_host(mut self) -> Self {
        self.host = Some(None);
        self
    }

    pub fn without_port(mut self) -> Self {
        self.port = Some(None);
        self
    }

    /// Merge over `defaults`
    pub fn apply(&self, defaults: &UrlOptions) -> UrlOptions {
        UrlOptions {
            is_absolute: self.is_absolute.unwrap_or(defaults.is_absolute),
            scheme: self.scheme.clone().unwrap_or_else(|| defaults.scheme.clone()),
            host: self.host.clone().unwrap_or_else(|| defaults.host.clone()),
            port: self.port.unwrap_or(defaults.port),
        }
    }
}

/// Ordered parameter values for URL generation
///
/// ```
/// use waypoint_core::UrlParams;
///
/// let params = UrlParams::new().with("userId", "123").with("page", 2);
/// assert_eq!(params.get("page"), Some("2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams(Vec<(String, String)>);

impl UrlParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a value; an existing name keeps its position
    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        let name = name.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == name)?;
        Some(self.0.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for UrlParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = UrlParams::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl<K: Into<String>, V: Display, const N: usize> From<[(K, V); N]> for UrlParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Named route registry and URL builder
#[derive(Debug, Clone, Default)]
pub struct UrlGenerator {
    routes: HashMap<String, NamedRoute>,
    defaults: UrlOptions,
}

impl UrlGenerator {
    /// Create a generator with the default options
    /// (`relative, http://localhost:3000` when made absolute)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: UrlOptions) -> Self {
        Self {
            routes: HashMap::new(),
            defaults,
        }
    }

    /// Register a route under `name`, replacing any previous entry
    pub fn add_route(&mut self, name: impl Into<String>, route: impl Into<NamedRoute>) {
        let name = name.into();
        let route = route.into();
        if self.routes.insert(name.clone(), route).is_some() {
            debug!(name = %name, "replacing named route");
        }
    }

    pub fn route(&self, name: &str) -> Option<&NamedRoute> {
        self.routes.get(name)
    }

    pub fn routes(&self) -> &HashMap<String, NamedRoute> {
        &self.routes
    }

    pub fn defaults(&self) -> &UrlOptions {
        &self.defaults
    }

    /// Generate a URL for a named route
    ///
    /// # Example
    /// ```
    /// use waypoint_core::{NamedRoute, UrlGenerator, UrlOverrides, UrlParams};
    ///
    /// let mut urls = UrlGenerator::new();
    /// urls.add_route("user", NamedRoute::new("/users/:userId", "GET"));
    ///
    /// let params = UrlParams::new().with("userId", "123").with("foo", 4).with("bar", "baz");
    /// let url = urls.generate("user", params, &UrlOverrides::new()).unwrap();
    /// assert_eq!(url, "/users/123?foo=4&bar=baz");
    /// ```
    pub fn generate(
        &self,
        name: &str,
        params: impl Into<UrlParams>,
        overrides: &UrlOverrides,
    ) -> Result<String> {
        let route = self
            .routes
            .get(name)
            .ok_or_else(|| Error::UnknownNamedRoute(name.to_string()))?;
        let options = overrides.apply(&self.defaults);
        let mut remaining = params.into();

        let mut url = String::new();
        if options.is_absolute {
            let scheme = options
                .scheme
                .as_deref()
                .ok_or(Error::MissingAbsoluteUrlOption("scheme"))?;
            let host = options
                .host
                .as_deref()
                .ok_or(Error::MissingAbsoluteUrlOption("host"))?;
            url.push_str(&format!("{scheme}://{host}"));
            if let Some(port) = options.port {
                url.push_str(&format!(":{port}"));
            }
        }

        for segment in split(&route.path) {
            url.push('/');
            match param_name(segment) {
                Some(param) => {
                    let value = remaining
                        .remove(param)
                        .ok_or_else(|| Error::MissingParameter(param.to_string()))?;
                    url.push_str(&encode(&value).to_string());
                }
                None => url.push_str(segment),
            }
        }
        if route.path.is_empty() {
            url.push('/');
        }

        for (i, (key, value)) in remaining.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&format!("{key}={}", encode(value)));
        }

        Ok(url)
    }
}
