//! HTTP router: one radix trie per method, plus named routes
//!
//! Registration is single-writer (`&mut self`); once built, the router can
//! be shared across threads and matched concurrently (`&self`).

use crate::route::NamedRoute;
use crate::{
    Error, Method, RequestContext, Result, RouteDefinition, RouterConfig, UrlGenerator,
    UrlOverrides, UrlParams,
};
use std::collections::HashMap;
use tracing::{debug, trace};
use waypoint_router::{Match, Tree};

/// HTTP router
///
/// Routes are organized by HTTP method for O(1) method dispatch,
/// then matched segment by segment in that method's trie.
#[derive(Debug)]
pub struct Router<T> {
    trees: HashMap<Method, Tree<T>>,
    urls: UrlGenerator,
    config: RouterConfig,
}

impl<T: Clone> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Router<T> {
    /// Create a new router
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            trees: HashMap::new(),
            urls: UrlGenerator::with_defaults(config.url_defaults.clone()),
            config,
        }
    }

    /// Create an empty trie for `method` if none exists
    pub fn add_method(&mut self, method: Method) {
        let capacity = self.config.cache_capacity;
        self.trees
            .entry(method)
            .or_insert_with(|| Tree::with_cache_capacity(capacity));
    }

    /// Add a route under each of its methods
    ///
    /// Every method token is validated before anything is inserted, and a
    /// method's trie is only created once the route is in it, so a rejected
    /// route leaves the router as it was.
    ///
    /// # Example
    /// ```
    /// use waypoint_core::{RouteDefinition, Router};
    ///
    /// let mut router = Router::new();
    /// router
    ///     .add_route(RouteDefinition::new("/users/:id", ["GET", "HEAD"], "show_user"))
    ///     .unwrap();
    ///
    /// let m = router.find("HEAD", "/users/42/").unwrap();
    /// assert_eq!(*m.handler, "show_user");
    /// assert_eq!(m.param("id"), Some("42"));
    /// ```
    pub fn add_route(&mut self, route: RouteDefinition<T>) -> Result<()> {
        let methods = route
            .methods
            .iter()
            .map(str::parse)
            .collect::<Result<Vec<Method>>>()?;

        for method in methods {
            match self.trees.get_mut(&method) {
                Some(tree) => tree.insert(&route.path, route.handler.clone(), &route.requirements)?,
                None => {
                    let mut tree = Tree::with_cache_capacity(self.config.cache_capacity);
                    tree.insert(&route.path, route.handler.clone(), &route.requirements)?;
                    self.trees.insert(method, tree);
                }
            }
            debug!(method = %method, path = %route.path, "route added");
        }
        Ok(())
    }

    /// Add a route and record it under `name` for URL generation.
    /// The name is only recorded if the route was accepted.
    pub fn add_named_route(&mut self, name: impl Into<String>, route: RouteDefinition<T>) -> Result<()> {
        let named = NamedRoute::from(&route);
        self.add_route(route)?;
        self.urls.add_route(name, named);
        Ok(())
    }

    /// Match a request context
    pub fn match_route(&self, ctx: &RequestContext) -> Result<Match<'_, T>> {
        let tree = self.trees.get(&ctx.method()).ok_or_else(|| {
            trace!(method = %ctx.method(), "no routes for method");
            Error::MethodNotAllowed(ctx.method())
        })?;
        Ok(tree.find(ctx.path())?)
    }

    /// Match using string method and raw path
    pub fn find(&self, method: &str, path: &str) -> Result<Match<'_, T>> {
        let ctx = RequestContext::new(path, method)?;
        self.match_route(&ctx)
    }

    /// Generate a URL for a named route
    pub fn generate_url(
        &self,
        name: &str,
        params: impl Into<UrlParams>,
        overrides: &UrlOverrides,
    ) -> Result<String> {
        self.urls.generate(name, params, overrides)
    }

    /// Check if a method has a trie
    pub fn has_method(&self, method: Method) -> bool {
        self.trees.contains_key(&method)
    }

    /// Get all methods with a trie
    pub fn methods(&self) -> Vec<Method> {
        self.trees.keys().copied().collect()
    }

    /// The trie for a method
    pub fn tree(&self, method: Method) -> Option<&Tree<T>> {
        self.trees.get(&method)
    }

    pub fn url_generator(&self) -> &UrlGenerator {
        &self.urls
    }

    pub fn url_generator_mut(&mut self) -> &mut UrlGenerator {
        &mut self.urls
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_router::NotFound;

    fn get(path: &str, handler: &'static str) -> RouteDefinition<&'static str> {
        RouteDefinition::new(path, "GET", handler)
    }

    #[test]
    fn test_static_routes() {
        let mut router = Router::new();
        router.add_route(get("/", "home")).unwrap();
        router.add_route(get("/users", "users")).unwrap();
        router
            .add_route(RouteDefinition::new("/users", "POST", "create_user"))
            .unwrap();

        assert_eq!(*router.find("GET", "/").unwrap().handler, "home");
        assert_eq!(*router.find("GET", "/users").unwrap().handler, "users");
        assert_eq!(*router.find("POST", "/users").unwrap().handler, "create_user");
    }

    #[test]
    fn test_dynamic_routes() {
        let mut router = Router::new();
        router.add_route(get("/users/:id", "get_user")).unwrap();
        router.add_route(get("/users/:id/posts/:post_id", "get_post")).unwrap();

        let m = router.find("GET", "/users/123").unwrap();
        assert_eq!(*m.handler, "get_user");
        assert_eq!(m.param("id"), Some("123"));

        let m = router.find("get", "/users/456/posts/789?draft=1").unwrap();
        assert_eq!(*m.handler, "get_post");
        assert_eq!(m.param("id"), Some("456"));
        assert_eq!(m.param("post_id"), Some("789"));
    }

    #[test]
    fn test_method_not_allowed() {
        let mut router = Router::new();
        router.add_route(get("/users", "users")).unwrap();

        let err = router.find("DELETE", "/users").unwrap_err();
        assert!(err.is_method_not_allowed());
        assert!(matches!(err, Error::MethodNotAllowed(Method::Delete)));
    }

    #[test]
    fn test_invalid_method_on_lookup() {
        let router: Router<()> = Router::new();
        assert!(matches!(
            router.find("BREW", "/"),
            Err(Error::InvalidMethod(_))
        ));
    }

    #[test]
    fn test_not_found_propagates() {
        let mut router = Router::new();
        router
            .add_route(get("/users/:id", "get_user").requirement("id", r"\d+"))
            .unwrap();

        let err = router.find("GET", "/users/abc").unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            err,
            Error::ResourceNotFound(NotFound::NoMatchingSegment { ref segment }) if segment == "abc"
        ));
    }

    #[test]
    fn test_slash_before_query_is_an_empty_segment() {
        let mut router = Router::new();
        router.add_route(get("/users", "users")).unwrap();

        let err = router.find("GET", "/users/?page=2").unwrap_err();
        assert!(matches!(
            err,
            Error::ResourceNotFound(NotFound::NoMatchingSegment { ref segment }) if segment.is_empty()
        ));
        assert_eq!(*router.find("GET", "/users?page=2").unwrap().handler, "users");
    }

    #[test]
    fn test_match_route_with_context() {
        let mut router = Router::new();
        router.add_route(get("/home", "home")).unwrap();

        let ctx = RequestContext::new("/home/", "get").unwrap();
        let m = router.match_route(&ctx).unwrap();
        assert_eq!(*m.handler, "home");
        assert!(m.params.is_empty());
    }

    #[test]
    fn test_multiple_methods_independent_tries() {
        let mut router = Router::new();
        router
            .add_route(RouteDefinition::new("/items/:id", ["GET", "PUT"], "item"))
            .unwrap();
        router.add_route(get("/items/special", "special")).unwrap();

        assert_eq!(*router.find("GET", "/items/special").unwrap().handler, "special");
        assert_eq!(*router.find("PUT", "/items/special").unwrap().handler, "item");
        assert!(router.has_method(Method::Get));
        assert!(router.has_method(Method::Put));
        assert!(!router.has_method(Method::Post));
        assert_eq!(router.methods().len(), 2);
    }

    #[test]
    fn test_add_method() {
        let mut router: Router<()> = Router::new();
        router.add_method(Method::Options);

        assert!(router.has_method(Method::Options));
        assert!(router.tree(Method::Options).unwrap().is_empty());
        let err = router.find("OPTIONS", "/").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_method_on_registration_leaves_router_untouched() {
        let mut router = Router::new();
        let err = router
            .add_route(RouteDefinition::new("/x", ["GET", "FETCH"], "x"))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidMethod(ref m) if m == "FETCH"));
        assert!(router.methods().is_empty());
    }

    #[test]
    fn test_invalid_requirement_creates_no_trie() {
        let mut router = Router::new();
        let err = router
            .add_route(get("/users/:id", "u").requirement("id", "[unclosed"))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidRoute(_)));
        assert!(!router.has_method(Method::Get));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut router = Router::new();
        router.add_route(get("/home", "old")).unwrap();
        router.add_route(get("/home", "new")).unwrap();

        assert_eq!(*router.find("GET", "/home").unwrap().handler, "new");
    }

    #[test]
    fn test_named_route() {
        let mut router = Router::new();
        router
            .add_named_route("user", get("/users/:id", "get_user"))
            .unwrap();

        let url = router
            .generate_url("user", [("id", 7)], &UrlOverrides::new())
            .unwrap();
        assert_eq!(url, "/users/7");
        assert_eq!(router.find("GET", &url).unwrap().param("id"), Some("7"));
    }

    #[test]
    fn test_named_route_absolute() {
        let mut router = Router::new();
        router
            .add_named_route("user", get("/users/:id", "get_user"))
            .unwrap();

        let overrides = UrlOverrides::new()
            .absolute(true)
            .scheme("https")
            .host("example.com")
            .port(443);
        let url = router.generate_url("user", [("id", 1)], &overrides).unwrap();
        assert_eq!(url, "https://example.com:443/users/1");
    }

    #[test]
    fn test_failed_named_route_records_no_name() {
        let mut router = Router::new();
        let err = router
            .add_named_route("broken", get("users", "u"))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidRoute(_)));
        assert!(router.url_generator().route("broken").is_none());
        assert!(matches!(
            router.generate_url("broken", UrlParams::new(), &UrlOverrides::new()),
            Err(Error::UnknownNamedRoute(_))
        ));
    }

    #[test]
    fn test_config_applied() {
        let config = RouterConfig::default()
            .cache_capacity(0)
            .url_defaults(crate::UrlOptions {
                is_absolute: true,
                ..Default::default()
            });
        let mut router = Router::with_config(config);
        router.add_named_route("user", get("/users/:id", "u")).unwrap();

        router.find("GET", "/users/1").unwrap();
        let tree = router.tree(Method::Get).unwrap();
        assert_eq!(tree.cache_capacity(), 0);
        assert_eq!(tree.root().cached_segments(), 0);

        let url = router
            .generate_url("user", [("id", 1)], &UrlOverrides::new())
            .unwrap();
        assert_eq!(url, "http://localhost:3000/users/1");
    }

    #[test]
    fn test_shared_across_threads() {
        let mut router = Router::new();
        router.add_route(get("/users/:id", "get_user")).unwrap();
        router.add_route(get("/users/profile", "profile")).unwrap();
        let router = std::sync::Arc::new(router);

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let router = router.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let id = format!("{t}-{i}");
                        let m = router.find("GET", &format!("/users/{id}")).unwrap();
                        assert_eq!(*m.handler, "get_user");
                        assert_eq!(m.param("id"), Some(id.as_str()));
                        assert_eq!(*router.find("GET", "/users/profile").unwrap().handler, "profile");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
