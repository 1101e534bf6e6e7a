//! Route definitions as supplied at registration time

use waypoint_router::Requirements;

/// One or more method tokens (`"GET"` or `["GET", "HEAD"]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Methods(Vec<String>);

impl Methods {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for Methods {
    fn from(method: &str) -> Self {
        Methods(vec![method.to_string()])
    }
}

impl From<String> for Methods {
    fn from(method: String) -> Self {
        Methods(vec![method])
    }
}

impl From<crate::Method> for Methods {
    fn from(method: crate::Method) -> Self {
        Methods(vec![method.as_str().to_string()])
    }
}

impl<const N: usize> From<[&str; N]> for Methods {
    fn from(methods: [&str; N]) -> Self {
        Methods(methods.iter().map(|m| m.to_string()).collect())
    }
}

impl From<Vec<&str>> for Methods {
    fn from(methods: Vec<&str>) -> Self {
        Methods(methods.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Methods {
    fn from(methods: Vec<String>) -> Self {
        Methods(methods)
    }
}

/// A route to register: pattern, methods, handler and parameter requirements
///
/// ```
/// use waypoint_core::RouteDefinition;
///
/// let route = RouteDefinition::new("/users/:id", ["GET", "HEAD"], "show_user")
///     .requirement("id", r"\d+");
/// assert_eq!(route.methods.iter().count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RouteDefinition<T> {
    /// Pattern starting with `/`; `:name` marks a parameter segment
    pub path: String,
    pub methods: Methods,
    pub handler: T,
    /// Regex source per parameter name, matched against the whole segment
    pub requirements: Requirements,
}

impl<T> RouteDefinition<T> {
    pub fn new(path: impl Into<String>, methods: impl Into<Methods>, handler: T) -> Self {
        Self {
            path: path.into(),
            methods: methods.into(),
            handler,
            requirements: Requirements::new(),
        }
    }

    /// Constrain a parameter to a regex
    pub fn requirement(mut self, param: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.requirements.insert(param.into(), pattern.into());
        self
    }
}

/// What the URL generator keeps of a named route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRoute {
    pub path: String,
    pub methods: Methods,
}

impl NamedRoute {
    pub fn new(path: impl Into<String>, methods: impl Into<Methods>) -> Self {
        Self {
            path: path.into(),
            methods: methods.into(),
        }
    }
}

impl<T> From<&RouteDefinition<T>> for NamedRoute {
    fn from(route: &RouteDefinition<T>) -> Self {
        Self {
            path: route.path.clone(),
            methods: route.methods.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;

    #[test]
    fn test_single_method_becomes_list() {
        let route = RouteDefinition::new("/", "GET", ());
        assert_eq!(route.methods.iter().collect::<Vec<_>>(), vec!["GET"]);

        let route = RouteDefinition::new("/", Method::Patch, ());
        assert_eq!(route.methods.iter().collect::<Vec<_>>(), vec!["PATCH"]);
    }

    #[test]
    fn test_requirements() {
        let route = RouteDefinition::new("/users/:id/:slug", vec!["GET"], ())
            .requirement("id", r"\d+")
            .requirement("slug", "[a-z0-9-]+");

        assert_eq!(route.requirements.get("id").map(String::as_str), Some(r"\d+"));
        assert_eq!(route.requirements.len(), 2);
    }

    #[test]
    fn test_named_route_from_definition() {
        let route = RouteDefinition::new("/users/:id", ["GET", "PUT"], 7);
        let named = NamedRoute::from(&route);
        assert_eq!(named, NamedRoute::new("/users/:id", ["GET", "PUT"]));
    }
}
