//! waypoint-router: Radix Trie Node Store
//!
//! One [`Tree`] holds the routes of a single HTTP method. The method
//! dispatch layer lives in waypoint-core.
//!
//! ## Features
//! - Static paths: `/users`, `/api/v1/health`
//! - Parameters: `/users/:id`, `/posts/:postId/comments/:commentId`
//! - Per-parameter regex requirements: `id => \d+`
//! - Static-route index: fully literal routes resolve with one hash lookup
//! - Per-node child lookup cache, filled lazily by successful matches only
//!
//! ## Priority
//! 1. Static child whose text equals the segment
//! 2. Parameter children, in insertion order, whose constraint accepts the segment
//!
//! There is no backtracking: the first accepted child is final.
//!
//! ## Example
//! ```
//! use waypoint_router::{Requirements, Tree};
//!
//! let mut tree = Tree::new();
//! let mut requirements = Requirements::new();
//! requirements.insert("id".to_string(), r"\d+".to_string());
//!
//! tree.insert("/users", 0, &Requirements::new()).unwrap();
//! tree.insert("/users/:id", 1, &requirements).unwrap();
//!
//! let m = tree.find("/users/123").unwrap();
//! assert_eq!(*m.handler, 1);
//! assert_eq!(m.params, vec![("id".to_string(), "123".to_string())]);
//! assert!(tree.find("/users/abc").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

mod error;
mod node;
mod segment;

pub use error::{InsertError, NotFound};
pub use node::{Constraint, DEFAULT_PATTERN};
pub use segment::{param_name, split, Segments, INLINE_SEGMENTS, PARAM_SIGIL};

use node::{Kind, Node, NodeId, ROOT};
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Parameter name -> regex source
pub type Requirements = HashMap<String, String>;

/// Default number of memoized segments per node
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Route match result
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a, T> {
    /// The bound handler
    pub handler: &'a T,
    /// Captured path parameters as (name, value) pairs, in path order
    pub params: Vec<(String, String)>,
    /// Registered pattern of the matched node (`/users/:id`)
    pub pattern: &'a str,
}

impl<T> Match<'_, T> {
    /// Get a single parameter value
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get params as HashMap for convenient access
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params.iter().cloned().collect()
    }
}

fn record_param(params: &mut Vec<(String, String)>, name: &str, value: &str) {
    match params.iter_mut().find(|(k, _)| k == name) {
        Some((_, v)) => *v = value.to_string(),
        None => params.push((name.to_string(), value.to_string())),
    }
}

/// Radix trie for the routes of one HTTP method
///
/// Nodes live in an append-only arena; node ids stay valid for the life of the
/// tree, which is what the static-route index and the child caches point at.
#[derive(Debug)]
pub struct Tree<T> {
    nodes: Vec<Node<T>>,
    /// Full path -> terminal node, for routes with no parameter segment
    static_routes: HashMap<String, NodeId>,
    cache_capacity: usize,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Create an empty tree with the default cache capacity
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create an empty tree. A capacity of 0 disables the child lookup cache.
    pub fn with_cache_capacity(cache_capacity: usize) -> Self {
        Self {
            nodes: vec![Node::root()],
            static_routes: HashMap::new(),
            cache_capacity,
        }
    }

    /// Insert a route
    ///
    /// Re-registering an existing pattern replaces its handler. On error the
    /// tree is left unchanged.
    ///
    /// # Arguments
    /// * `path` - route pattern starting with `/`, parameters prefixed by `:`
    /// * `handler` - value returned by a successful match
    /// * `requirements` - regex source per parameter name
    pub fn insert(
        &mut self,
        path: &str,
        handler: T,
        requirements: &Requirements,
    ) -> Result<(), InsertError> {
        if !path.starts_with('/') {
            return Err(InsertError::InvalidPath(path.to_string()));
        }

        let segments = split(path);
        // Compile every constraint before touching the tree
        let kinds = segments
            .iter()
            .map(|segment| segment_kind(segment, requirements))
            .collect::<Result<SmallVec<[Kind; INLINE_SEGMENTS]>, _>>()?;

        let mut current = ROOT;
        let mut is_static = true;
        for (&segment, kind) in segments.iter().zip(kinds) {
            let full_path = format!("{}/{}", self.nodes[current.0].full_path, segment);
            let next = match self.registered_child(current, segment, &full_path) {
                Some(id) => id,
                None => self.push_child(current, segment, full_path, kind),
            };
            is_static &= !self.nodes[next.0].is_param();
            current = next;
        }

        let node = &mut self.nodes[current.0];
        if node.handler.replace(handler).is_some() {
            debug!(path, "replacing handler of existing route");
        }
        if is_static {
            self.static_routes.insert(path.to_string(), current);
        }
        debug!(path, is_static, "route inserted");
        Ok(())
    }

    fn registered_child(&self, parent: NodeId, segment: &str, full_path: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|id| self.nodes[id.0].is_same_route_part(segment, full_path))
    }

    fn push_child(&mut self, parent: NodeId, segment: &str, full_path: String, kind: Kind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(segment, full_path, kind));

        let parent = &mut self.nodes[parent.0];
        parent.children.push(id);
        // A new sibling can change what a memoized segment resolves to
        parent.cache.clear();
        id
    }

    /// Find the route bound to an already normalized path
    ///
    /// # Returns
    /// The handler with its captured parameters, or [`NotFound`] naming the
    /// segment that failed or the path that has no handler.
    pub fn find(&self, path: &str) -> Result<Match<'_, T>, NotFound> {
        if let Some(id) = self.static_routes.get(path) {
            let node = &self.nodes[id.0];
            if let Some(handler) = node.handler.as_ref() {
                trace!(path, "static route hit");
                return Ok(Match {
                    handler,
                    params: Vec::new(),
                    pattern: &node.full_path,
                });
            }
        }

        let mut current = &self.nodes[ROOT.0];
        let mut params = Vec::new();
        // Cache writes are held back until the whole lookup succeeds
        let mut misses: SmallVec<[(&Node<T>, &str, NodeId); INLINE_SEGMENTS]> = SmallVec::new();

        for segment in split(path) {
            let next = match current.cache.get(segment) {
                Some(id) => id,
                None => {
                    let id = self.scan(current, segment).ok_or_else(|| {
                        trace!(path, segment, "no child accepts segment");
                        NotFound::NoMatchingSegment {
                            segment: segment.to_string(),
                        }
                    })?;
                    misses.push((current, segment, id));
                    id
                }
            };

            current = &self.nodes[next.0];
            if let Kind::Param { name, .. } = &current.kind {
                record_param(&mut params, name, segment);
            }
        }

        let Some(handler) = current.handler.as_ref() else {
            return Err(NotFound::NotRoutable {
                path: path.to_string(),
            });
        };
        for (node, segment, id) in misses {
            node.cache.insert(segment, id, self.cache_capacity);
        }
        Ok(Match {
            handler,
            params,
            pattern: &current.full_path,
        })
    }

    /// Static children with equal text first, then parameters in insertion order
    fn scan(&self, node: &Node<T>, segment: &str) -> Option<NodeId> {
        let accepted = |want_param: bool| {
            node.children.iter().copied().find(|id| {
                let child = &self.nodes[id.0];
                child.is_param() == want_param && child.accepts(segment)
            })
        };
        accepted(false).or_else(|| accepted(true))
    }

    /// Root node view
    pub fn root(&self) -> NodeRef<'_, T> {
        NodeRef {
            tree: self,
            id: ROOT,
        }
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no route segment was ever inserted
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Whether `path` is served by the static-route index
    pub fn is_static_route(&self, path: &str) -> bool {
        self.static_routes.contains_key(path)
    }

    /// Number of routes in the static-route index
    pub fn static_route_count(&self) -> usize {
        self.static_routes.len()
    }

    /// Per-node child cache capacity
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }
}

fn segment_kind(segment: &str, requirements: &Requirements) -> Result<Kind, InsertError> {
    let Some(name) = param_name(segment) else {
        return Ok(Kind::Static);
    };
    let constraint = match requirements.get(name) {
        Some(pattern) => {
            Constraint::compile(pattern).map_err(|source| InsertError::InvalidRequirement {
                param: name.to_string(),
                source,
            })?
        }
        None => Constraint::NonSlash,
    };
    Ok(Kind::Param {
        name: name.to_string(),
        constraint,
    })
}

/// Read-only view of a trie node
#[derive(Debug)]
pub struct NodeRef<'a, T> {
    tree: &'a Tree<T>,
    id: NodeId,
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<'a, T> NodeRef<'a, T> {
    fn node(&self) -> &'a Node<T> {
        &self.tree.nodes[self.id.0]
    }

    /// Segment text as registered (`users`, `:id`)
    pub fn segment(&self) -> &'a str {
        &self.node().segment
    }

    /// Path from the root to this node
    pub fn full_path(&self) -> &'a str {
        &self.node().full_path
    }

    pub fn is_param(&self) -> bool {
        self.node().is_param()
    }

    /// Parameter name without the sigil
    pub fn param_name(&self) -> Option<&'a str> {
        match &self.node().kind {
            Kind::Param { name, .. } => Some(name),
            Kind::Static => None,
        }
    }

    pub fn constraint(&self) -> Option<&'a Constraint> {
        match &self.node().kind {
            Kind::Param { constraint, .. } => Some(constraint),
            Kind::Static => None,
        }
    }

    /// True once a handler has been bound here
    pub fn is_routable(&self) -> bool {
        self.node().handler.is_some()
    }

    pub fn handler(&self) -> Option<&'a T> {
        self.node().handler.as_ref()
    }

    /// Children in insertion order
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, T>> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// Number of memoized lookup segments
    pub fn cached_segments(&self) -> usize {
        self.node().cache.len()
    }
}
