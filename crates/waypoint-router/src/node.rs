//! Trie nodes, parameter constraints and the per-node lookup cache

use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;

/// Default constraint source for parameters without a requirement
pub const DEFAULT_PATTERN: &str = "[^/]+";

/// Index of a node in the tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

pub(crate) const ROOT: NodeId = NodeId(0);

/// Value check applied to a parameter segment
#[derive(Debug, Clone)]
pub enum Constraint {
    /// One or more non-slash characters
    NonSlash,
    /// Full-string match against a user supplied pattern
    Pattern(Regex),
}

impl Constraint {
    /// Compile a requirement, anchored so it must match the whole segment
    ///
    /// ```
    /// use waypoint_router::Constraint;
    ///
    /// let c = Constraint::compile(r"\d+").unwrap();
    /// assert!(c.is_match("123"));
    /// assert!(!c.is_match("12a"));
    /// ```
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{source})$")).map(Constraint::Pattern)
    }

    /// Check a segment value
    #[inline]
    pub fn is_match(&self, value: &str) -> bool {
        match self {
            Constraint::NonSlash => !value.is_empty() && !value.contains('/'),
            Constraint::Pattern(regex) => regex.is_match(value),
        }
    }

    /// Pattern source as compiled
    pub fn as_str(&self) -> &str {
        match self {
            Constraint::NonSlash => DEFAULT_PATTERN,
            Constraint::Pattern(regex) => regex.as_str(),
        }
    }
}

#[derive(Debug)]
pub(crate) enum Kind {
    Static,
    Param { name: String, constraint: Constraint },
}

/// Literal segment -> child memo, filled by successful lookups.
///
/// Concurrent lookups may race on the same slot; they always write the same
/// child for a given segment, so the race is benign.
#[derive(Debug, Default)]
pub(crate) struct ChildCache {
    entries: RwLock<HashMap<Box<str>, NodeId>>,
}

impl ChildCache {
    #[inline]
    pub(crate) fn get(&self, segment: &str) -> Option<NodeId> {
        self.entries.read().get(segment).copied()
    }

    pub(crate) fn insert(&self, segment: &str, child: NodeId, capacity: usize) {
        if capacity == 0 {
            return;
        }
        let mut entries = self.entries.write();
        if entries.len() >= capacity && !entries.contains_key(segment) {
            return;
        }
        entries.insert(segment.into(), child);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.get_mut().clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}

#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) segment: String,
    pub(crate) full_path: String,
    pub(crate) kind: Kind,
    pub(crate) handler: Option<T>,
    /// Insertion order
    pub(crate) children: Vec<NodeId>,
    pub(crate) cache: ChildCache,
}

impl<T> Node<T> {
    pub(crate) fn new(segment: &str, full_path: String, kind: Kind) -> Self {
        Self {
            segment: segment.to_string(),
            full_path,
            kind,
            handler: None,
            children: Vec::new(),
            cache: ChildCache::default(),
        }
    }

    pub(crate) fn root() -> Self {
        Self::new("/", String::new(), Kind::Static)
    }

    #[inline]
    pub(crate) fn is_param(&self) -> bool {
        matches!(self.kind, Kind::Param { .. })
    }

    /// Whether this node accepts `segment` during lookup
    #[inline]
    pub(crate) fn accepts(&self, segment: &str) -> bool {
        match &self.kind {
            Kind::Static => self.segment == segment,
            Kind::Param { constraint, .. } => constraint.is_match(segment),
        }
    }

    /// Whether a registration segment at `full_path` resolves to this node
    pub(crate) fn is_same_route_part(&self, segment: &str, full_path: &str) -> bool {
        if self.full_path == full_path {
            return true;
        }
        match &self.kind {
            Kind::Param { name, .. } => name == segment,
            Kind::Static => self.segment == segment,
        }
    }
}
