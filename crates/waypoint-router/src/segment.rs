//! Path segmentation shared by registration, lookup and URL generation.

use smallvec::SmallVec;

/// Prefix marking a parameter segment (`/users/:id`)
pub const PARAM_SIGIL: char = ':';

/// Segments stored inline before spilling to the heap
pub const INLINE_SEGMENTS: usize = 8;

/// Ordered `/`-separated segments of a path
pub type Segments<'a> = SmallVec<[&'a str; INLINE_SEGMENTS]>;

/// Split a path into segments, dropping the empty element before the leading `/`.
///
/// Empty segments in the middle or at the end are kept: `/users/` yields
/// `["users", ""]`.
///
/// ```
/// use waypoint_router::split;
///
/// assert_eq!(split("/users/:id").as_slice(), &["users", ":id"]);
/// assert_eq!(split("/").as_slice(), &[""]);
/// assert!(split("").is_empty());
/// ```
pub fn split(path: &str) -> Segments<'_> {
    if path.is_empty() {
        return SmallVec::new();
    }
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}

/// Parameter name of a segment, if it is a parameter segment
#[inline]
pub fn param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix(PARAM_SIGIL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_static() {
        assert_eq!(split("/api/v1/health").as_slice(), &["api", "v1", "health"]);
    }

    #[test]
    fn test_split_keeps_empty_segments() {
        assert_eq!(split("/users/").as_slice(), &["users", ""]);
        assert_eq!(split("/a//b").as_slice(), &["a", "", "b"]);
    }

    #[test]
    fn test_split_without_leading_slash() {
        assert_eq!(split("users/42").as_slice(), &["users", "42"]);
    }

    #[test]
    fn test_param_name() {
        assert_eq!(param_name(":id"), Some("id"));
        assert_eq!(param_name("id"), None);
        assert_eq!(param_name(":"), Some(""));
    }
}
