//! Type definitions for property paths.

use serde_json::Value;

use crate::{get, get_mut, remove, set, PathError};

/// A step in a property path.
///
/// Object property names and array indices are both carried as strings;
/// whether a step addresses a property or an index is decided by the
/// container it is resolved against.
pub type PathStep = String;

/// A property path: an ordered sequence of steps from the tree root.
pub type Path = Vec<PathStep>;

/// Build a path from a bare id string or an iterable of segments.
///
/// A single-segment path may be written as just the id, which is the common
/// case for node-level operations.
///
/// # Example
///
/// ```
/// use doc_ot_path::path;
///
/// assert_eq!(path("a"), vec!["a".to_string()]);
/// assert_eq!(path(["p1", "content"]), vec!["p1".to_string(), "content".to_string()]);
/// ```
pub fn path(p: impl IntoPath) -> Path {
    p.into_path()
}

/// Conversion into a [`Path`].
///
/// Implemented for bare id strings, slices, arrays, and `Vec<String>` so call
/// sites can pass whichever form they already hold.
pub trait IntoPath {
    fn into_path(self) -> Path;
}

impl IntoPath for Path {
    fn into_path(self) -> Path {
        self
    }
}

impl IntoPath for &str {
    fn into_path(self) -> Path {
        vec![self.to_string()]
    }
}

impl IntoPath for String {
    fn into_path(self) -> Path {
        vec![self]
    }
}

impl IntoPath for &[&str] {
    fn into_path(self) -> Path {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoPath for [&str; N] {
    fn into_path(self) -> Path {
        self.iter().map(|s| s.to_string()).collect()
    }
}

/// An owned property tree with path-based access.
///
/// Wraps a `serde_json::Value` and exposes the `get`/`set`/`remove` surface
/// directly, for callers that want a document object rather than free
/// functions over a borrowed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PathObject {
    root: Value,
}

impl PathObject {
    /// Wrap an existing tree. An empty object makes a blank document.
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// The value at `path`, if present.
    pub fn get(&self, path: &[PathStep]) -> Option<&Value> {
        get(&self.root, path)
    }

    /// Mutable access to the value at `path`, if present.
    pub fn get_mut(&mut self, path: &[PathStep]) -> Option<&mut Value> {
        get_mut(&mut self.root, path)
    }

    /// Write `val` at `path`, creating intermediate objects as needed.
    pub fn set(&mut self, path: &[PathStep], val: Value) -> Result<(), PathError> {
        set(&mut self.root, path, val)
    }

    /// Remove and return the value at `path`.
    pub fn remove(&mut self, path: &[PathStep]) -> Result<Value, PathError> {
        remove(&mut self.root, path)
    }

    /// Borrow the underlying tree.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Unwrap into the underlying tree.
    pub fn into_root(self) -> Value {
        self.root
    }
}

impl Default for PathObject {
    fn default() -> Self {
        Self::new(Value::Object(serde_json::Map::new()))
    }
}

impl From<Value> for PathObject {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_from_bare_id() {
        assert_eq!(path("a"), vec!["a".to_string()]);
    }

    #[test]
    fn path_from_segments() {
        assert_eq!(
            path(["p1", "content"]),
            vec!["p1".to_string(), "content".to_string()]
        );
    }

    #[test]
    fn path_object_get_set_remove() {
        let mut doc = PathObject::default();
        doc.set(&path(["a", "b"]), json!(1)).unwrap();
        assert_eq!(doc.get(&path(["a", "b"])), Some(&json!(1)));
        assert_eq!(doc.remove(&path(["a", "b"])).unwrap(), json!(1));
        assert_eq!(doc.get(&path(["a", "b"])), None);
    }
}
