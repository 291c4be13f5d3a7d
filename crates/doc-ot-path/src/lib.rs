//! Dotted property paths.
//!
//! A property path addresses a value inside a tree of named properties as an
//! ordered sequence of segments. On the wire, paths travel in dotted form
//! (`"p1.content"`); in memory they are plain `Vec<String>` segments. This
//! crate implements the conversions between the two forms and the basic tree
//! access primitives the operation algebra is built on.
//!
//! # Example
//!
//! ```
//! use doc_ot_path::{parse_dotted_path, format_dotted_path, get, set};
//!
//! let path = parse_dotted_path("p1.content");
//! assert_eq!(path, vec!["p1".to_string(), "content".to_string()]);
//! assert_eq!(format_dotted_path(&path), "p1.content");
//!
//! let mut doc = serde_json::json!({});
//! set(&mut doc, &path, serde_json::json!("hello")).unwrap();
//! assert_eq!(get(&doc, &path), Some(&serde_json::json!("hello")));
//! ```

use serde_json::Value;
use thiserror::Error;

pub mod types;
pub use types::{path, IntoPath, Path, PathObject, PathStep};

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum PathError {
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    #[error("INVALID_INDEX: {0}")]
    InvalidIndex(String),
    #[error("INVALID_TARGET: {0}")]
    InvalidTarget(String),
}

// ── Dotted form ───────────────────────────────────────────────────────────

/// Parse a dotted path string into segments.
///
/// The empty string is the root path. A segment-less form (`"a"`) is a
/// single-segment path; dots separate segments and are not escapable, so
/// segments containing `.` cannot travel in dotted form.
///
/// # Example
///
/// ```
/// use doc_ot_path::parse_dotted_path;
///
/// assert_eq!(parse_dotted_path(""), Vec::<String>::new());
/// assert_eq!(parse_dotted_path("a"), vec!["a"]);
/// assert_eq!(parse_dotted_path("p1.content"), vec!["p1", "content"]);
/// ```
pub fn parse_dotted_path(s: &str) -> Path {
    if s.is_empty() {
        return Vec::new();
    }
    s.split('.').map(|seg| seg.to_string()).collect()
}

/// Format path segments into dotted form.
///
/// The inverse of [`parse_dotted_path`] for paths whose segments contain no
/// `.`.
pub fn format_dotted_path(path: &[PathStep]) -> String {
    path.join(".")
}

// ── Tree access ───────────────────────────────────────────────────────────

fn step_index(seg: &str, len: usize) -> Result<usize, PathError> {
    let idx: usize = seg
        .parse()
        .map_err(|_| PathError::InvalidIndex(seg.to_string()))?;
    if idx >= len {
        return Err(PathError::NotFound(seg.to_string()));
    }
    Ok(idx)
}

/// The value at `path`, or `None` if any segment is missing.
pub fn get<'a>(doc: &'a Value, path: &[PathStep]) -> Option<&'a Value> {
    let mut cur = doc;
    for seg in path {
        cur = match cur {
            Value::Object(map) => map.get(seg)?,
            Value::Array(arr) => arr.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(cur)
}

/// Mutable access to the value at `path`, or `None` if any segment is missing.
pub fn get_mut<'a>(doc: &'a mut Value, path: &[PathStep]) -> Option<&'a mut Value> {
    let mut cur = doc;
    for seg in path {
        cur = match cur {
            Value::Object(map) => map.get_mut(seg)?,
            Value::Array(arr) => {
                let idx = seg.parse::<usize>().ok()?;
                arr.get_mut(idx)?
            }
            _ => return None,
        };
    }
    Some(cur)
}

/// Write `val` at `path`.
///
/// Missing intermediate segments are created as empty objects. Writing
/// through an array requires the index to already exist; writing a scalar's
/// child is an error. The root path replaces the whole tree.
pub fn set(doc: &mut Value, path: &[PathStep], val: Value) -> Result<(), PathError> {
    if path.is_empty() {
        *doc = val;
        return Ok(());
    }
    let (parent_path, last) = path.split_at(path.len() - 1);
    let key = &last[0];

    let mut cur = doc;
    for seg in parent_path {
        cur = match cur {
            Value::Object(map) => map
                .entry(seg.clone())
                .or_insert_with(|| Value::Object(serde_json::Map::new())),
            Value::Array(arr) => {
                let idx = step_index(seg, arr.len())?;
                &mut arr[idx]
            }
            _ => return Err(PathError::InvalidTarget(seg.clone())),
        };
    }

    match cur {
        Value::Object(map) => {
            map.insert(key.clone(), val);
            Ok(())
        }
        Value::Array(arr) => {
            let idx = step_index(key, arr.len())?;
            arr[idx] = val;
            Ok(())
        }
        _ => Err(PathError::InvalidTarget(key.clone())),
    }
}

/// Remove and return the value at `path`.
///
/// The root path cannot be removed.
pub fn remove(doc: &mut Value, path: &[PathStep]) -> Result<Value, PathError> {
    if path.is_empty() {
        return Err(PathError::InvalidTarget("<root>".to_string()));
    }
    let (parent_path, last) = path.split_at(path.len() - 1);
    let key = &last[0];
    let parent = get_mut(doc, parent_path).ok_or_else(|| PathError::NotFound(key.clone()))?;
    match parent {
        Value::Object(map) => map.remove(key).ok_or_else(|| PathError::NotFound(key.clone())),
        Value::Array(arr) => {
            let idx = step_index(key, arr.len())?;
            Ok(arr.remove(idx))
        }
        _ => Err(PathError::InvalidTarget(key.clone())),
    }
}

/// Whether a value exists at `path`.
pub fn contains(doc: &Value, path: &[PathStep]) -> bool {
    get(doc, path).is_some()
}
