//! Core types for path-addressed object operations.

use doc_ot_path::{IntoPath, Path};
use serde_json::Value;

use crate::error::OpError;
use crate::seq_ot::{ArrayOp, TextOp};

/// A sub-diff carried by [`ObjectOp::Update`].
///
/// The variant doubles as the property-type tag of the value at the update's
/// path: a [`TextOp`] edits a string property, an [`ArrayOp`] an array
/// property. The diff's offsets are relative to the current value at the
/// path, never to the whole document.
#[derive(Debug, Clone, PartialEq)]
pub enum Diff {
    Array(ArrayOp),
    Text(TextOp),
}

impl Diff {
    pub fn is_nop(&self) -> bool {
        match self {
            Diff::Array(op) => op.is_nop(),
            Diff::Text(op) => op.is_nop(),
        }
    }

    /// The property-type tag this diff implies, as it travels on the wire.
    pub fn property_type(&self) -> &'static str {
        match self {
            Diff::Array(_) => "array",
            Diff::Text(_) => "string",
        }
    }

    pub fn invert(&self) -> Diff {
        match self {
            Diff::Array(op) => Diff::Array(op.invert()),
            Diff::Text(op) => Diff::Text(op.invert()),
        }
    }

    /// Conflicts are inherited from the underlying sequence algebra; diffs
    /// of different families never conflict (they cannot share a base).
    pub fn has_conflict(&self, other: &Diff) -> bool {
        match (self, other) {
            (Diff::Array(a), Diff::Array(b)) => a.has_conflict(b),
            (Diff::Text(a), Diff::Text(b)) => a.has_conflict(b),
            _ => false,
        }
    }

    /// Apply this diff to a property value, returning the edited value.
    ///
    /// The value must be of the kind the diff's family expects.
    pub fn apply_to(&self, val: &Value) -> Result<Value, OpError> {
        match self {
            Diff::Text(op) => {
                let s = val.as_str().ok_or(OpError::WrongType { expected: "string" })?;
                Ok(Value::String(op.apply(s)?))
            }
            Diff::Array(op) => {
                let arr = val
                    .as_array()
                    .ok_or(OpError::WrongType { expected: "array" })?;
                let mut seq = arr.clone();
                op.apply(&mut seq)?;
                Ok(Value::Array(seq))
            }
        }
    }
}

impl From<ArrayOp> for Diff {
    fn from(op: ArrayOp) -> Self {
        Diff::Array(op)
    }
}

impl From<TextOp> for Diff {
    fn from(op: TextOp) -> Self {
        Diff::Text(op)
    }
}

/// A path-addressed operation over a tree of named properties.
///
/// The one place the two algebras compose: [`ObjectOp::Update`] wraps a
/// sequence operation as a diff against the value found at its path.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectOp {
    /// Write `val` at `path`, creating intermediate containers as needed.
    Create { path: Path, val: Value },
    /// Remove the property at `path`; the value found there must equal `val`.
    Delete { path: Path, val: Value },
    /// Edit the value at `path` in place through a sequence diff.
    Update { path: Path, diff: Diff },
    /// Replace the value at `path` with `val`; `original` is the value being
    /// replaced, kept for replay and inversion.
    Set {
        path: Path,
        val: Value,
        original: Value,
    },
    /// The identity operation.
    Nop,
}

impl ObjectOp {
    /// A single-segment path may be given as a bare id string.
    pub fn create(path: impl IntoPath, val: Value) -> Self {
        ObjectOp::Create {
            path: path.into_path(),
            val,
        }
    }

    pub fn delete(path: impl IntoPath, val: Value) -> Self {
        ObjectOp::Delete {
            path: path.into_path(),
            val,
        }
    }

    pub fn update(path: impl IntoPath, diff: impl Into<Diff>) -> Self {
        ObjectOp::Update {
            path: path.into_path(),
            diff: diff.into(),
        }
    }

    pub fn set(path: impl IntoPath, original: Value, val: Value) -> Self {
        ObjectOp::Set {
            path: path.into_path(),
            val,
            original,
        }
    }

    pub fn is_nop(&self) -> bool {
        matches!(self, ObjectOp::Nop)
    }

    pub fn is_create(&self) -> bool {
        matches!(self, ObjectOp::Create { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, ObjectOp::Delete { .. })
    }

    pub fn is_update(&self) -> bool {
        matches!(self, ObjectOp::Update { .. })
    }

    pub fn is_set(&self) -> bool {
        matches!(self, ObjectOp::Set { .. })
    }

    /// The operation's path; empty for nop.
    pub fn path(&self) -> &[String] {
        match self {
            ObjectOp::Create { path, .. }
            | ObjectOp::Delete { path, .. }
            | ObjectOp::Update { path, .. }
            | ObjectOp::Set { path, .. } => path,
            ObjectOp::Nop => &[],
        }
    }

    /// The operation that undoes this one.
    pub fn invert(&self) -> ObjectOp {
        match self {
            ObjectOp::Create { path, val } => ObjectOp::Delete {
                path: path.clone(),
                val: val.clone(),
            },
            ObjectOp::Delete { path, val } => ObjectOp::Create {
                path: path.clone(),
                val: val.clone(),
            },
            ObjectOp::Update { path, diff } => ObjectOp::Update {
                path: path.clone(),
                diff: diff.invert(),
            },
            ObjectOp::Set {
                path,
                val,
                original,
            } => ObjectOp::Set {
                path: path.clone(),
                val: original.clone(),
                original: val.clone(),
            },
            ObjectOp::Nop => ObjectOp::Nop,
        }
    }

    /// Whether the pair needs a tie-break (or is outright unresolvable) when
    /// transformed: both address the same path and their effects cannot both
    /// be preserved as-is.
    ///
    /// Same-path Delete/Delete is not a conflict — the second delete is
    /// merely redundant. Same-path Update/Update inherits the underlying
    /// sequence algebra's verdict. Disjoint paths and nops never conflict.
    pub fn has_conflict(&self, other: &ObjectOp) -> bool {
        if self.is_nop() || other.is_nop() {
            return false;
        }
        if self.path() != other.path() {
            return false;
        }
        match (self, other) {
            (ObjectOp::Delete { .. }, ObjectOp::Delete { .. }) => false,
            (ObjectOp::Update { diff: da, .. }, ObjectOp::Update { diff: db, .. }) => {
                da.has_conflict(db)
            }
            _ => true,
        }
    }
}
