//! Applying object operations to a property tree.
//!
//! The algebra does not care what the surrounding document model looks like;
//! anything that resolves paths to values can be a target. [`PropertyTree`]
//! is that contract, implemented here for a plain `serde_json::Value` tree
//! and for the owned [`PathObject`] wrapper.

use doc_ot_path::{format_dotted_path, PathObject, PathStep};
use serde_json::Value;

use crate::error::OpError;
use crate::obj_ot::types::ObjectOp;

/// Path-based access to a tree of named properties.
///
/// `set` is expected to create missing intermediate containers; `get` and
/// `remove` resolve existing values only.
pub trait PropertyTree {
    fn get_value(&self, path: &[PathStep]) -> Option<&Value>;
    fn set_value(&mut self, path: &[PathStep], val: Value) -> Result<(), OpError>;
    fn remove_value(&mut self, path: &[PathStep]) -> Result<Value, OpError>;
}

impl PropertyTree for Value {
    fn get_value(&self, path: &[PathStep]) -> Option<&Value> {
        doc_ot_path::get(self, path)
    }

    fn set_value(&mut self, path: &[PathStep], val: Value) -> Result<(), OpError> {
        doc_ot_path::set(self, path, val).map_err(OpError::from)
    }

    fn remove_value(&mut self, path: &[PathStep]) -> Result<Value, OpError> {
        doc_ot_path::remove(self, path).map_err(OpError::from)
    }
}

impl PropertyTree for PathObject {
    fn get_value(&self, path: &[PathStep]) -> Option<&Value> {
        self.get(path)
    }

    fn set_value(&mut self, path: &[PathStep], val: Value) -> Result<(), OpError> {
        self.set(path, val).map_err(OpError::from)
    }

    fn remove_value(&mut self, path: &[PathStep]) -> Result<Value, OpError> {
        self.remove(path).map_err(OpError::from)
    }
}

impl ObjectOp {
    /// Apply to a property tree in place.
    ///
    /// Every mismatch between the operation and the tree is a hard error:
    /// a delete finding a different value, an update addressing a missing
    /// path, a diff meeting the wrong kind of value. The tree is left
    /// unchanged on error.
    pub fn apply<T: PropertyTree>(&self, tree: &mut T) -> Result<(), OpError> {
        match self {
            ObjectOp::Create { path, val } => tree.set_value(path, val.clone()),
            ObjectOp::Delete { path, val } => {
                let found = tree
                    .get_value(path)
                    .ok_or_else(|| OpError::NotFound(format_dotted_path(path)))?;
                if found != val {
                    return Err(OpError::ValueMismatch);
                }
                tree.remove_value(path)?;
                Ok(())
            }
            ObjectOp::Update { path, diff } => {
                let current = tree
                    .get_value(path)
                    .ok_or_else(|| OpError::NotFound(format_dotted_path(path)))?;
                let edited = diff.apply_to(current)?;
                tree.set_value(path, edited)
            }
            ObjectOp::Set { path, val, .. } => tree.set_value(path, val.clone()),
            ObjectOp::Nop => Ok(()),
        }
    }
}
