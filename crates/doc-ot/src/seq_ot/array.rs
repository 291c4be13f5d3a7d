//! Single-element array operations.
//!
//! An [`ArrayOp`] inserts or deletes exactly one element at a position in a
//! sequence. A delete carries the element it expects to remove, which makes
//! the operation invertible without consulting external state and lets
//! `apply` reject operations derived from a different base.

use serde_json::Value;

use crate::error::{OpError, TransformError};
use crate::seq_ot::TransformOptions;

/// An atomic, invertible edit of an ordered sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayOp {
    /// Insert `val` so that it ends up at index `pos`.
    Insert { pos: usize, val: Value },
    /// Remove the element at index `pos`, which must equal `val`.
    Delete { pos: usize, val: Value },
    /// The identity operation.
    Nop,
}

impl ArrayOp {
    pub fn insert(pos: usize, val: Value) -> Self {
        ArrayOp::Insert { pos, val }
    }

    pub fn delete(pos: usize, val: Value) -> Self {
        ArrayOp::Delete { pos, val }
    }

    pub fn is_nop(&self) -> bool {
        matches!(self, ArrayOp::Nop)
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, ArrayOp::Insert { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, ArrayOp::Delete { .. })
    }

    /// The operation's position; `None` for nop.
    pub fn pos(&self) -> Option<usize> {
        match self {
            ArrayOp::Insert { pos, .. } | ArrayOp::Delete { pos, .. } => Some(*pos),
            ArrayOp::Nop => None,
        }
    }

    /// Apply to a sequence in place.
    ///
    /// Fails when the position lies beyond the sequence or a delete's stored
    /// payload does not match the element found there. Both cases mean the
    /// operation was derived from a different base state, so they are hard
    /// errors rather than warnings.
    pub fn apply(&self, seq: &mut Vec<Value>) -> Result<(), OpError> {
        match self {
            ArrayOp::Insert { pos, val } => {
                if *pos > seq.len() {
                    return Err(OpError::PosOutOfBounds {
                        pos: *pos,
                        len: seq.len(),
                    });
                }
                seq.insert(*pos, val.clone());
                Ok(())
            }
            ArrayOp::Delete { pos, val } => {
                if *pos >= seq.len() {
                    return Err(OpError::PosOutOfBounds {
                        pos: *pos,
                        len: seq.len(),
                    });
                }
                if &seq[*pos] != val {
                    return Err(OpError::ValueMismatch);
                }
                seq.remove(*pos);
                Ok(())
            }
            ArrayOp::Nop => Ok(()),
        }
    }

    /// The operation that undoes this one.
    pub fn invert(&self) -> ArrayOp {
        match self {
            ArrayOp::Insert { pos, val } => ArrayOp::Delete {
                pos: *pos,
                val: val.clone(),
            },
            ArrayOp::Delete { pos, val } => ArrayOp::Insert {
                pos: *pos,
                val: val.clone(),
            },
            ArrayOp::Nop => ArrayOp::Nop,
        }
    }

    /// Two concurrent inserts at the same position are the one ambiguous
    /// pair: their relative order is not determined by the base state.
    /// Everything else has a well-defined resolution.
    pub fn has_conflict(&self, other: &ArrayOp) -> bool {
        matches!(
            (self, other),
            (ArrayOp::Insert { pos: a, .. }, ArrayOp::Insert { pos: b, .. }) if a == b
        )
    }

    /// Transform two operations derived from the same base so each can be
    /// applied after the other. Returns new operations; the inputs are left
    /// untouched.
    pub fn transform(
        a: &ArrayOp,
        b: &ArrayOp,
        options: &TransformOptions,
    ) -> Result<(ArrayOp, ArrayOp), TransformError> {
        let mut a2 = a.clone();
        let mut b2 = b.clone();
        Self::transform_inplace(&mut a2, &mut b2, options)?;
        Ok((a2, b2))
    }

    /// Transform, mutating the two operations the caller owns exclusively.
    pub fn transform_inplace(
        a: &mut ArrayOp,
        b: &mut ArrayOp,
        options: &TransformOptions,
    ) -> Result<(), TransformError> {
        if options.no_conflict && a.has_conflict(b) {
            return Err(TransformError::Conflict);
        }

        // The same element deleted twice: the second is redundant, both
        // reduce to nop before any positional shifting.
        if let (ArrayOp::Delete { pos: pa, val: va }, ArrayOp::Delete { pos: pb, val: vb }) =
            (&*a, &*b)
        {
            if pa == pb {
                if va != vb {
                    return Err(TransformError::BaseMismatch);
                }
                *a = ArrayOp::Nop;
                *b = ArrayOp::Nop;
                return Ok(());
            }
        }

        match (&mut *a, &mut *b) {
            (ArrayOp::Nop, _) | (_, ArrayOp::Nop) => {}

            (ArrayOp::Insert { pos: pa, .. }, ArrayOp::Insert { pos: pb, .. }) => {
                // Ties go to `a`: it is treated as applied first.
                if *pa <= *pb {
                    *pb += 1;
                } else {
                    *pa += 1;
                }
            }

            (ArrayOp::Insert { pos: pi, .. }, ArrayOp::Delete { pos: pd, .. })
            | (ArrayOp::Delete { pos: pd, .. }, ArrayOp::Insert { pos: pi, .. }) => {
                // An insert at the deletion point stays put; the delete's
                // target has shifted past it.
                if *pi <= *pd {
                    *pd += 1;
                } else {
                    *pi -= 1;
                }
            }

            (ArrayOp::Delete { pos: pa, .. }, ArrayOp::Delete { pos: pb, .. }) => {
                // Equal positions were handled above.
                if *pa < *pb {
                    *pb -= 1;
                } else {
                    *pa -= 1;
                }
            }
        }
        Ok(())
    }
}
