//! Character-offset text operations.
//!
//! A [`TextOp`] inserts or deletes a run of characters at an offset within a
//! string. All positions and lengths are counted in chars, never bytes. As
//! with [`ArrayOp`](crate::seq_ot::ArrayOp), a delete stores the text it
//! expects to remove, so operations validate against the state they were
//! derived from and invert without external lookups.
//!
//! Multi-char payloads add two transform cases the single-element algebra
//! never sees: an insert landing strictly inside a concurrently deleted
//! range (the delete absorbs the inserted text), and two deletes with
//! overlapping ranges (each keeps only the part the other did not remove).

use crate::error::{OpError, TransformError};
use crate::seq_ot::TransformOptions;

/// An atomic, invertible edit of a string.
#[derive(Debug, Clone, PartialEq)]
pub enum TextOp {
    /// Insert `text` so that it starts at char offset `pos`.
    Insert { pos: usize, text: String },
    /// Remove the chars at `[pos, pos + text.chars().count())`, which must
    /// equal `text`.
    Delete { pos: usize, text: String },
    /// The identity operation.
    Nop,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The chars of `s` in `[from, to)`, counted in chars.
fn char_slice(s: &str, from: usize, to: usize) -> String {
    s.chars().skip(from).take(to.saturating_sub(from)).collect()
}

impl TextOp {
    pub fn insert(pos: usize, text: impl Into<String>) -> Self {
        TextOp::Insert {
            pos,
            text: text.into(),
        }
    }

    pub fn delete(pos: usize, text: impl Into<String>) -> Self {
        TextOp::Delete {
            pos,
            text: text.into(),
        }
    }

    pub fn is_nop(&self) -> bool {
        matches!(self, TextOp::Nop)
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, TextOp::Insert { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, TextOp::Delete { .. })
    }

    /// The operation's char offset; `None` for nop.
    pub fn pos(&self) -> Option<usize> {
        match self {
            TextOp::Insert { pos, .. } | TextOp::Delete { pos, .. } => Some(*pos),
            TextOp::Nop => None,
        }
    }

    /// Apply to a string, returning the edited copy.
    ///
    /// Fails when the offset (or the deleted range) lies beyond the string,
    /// or when a delete's stored payload differs from the chars actually
    /// there. Both mean the operation belongs to a different base state.
    pub fn apply(&self, s: &str) -> Result<String, OpError> {
        match self {
            TextOp::Insert { pos, text } => {
                let len = char_len(s);
                if *pos > len {
                    return Err(OpError::PosOutOfBounds { pos: *pos, len });
                }
                let mut out = String::with_capacity(s.len() + text.len());
                out.extend(s.chars().take(*pos));
                out.push_str(text);
                out.extend(s.chars().skip(*pos));
                Ok(out)
            }
            TextOp::Delete { pos, text } => {
                let len = char_len(s);
                let del_len = char_len(text);
                if pos + del_len > len {
                    return Err(OpError::PosOutOfBounds { pos: *pos, len });
                }
                if char_slice(s, *pos, pos + del_len) != *text {
                    return Err(OpError::ValueMismatch);
                }
                let mut out = String::with_capacity(s.len());
                out.extend(s.chars().take(*pos));
                out.extend(s.chars().skip(pos + del_len));
                Ok(out)
            }
            TextOp::Nop => Ok(s.to_string()),
        }
    }

    /// The operation that undoes this one.
    pub fn invert(&self) -> TextOp {
        match self {
            TextOp::Insert { pos, text } => TextOp::Delete {
                pos: *pos,
                text: text.clone(),
            },
            TextOp::Delete { pos, text } => TextOp::Insert {
                pos: *pos,
                text: text.clone(),
            },
            TextOp::Nop => TextOp::Nop,
        }
    }

    /// Two concurrent inserts at the same offset are ambiguous; every other
    /// pair resolves deterministically.
    pub fn has_conflict(&self, other: &TextOp) -> bool {
        matches!(
            (self, other),
            (TextOp::Insert { pos: a, .. }, TextOp::Insert { pos: b, .. }) if a == b
        )
    }

    /// Transform two operations derived from the same base so each can be
    /// applied after the other. Returns new operations; the inputs are left
    /// untouched.
    pub fn transform(
        a: &TextOp,
        b: &TextOp,
        options: &TransformOptions,
    ) -> Result<(TextOp, TextOp), TransformError> {
        if options.no_conflict && a.has_conflict(b) {
            return Err(TransformError::Conflict);
        }
        transform_pair(a, b)
    }

    /// Transform, mutating the two operations the caller owns exclusively.
    pub fn transform_inplace(
        a: &mut TextOp,
        b: &mut TextOp,
        options: &TransformOptions,
    ) -> Result<(), TransformError> {
        let (a2, b2) = Self::transform(a, b, options)?;
        *a = a2;
        *b = b2;
        Ok(())
    }
}

fn transform_pair(a: &TextOp, b: &TextOp) -> Result<(TextOp, TextOp), TransformError> {
    match (a, b) {
        (TextOp::Nop, _) | (_, TextOp::Nop) => Ok((a.clone(), b.clone())),

        (TextOp::Insert { pos: pa, text: ta }, TextOp::Insert { pos: pb, text: tb }) => {
            // Ties go to `a`: it is treated as applied first.
            if pa <= pb {
                Ok((
                    a.clone(),
                    TextOp::Insert {
                        pos: pb + char_len(ta),
                        text: tb.clone(),
                    },
                ))
            } else {
                Ok((
                    TextOp::Insert {
                        pos: pa + char_len(tb),
                        text: ta.clone(),
                    },
                    b.clone(),
                ))
            }
        }

        (TextOp::Insert { .. }, TextOp::Delete { .. }) => {
            let (i2, d2) = transform_insert_delete(a, b);
            Ok((i2, d2))
        }
        (TextOp::Delete { .. }, TextOp::Insert { .. }) => {
            let (i2, d2) = transform_insert_delete(b, a);
            Ok((d2, i2))
        }

        (TextOp::Delete { pos: pa, .. }, TextOp::Delete { pos: pb, .. }) => {
            if pa <= pb {
                transform_delete_delete(a, b)
            } else {
                let (b2, a2) = transform_delete_delete(b, a)?;
                Ok((a2, b2))
            }
        }
    }
}

/// Transform an insert against a delete, returning `(insert', delete')`.
fn transform_insert_delete(ins: &TextOp, del: &TextOp) -> (TextOp, TextOp) {
    let (pi, ti) = match ins {
        TextOp::Insert { pos, text } => (*pos, text),
        _ => return (ins.clone(), del.clone()),
    };
    let (pd, td) = match del {
        TextOp::Delete { pos, text } => (*pos, text),
        _ => return (ins.clone(), del.clone()),
    };
    let ins_len = char_len(ti);
    let del_len = char_len(td);

    if pi <= pd {
        // Insertion at or before the deleted range: the insert stays put,
        // the delete's target has shifted past it.
        (
            ins.clone(),
            TextOp::Delete {
                pos: pd + ins_len,
                text: td.clone(),
            },
        )
    } else if pi >= pd + del_len {
        (
            TextOp::Insert {
                pos: pi - del_len,
                text: ti.clone(),
            },
            del.clone(),
        )
    } else {
        // Insertion strictly inside the deleted range: the delete absorbs
        // the inserted text and the insert gives way.
        let split = pi - pd;
        let mut text = char_slice(td, 0, split);
        text.push_str(ti);
        text.push_str(&char_slice(td, split, del_len));
        (TextOp::Nop, TextOp::Delete { pos: pd, text })
    }
}

/// Transform two deletes with `first.pos <= second.pos`, returning
/// `(first', second')`.
fn transform_delete_delete(first: &TextOp, second: &TextOp) -> Result<(TextOp, TextOp), TransformError> {
    let (pf, tf) = match first {
        TextOp::Delete { pos, text } => (*pos, text),
        _ => return Ok((first.clone(), second.clone())),
    };
    let (ps, ts) = match second {
        TextOp::Delete { pos, text } => (*pos, text),
        _ => return Ok((first.clone(), second.clone())),
    };
    let lf = char_len(tf);
    let ls = char_len(ts);

    if pf + lf <= ps {
        // Disjoint ranges: the later delete shifts down.
        return Ok((
            first.clone(),
            TextOp::Delete {
                pos: ps - lf,
                text: ts.clone(),
            },
        ));
    }

    // Overlapping ranges. The chars both claim to delete must agree, or the
    // two operations cannot share a base state.
    let ov = (pf + lf).min(ps + ls) - ps;
    if char_slice(tf, ps - pf, ps - pf + ov) != char_slice(ts, 0, ov) {
        return Err(TransformError::BaseMismatch);
    }

    // Each delete keeps only the part the other did not already remove; the
    // survivors on either side of the overlap join into one contiguous run
    // starting at the first delete's offset.
    let mut f_text = char_slice(tf, 0, ps - pf);
    if pf + lf > ps + ls {
        f_text.push_str(&char_slice(tf, ps + ls - pf, lf));
    }
    let first2 = if f_text.is_empty() {
        TextOp::Nop
    } else {
        TextOp::Delete { pos: pf, text: f_text }
    };
    let second2 = if ps + ls > pf + lf {
        TextOp::Delete {
            pos: pf,
            text: char_slice(ts, pf + lf - ps, ls),
        }
    } else {
        TextOp::Nop
    };
    Ok((first2, second2))
}
