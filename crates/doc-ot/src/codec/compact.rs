//! Compact array codec for object operations.
//!
//! Each operation is one JSON array whose first element is a one-letter
//! opcode; the remaining elements are positional:
//!
//! ```text
//! create → ["c", path, value]
//! delete → ["d", path, value]
//! set    → ["s", path, newVal, oldVal]
//! update → ["u", path, diffCode, pos, payload]
//! nop    → ["n"]
//! ```
//!
//! `diffCode` is `"t+"`/`"t-"` for text insert/delete and `"a+"`/`"a-"` for
//! array insert/delete; the code alone determines the diff type on decode.
//!
//! Paths travel in dotted form: multi-segment paths are dot-joined, a
//! single-segment path is the bare segment. Segments containing `.` are
//! outside this format's domain. `null` stands for the source model's
//! `undefined`; no other normalization happens on the wire.
//!
//! Field order is fixed and positional; version skew is the caller's
//! problem, not this codec's.

use doc_ot_path::{format_dotted_path, parse_dotted_path, Path};
use serde_json::{json, Value};

use crate::codec::DecodeError;
use crate::obj_ot::{Diff, ObjectOp};
use crate::seq_ot::{ArrayOp, TextOp};

pub const CODE_CREATE: &str = "c";
pub const CODE_DELETE: &str = "d";
pub const CODE_SET: &str = "s";
pub const CODE_UPDATE: &str = "u";
pub const CODE_NOP: &str = "n";

pub const DIFF_TEXT_INSERT: &str = "t+";
pub const DIFF_TEXT_DELETE: &str = "t-";
pub const DIFF_ARRAY_INSERT: &str = "a+";
pub const DIFF_ARRAY_DELETE: &str = "a-";

// ── Encode ─────────────────────────────────────────────────────────────────

fn encode_path(path: &[String]) -> Value {
    Value::String(format_dotted_path(path))
}

/// Encode an operation as a compact array.
///
/// An update carrying a nop diff has no diff code; it encodes as `["n"]`,
/// which is apply-equivalent.
pub fn serialize(op: &ObjectOp) -> Value {
    match op {
        ObjectOp::Create { path, val } => json!([CODE_CREATE, encode_path(path), val]),
        ObjectOp::Delete { path, val } => json!([CODE_DELETE, encode_path(path), val]),
        ObjectOp::Set {
            path,
            val,
            original,
        } => json!([CODE_SET, encode_path(path), val, original]),
        ObjectOp::Update { path, diff } => match diff {
            Diff::Text(TextOp::Insert { pos, text }) => {
                json!([CODE_UPDATE, encode_path(path), DIFF_TEXT_INSERT, pos, text])
            }
            Diff::Text(TextOp::Delete { pos, text }) => {
                json!([CODE_UPDATE, encode_path(path), DIFF_TEXT_DELETE, pos, text])
            }
            Diff::Array(ArrayOp::Insert { pos, val }) => {
                json!([CODE_UPDATE, encode_path(path), DIFF_ARRAY_INSERT, pos, val])
            }
            Diff::Array(ArrayOp::Delete { pos, val }) => {
                json!([CODE_UPDATE, encode_path(path), DIFF_ARRAY_DELETE, pos, val])
            }
            Diff::Text(TextOp::Nop) | Diff::Array(ArrayOp::Nop) => json!([CODE_NOP]),
        },
        ObjectOp::Nop => json!([CODE_NOP]),
    }
}

// ── Decode ─────────────────────────────────────────────────────────────────

fn arr_get<'a>(arr: &'a [Value], idx: usize) -> Result<&'a Value, DecodeError> {
    arr.get(idx)
        .ok_or_else(|| DecodeError::BadShape(format!("compact op too short, missing index {idx}")))
}

fn decode_path(v: &Value) -> Result<Path, DecodeError> {
    let s = v
        .as_str()
        .ok_or_else(|| DecodeError::BadShape("path must be a string".into()))?;
    Ok(parse_dotted_path(s))
}

fn decode_pos(v: &Value) -> Result<usize, DecodeError> {
    let n = v
        .as_u64()
        .ok_or_else(|| DecodeError::BadShape("pos must be a non-negative integer".into()))?;
    Ok(n as usize)
}

fn decode_diff(code: &str, pos: usize, payload: &Value) -> Result<Diff, DecodeError> {
    match code {
        DIFF_TEXT_INSERT | DIFF_TEXT_DELETE => {
            let text = payload
                .as_str()
                .ok_or_else(|| DecodeError::BadShape("text diff payload must be a string".into()))?
                .to_string();
            Ok(Diff::Text(if code == DIFF_TEXT_INSERT {
                TextOp::Insert { pos, text }
            } else {
                TextOp::Delete { pos, text }
            }))
        }
        DIFF_ARRAY_INSERT => Ok(Diff::Array(ArrayOp::Insert {
            pos,
            val: payload.clone(),
        })),
        DIFF_ARRAY_DELETE => Ok(Diff::Array(ArrayOp::Delete {
            pos,
            val: payload.clone(),
        })),
        other => Err(DecodeError::UnknownCode(other.to_string())),
    }
}

/// Decode a compact array back into an operation.
pub fn deserialize(data: &Value) -> Result<ObjectOp, DecodeError> {
    let arr = data
        .as_array()
        .ok_or_else(|| DecodeError::BadShape("compact op must be an array".into()))?;
    if arr.is_empty() {
        return Err(DecodeError::BadShape("compact op is empty".into()));
    }
    let code = arr[0]
        .as_str()
        .ok_or_else(|| DecodeError::BadShape("opcode must be a string".into()))?;

    match code {
        CODE_CREATE => Ok(ObjectOp::Create {
            path: decode_path(arr_get(arr, 1)?)?,
            val: arr_get(arr, 2)?.clone(),
        }),
        CODE_DELETE => Ok(ObjectOp::Delete {
            path: decode_path(arr_get(arr, 1)?)?,
            val: arr_get(arr, 2)?.clone(),
        }),
        CODE_SET => Ok(ObjectOp::Set {
            path: decode_path(arr_get(arr, 1)?)?,
            val: arr_get(arr, 2)?.clone(),
            original: arr_get(arr, 3)?.clone(),
        }),
        CODE_UPDATE => {
            let path = decode_path(arr_get(arr, 1)?)?;
            let diff_code = arr_get(arr, 2)?
                .as_str()
                .ok_or_else(|| DecodeError::BadShape("diff code must be a string".into()))?;
            let pos = decode_pos(arr_get(arr, 3)?)?;
            let diff = decode_diff(diff_code, pos, arr_get(arr, 4)?)?;
            Ok(ObjectOp::Update { path, diff })
        }
        CODE_NOP => Ok(ObjectOp::Nop),
        other => Err(DecodeError::UnknownCode(other.to_string())),
    }
}
