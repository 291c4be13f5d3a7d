//! Named-field JSON codec.
//!
//! The verbose counterpart to the compact wire format: operations as JSON
//! objects with a `type` discriminator, for debugging, logs, and
//! interchange with tooling that wants self-describing fields. Implemented
//! as `to_json`/`from_json` on each operation type.

use doc_ot_path::Path;
use serde_json::{json, Map, Value};

use crate::codec::DecodeError;
use crate::obj_ot::{Diff, ObjectOp};
use crate::seq_ot::{ArrayOp, TextOp};

// ── Field helpers ──────────────────────────────────────────────────────────

fn obj(v: &Value) -> Result<&Map<String, Value>, DecodeError> {
    v.as_object()
        .ok_or_else(|| DecodeError::BadShape("operation must be an object".into()))
}

fn field<'a>(m: &'a Map<String, Value>, name: &str) -> Result<&'a Value, DecodeError> {
    m.get(name)
        .ok_or_else(|| DecodeError::BadShape(format!("missing field `{name}`")))
}

fn str_field<'a>(m: &'a Map<String, Value>, name: &str) -> Result<&'a str, DecodeError> {
    field(m, name)?
        .as_str()
        .ok_or_else(|| DecodeError::BadShape(format!("field `{name}` must be a string")))
}

fn pos_field(m: &Map<String, Value>, name: &str) -> Result<usize, DecodeError> {
    field(m, name)?
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| DecodeError::BadShape(format!("field `{name}` must be a non-negative integer")))
}

/// A path is an array of string segments; a bare string is accepted as a
/// single-segment path, mirroring the constructors.
fn path_field(m: &Map<String, Value>) -> Result<Path, DecodeError> {
    match field(m, "path")? {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(segs) => segs
            .iter()
            .map(|seg| {
                seg.as_str()
                    .map(|s| s.to_string())
                    .ok_or_else(|| DecodeError::BadShape("path segment must be a string".into()))
            })
            .collect(),
        _ => Err(DecodeError::BadShape("path must be a string or an array".into())),
    }
}

// ── ArrayOp ────────────────────────────────────────────────────────────────

impl ArrayOp {
    pub fn to_json(&self) -> Value {
        match self {
            ArrayOp::Insert { pos, val } => json!({"type": "insert", "pos": pos, "val": val}),
            ArrayOp::Delete { pos, val } => json!({"type": "delete", "pos": pos, "val": val}),
            ArrayOp::Nop => json!({"type": "nop"}),
        }
    }

    pub fn from_json(v: &Value) -> Result<ArrayOp, DecodeError> {
        let m = obj(v)?;
        match str_field(m, "type")? {
            "insert" => Ok(ArrayOp::Insert {
                pos: pos_field(m, "pos")?,
                val: field(m, "val")?.clone(),
            }),
            "delete" => Ok(ArrayOp::Delete {
                pos: pos_field(m, "pos")?,
                val: field(m, "val")?.clone(),
            }),
            "nop" => Ok(ArrayOp::Nop),
            other => Err(DecodeError::UnknownCode(other.to_string())),
        }
    }
}

// ── TextOp ─────────────────────────────────────────────────────────────────

impl TextOp {
    pub fn to_json(&self) -> Value {
        match self {
            TextOp::Insert { pos, text } => json!({"type": "insert", "pos": pos, "str": text}),
            TextOp::Delete { pos, text } => json!({"type": "delete", "pos": pos, "str": text}),
            TextOp::Nop => json!({"type": "nop"}),
        }
    }

    pub fn from_json(v: &Value) -> Result<TextOp, DecodeError> {
        let m = obj(v)?;
        match str_field(m, "type")? {
            "insert" => Ok(TextOp::Insert {
                pos: pos_field(m, "pos")?,
                text: str_field(m, "str")?.to_string(),
            }),
            "delete" => Ok(TextOp::Delete {
                pos: pos_field(m, "pos")?,
                text: str_field(m, "str")?.to_string(),
            }),
            "nop" => Ok(TextOp::Nop),
            other => Err(DecodeError::UnknownCode(other.to_string())),
        }
    }
}

// ── ObjectOp ───────────────────────────────────────────────────────────────

impl Diff {
    fn to_json(&self) -> Value {
        match self {
            Diff::Array(op) => op.to_json(),
            Diff::Text(op) => op.to_json(),
        }
    }

    fn from_json(property_type: &str, v: &Value) -> Result<Diff, DecodeError> {
        match property_type {
            "array" => Ok(Diff::Array(ArrayOp::from_json(v)?)),
            "string" => Ok(Diff::Text(TextOp::from_json(v)?)),
            other => Err(DecodeError::UnknownCode(other.to_string())),
        }
    }
}

impl ObjectOp {
    pub fn to_json(&self) -> Value {
        match self {
            ObjectOp::Create { path, val } => {
                json!({"type": "create", "path": path, "val": val})
            }
            ObjectOp::Delete { path, val } => {
                json!({"type": "delete", "path": path, "val": val})
            }
            ObjectOp::Update { path, diff } => json!({
                "type": "update",
                "path": path,
                "propertyType": diff.property_type(),
                "diff": diff.to_json(),
            }),
            ObjectOp::Set {
                path,
                val,
                original,
            } => json!({"type": "set", "path": path, "val": val, "original": original}),
            ObjectOp::Nop => json!({"type": "nop"}),
        }
    }

    pub fn from_json(v: &Value) -> Result<ObjectOp, DecodeError> {
        let m = obj(v)?;
        match str_field(m, "type")? {
            "create" => Ok(ObjectOp::Create {
                path: path_field(m)?,
                val: field(m, "val")?.clone(),
            }),
            "delete" => Ok(ObjectOp::Delete {
                path: path_field(m)?,
                val: field(m, "val")?.clone(),
            }),
            "update" => Ok(ObjectOp::Update {
                path: path_field(m)?,
                diff: Diff::from_json(str_field(m, "propertyType")?, field(m, "diff")?)?,
            }),
            "set" => Ok(ObjectOp::Set {
                path: path_field(m)?,
                val: field(m, "val")?.clone(),
                original: field(m, "original")?.clone(),
            }),
            "nop" => Ok(ObjectOp::Nop),
            other => Err(DecodeError::UnknownCode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_op_roundtrip() {
        for op in [
            ArrayOp::insert(2, json!(3)),
            ArrayOp::delete(0, json!({"k": [1, 2]})),
            ArrayOp::Nop,
        ] {
            assert_eq!(ArrayOp::from_json(&op.to_json()).unwrap(), op);
        }
    }

    #[test]
    fn text_op_roundtrip() {
        for op in [
            TextOp::insert(3, "foo"),
            TextOp::delete(1, "bc"),
            TextOp::Nop,
        ] {
            assert_eq!(TextOp::from_json(&op.to_json()).unwrap(), op);
        }
    }

    #[test]
    fn text_op_json_form() {
        assert_eq!(
            TextOp::insert(3, "foo").to_json(),
            json!({"type": "insert", "pos": 3, "str": "foo"})
        );
    }

    #[test]
    fn object_op_roundtrip() {
        for op in [
            ObjectOp::create("a", json!({"x": 1})),
            ObjectOp::delete(["p1", "content"], json!("bla")),
            ObjectOp::update("a", TextOp::insert(3, "pp")),
            ObjectOp::update("a", ArrayOp::delete(1, json!(2))),
            ObjectOp::set("a", Value::Null, json!(1)),
            ObjectOp::Nop,
        ] {
            assert_eq!(ObjectOp::from_json(&op.to_json()).unwrap(), op);
        }
    }

    #[test]
    fn update_json_carries_property_type() {
        let op = ObjectOp::update("a", TextOp::insert(3, "pp"));
        assert_eq!(
            op.to_json(),
            json!({
                "type": "update",
                "path": ["a"],
                "propertyType": "string",
                "diff": {"type": "insert", "pos": 3, "str": "pp"},
            })
        );
    }

    #[test]
    fn bare_string_path_accepted() {
        let v = json!({"type": "create", "path": "a", "val": 1});
        assert_eq!(
            ObjectOp::from_json(&v).unwrap(),
            ObjectOp::create("a", json!(1))
        );
    }

    #[test]
    fn reject_missing_fields() {
        assert!(ObjectOp::from_json(&json!({"type": "create", "path": ["a"]})).is_err());
        assert!(ObjectOp::from_json(&json!({"type": "set", "path": ["a"], "val": 1})).is_err());
        assert!(TextOp::from_json(&json!({"type": "insert", "pos": 1})).is_err());
    }

    #[test]
    fn reject_unknown_type() {
        assert_eq!(
            ObjectOp::from_json(&json!({"type": "move", "path": ["a"]})).unwrap_err(),
            DecodeError::UnknownCode("move".to_string())
        );
    }

    #[test]
    fn reject_unknown_property_type() {
        let v = json!({
            "type": "update",
            "path": ["a"],
            "propertyType": "number",
            "diff": {"type": "nop"},
        });
        assert_eq!(
            ObjectOp::from_json(&v).unwrap_err(),
            DecodeError::UnknownCode("number".to_string())
        );
    }
}
