//! Transformation of concurrent object operations.
//!
//! For two operations `a`, `b` derived from the same base tree,
//! `transform(a, b)` yields `(a2, b2)` such that applying `a` then `b2`
//! reaches the same tree as applying `b` then `a2`.
//!
//! Same-path pairs resolve per the table below; disjoint paths (including
//! ancestor/descendant paths) and nops pass through untouched.
//!
//! | a \ b  | Create | Delete  | Update  | Set     |
//! |:-------|:-------|:--------|:--------|:--------|
//! | Create | error  | error   | error   | error   |
//! | Delete | error  | nop/nop | b wins  | b wins  |
//! | Update | error  | b wins  | seq OT  | error   |
//! | Set    | error  | b wins  | error   | b wins  |
//!
//! "b wins": where only one effect can survive, the operand passed second
//! carries the surviving value. Both argument orders are internally
//! convergent; callers fix one order repo-wide so independent sites agree.

use crate::error::TransformError;
use crate::obj_ot::types::{Diff, ObjectOp};
use crate::seq_ot::{ArrayOp, TextOp, TransformOptions};

impl ObjectOp {
    /// Transform two operations derived from the same base tree. Returns new
    /// operations; the inputs are left untouched.
    ///
    /// Unresolvable pairs (any Create pairing, Update with Set) refuse with
    /// their specific error no matter which options are given.
    pub fn transform(
        a: &ObjectOp,
        b: &ObjectOp,
        options: &TransformOptions,
    ) -> Result<(ObjectOp, ObjectOp), TransformError> {
        if a.is_nop() || b.is_nop() || a.path() != b.path() {
            return Ok((a.clone(), b.clone()));
        }

        match (a, b) {
            (ObjectOp::Create { .. }, ObjectOp::Create { .. }) => {
                return Err(TransformError::CreateCreate)
            }
            (ObjectOp::Create { .. }, _) | (_, ObjectOp::Create { .. }) => {
                return Err(TransformError::CreateIncompatible)
            }
            (ObjectOp::Update { .. }, ObjectOp::Set { .. })
            | (ObjectOp::Set { .. }, ObjectOp::Update { .. }) => {
                return Err(TransformError::UpdateSet)
            }
            _ => {}
        }

        if options.no_conflict && a.has_conflict(b) {
            return Err(TransformError::Conflict);
        }

        let pair = match (a, b) {
            (ObjectOp::Delete { val: va, .. }, ObjectOp::Delete { val: vb, .. }) => {
                if va != vb {
                    return Err(TransformError::BaseMismatch);
                }
                // The same property deleted twice: the second is redundant.
                (ObjectOp::Nop, ObjectOp::Nop)
            }

            (ObjectOp::Delete { path, val }, ObjectOp::Update { diff, .. }) => {
                // The update survives: fold its diff into the deleted value
                // and recreate the property with the edit applied.
                let patched = diff.apply_to(val).map_err(|_| TransformError::BaseMismatch)?;
                (
                    ObjectOp::Nop,
                    ObjectOp::Create {
                        path: path.clone(),
                        val: patched,
                    },
                )
            }
            (ObjectOp::Update { diff, .. }, ObjectOp::Delete { path, val }) => {
                // The delete survives, but must expect the updated value.
                let patched = diff.apply_to(val).map_err(|_| TransformError::BaseMismatch)?;
                (
                    ObjectOp::Nop,
                    ObjectOp::Delete {
                        path: path.clone(),
                        val: patched,
                    },
                )
            }

            (ObjectOp::Delete { path, .. }, ObjectOp::Set { val, .. }) => (
                ObjectOp::Nop,
                ObjectOp::Create {
                    path: path.clone(),
                    val: val.clone(),
                },
            ),
            (ObjectOp::Set { val, .. }, ObjectOp::Delete { path, .. }) => (
                ObjectOp::Nop,
                ObjectOp::Delete {
                    path: path.clone(),
                    val: val.clone(),
                },
            ),

            (
                ObjectOp::Update { path, diff: da },
                ObjectOp::Update { diff: db, .. },
            ) => {
                let (da2, db2) = match (da, db) {
                    (Diff::Array(x), Diff::Array(y)) => {
                        let (x2, y2) = ArrayOp::transform(x, y, options)?;
                        (Diff::Array(x2), Diff::Array(y2))
                    }
                    (Diff::Text(x), Diff::Text(y)) => {
                        let (x2, y2) = TextOp::transform(x, y, options)?;
                        (Diff::Text(x2), Diff::Text(y2))
                    }
                    // One value cannot be both a string and an array.
                    _ => return Err(TransformError::BaseMismatch),
                };
                (
                    ObjectOp::Update {
                        path: path.clone(),
                        diff: da2,
                    },
                    ObjectOp::Update {
                        path: path.clone(),
                        diff: db2,
                    },
                )
            }

            (ObjectOp::Set { path, val: va, .. }, ObjectOp::Set { val: vb, .. }) => (
                // Last writer wins by argument order; the survivor's
                // `original` is rewritten so it still inverts after `a`.
                ObjectOp::Nop,
                ObjectOp::Set {
                    path: path.clone(),
                    val: vb.clone(),
                    original: va.clone(),
                },
            ),

            // Nop and Create combinations returned above.
            _ => (a.clone(), b.clone()),
        };
        Ok(pair)
    }

    /// Transform, mutating the two operations the caller owns exclusively.
    pub fn transform_inplace(
        a: &mut ObjectOp,
        b: &mut ObjectOp,
        options: &TransformOptions,
    ) -> Result<(), TransformError> {
        let (a2, b2) = Self::transform(a, b, options)?;
        *a = a2;
        *b = b2;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn opts() -> TransformOptions {
        TransformOptions::default()
    }

    /// Transform and apply both ways, asserting convergence; returns the
    /// converged tree.
    fn check_diamond(base: &Value, a: &ObjectOp, b: &ObjectOp) -> Value {
        let (a2, b2) = ObjectOp::transform(a, b, &opts()).unwrap();
        let mut left = base.clone();
        a.apply(&mut left).unwrap();
        b2.apply(&mut left).unwrap();
        let mut right = base.clone();
        b.apply(&mut right).unwrap();
        a2.apply(&mut right).unwrap();
        assert_eq!(left, right, "diamond failed for {a:?} / {b:?}");
        left
    }

    #[test]
    fn disjoint_paths_pass_through() {
        let a = ObjectOp::set("a", json!(1), json!(2));
        let b = ObjectOp::delete("b", json!("x"));
        let (a2, b2) = ObjectOp::transform(&a, &b, &opts()).unwrap();
        assert_eq!(a2, a);
        assert_eq!(b2, b);
    }

    #[test]
    fn ancestor_descendant_paths_pass_through() {
        let a = ObjectOp::delete("a", json!({"b": 1}));
        let b = ObjectOp::set(["a", "b"], json!(1), json!(2));
        let (a2, b2) = ObjectOp::transform(&a, &b, &opts()).unwrap();
        assert_eq!(a2, a);
        assert_eq!(b2, b);
    }

    #[test]
    fn nop_passes_through() {
        let a = ObjectOp::create("a", json!(1));
        let (a2, b2) = ObjectOp::transform(&a, &ObjectOp::Nop, &opts()).unwrap();
        assert_eq!(a2, a);
        assert_eq!(b2, ObjectOp::Nop);
    }

    #[test]
    fn create_create_is_unresolvable() {
        let a = ObjectOp::create("a", json!("x"));
        let b = ObjectOp::create("a", json!("y"));
        assert_eq!(
            ObjectOp::transform(&a, &b, &opts()).unwrap_err(),
            TransformError::CreateCreate
        );
        // The no-conflict option does not change the outcome.
        let strict = TransformOptions { no_conflict: true };
        assert_eq!(
            ObjectOp::transform(&a, &b, &strict).unwrap_err(),
            TransformError::CreateCreate
        );
    }

    #[test]
    fn create_paired_with_anything_is_unresolvable() {
        let create = ObjectOp::create("a", json!("x"));
        let upd = ObjectOp::update("a", TextOp::insert(0, "y"));
        let del = ObjectOp::delete("a", json!("x"));
        let set = ObjectOp::set("a", json!("x"), json!("y"));
        for other in [upd, del, set] {
            assert_eq!(
                ObjectOp::transform(&create, &other, &opts()).unwrap_err(),
                TransformError::CreateIncompatible
            );
            assert_eq!(
                ObjectOp::transform(&other, &create, &opts()).unwrap_err(),
                TransformError::CreateIncompatible
            );
        }
    }

    #[test]
    fn delete_delete_same_value_cancels() {
        let a = ObjectOp::delete("a", json!("bla"));
        let (a2, b2) = ObjectOp::transform(&a, &a.clone(), &opts()).unwrap();
        assert_eq!(a2, ObjectOp::Nop);
        assert_eq!(b2, ObjectOp::Nop);
        assert_eq!(check_diamond(&json!({"a": "bla"}), &a, &a.clone()), json!({}));
    }

    #[test]
    fn delete_delete_value_mismatch() {
        let a = ObjectOp::delete("a", json!(1));
        let b = ObjectOp::delete("a", json!(2));
        assert_eq!(
            ObjectOp::transform(&a, &b, &opts()).unwrap_err(),
            TransformError::BaseMismatch
        );
    }

    #[test]
    fn delete_update_second_operand_wins() {
        let base = json!({"a": "bla"});
        let del = ObjectOp::delete("a", json!("bla"));
        let upd = ObjectOp::update("a", TextOp::insert(3, "pp"));

        // Update passed second: the edited property survives.
        let (d2, u2) = ObjectOp::transform(&del, &upd, &opts()).unwrap();
        assert_eq!(d2, ObjectOp::Nop);
        assert_eq!(u2, ObjectOp::create("a", json!("blapp")));
        assert_eq!(check_diamond(&base, &del, &upd), json!({"a": "blapp"}));

        // Delete passed second: the property goes, expecting the edit.
        let (u3, d3) = ObjectOp::transform(&upd, &del, &opts()).unwrap();
        assert_eq!(u3, ObjectOp::Nop);
        assert_eq!(d3, ObjectOp::delete("a", json!("blapp")));
        assert_eq!(check_diamond(&base, &upd, &del), json!({}));
    }

    #[test]
    fn delete_update_with_array_diff() {
        let base = json!({"a": [1, 2]});
        let del = ObjectOp::delete("a", json!([1, 2]));
        let upd = ObjectOp::update("a", ArrayOp::insert(2, json!(3)));
        assert_eq!(check_diamond(&base, &del, &upd), json!({"a": [1, 2, 3]}));
        assert_eq!(check_diamond(&base, &upd, &del), json!({}));
    }

    #[test]
    fn delete_update_inconsistent_pair() {
        // The deleted value cannot be the thing the diff edits.
        let del = ObjectOp::delete("a", json!([1, 2]));
        let upd = ObjectOp::update("a", TextOp::insert(0, "x"));
        assert_eq!(
            ObjectOp::transform(&del, &upd, &opts()).unwrap_err(),
            TransformError::BaseMismatch
        );
    }

    #[test]
    fn delete_set_second_operand_wins() {
        let base = json!({"a": "old"});
        let del = ObjectOp::delete("a", json!("old"));
        let set = ObjectOp::set("a", json!("old"), json!("new"));

        let (d2, s2) = ObjectOp::transform(&del, &set, &opts()).unwrap();
        assert_eq!(d2, ObjectOp::Nop);
        assert_eq!(s2, ObjectOp::create("a", json!("new")));
        assert_eq!(check_diamond(&base, &del, &set), json!({"a": "new"}));

        let (s3, d3) = ObjectOp::transform(&set, &del, &opts()).unwrap();
        assert_eq!(s3, ObjectOp::Nop);
        assert_eq!(d3, ObjectOp::delete("a", json!("new")));
        assert_eq!(check_diamond(&base, &set, &del), json!({}));
    }

    #[test]
    fn update_update_delegates_to_seq_transform() {
        let base = json!({"a": "bla"});
        let a = ObjectOp::update("a", TextOp::insert(0, "x"));
        let b = ObjectOp::update("a", TextOp::insert(3, "y"));
        assert_eq!(check_diamond(&base, &a, &b), json!({"a": "xblay"}));

        let base = json!({"a": [1, 2]});
        let a = ObjectOp::update("a", ArrayOp::insert(0, json!(0)));
        let b = ObjectOp::update("a", ArrayOp::delete(1, json!(2)));
        assert_eq!(check_diamond(&base, &a, &b), json!({"a": [0, 1]}));
    }

    #[test]
    fn update_update_mixed_families() {
        let a = ObjectOp::update("a", TextOp::insert(0, "x"));
        let b = ObjectOp::update("a", ArrayOp::insert(0, json!(1)));
        assert_eq!(
            ObjectOp::transform(&a, &b, &opts()).unwrap_err(),
            TransformError::BaseMismatch
        );
    }

    #[test]
    fn update_set_is_unresolvable() {
        let upd = ObjectOp::update("a", TextOp::insert(0, "x"));
        let set = ObjectOp::set("a", json!("s"), json!("t"));
        assert_eq!(
            ObjectOp::transform(&upd, &set, &opts()).unwrap_err(),
            TransformError::UpdateSet
        );
        assert_eq!(
            ObjectOp::transform(&set, &upd, &opts()).unwrap_err(),
            TransformError::UpdateSet
        );
    }

    #[test]
    fn set_set_last_writer_wins_by_argument_order() {
        let base = json!({"a": 0});
        let a = ObjectOp::set("a", json!(0), json!(1));
        let b = ObjectOp::set("a", json!(0), json!(2));

        let (a2, b2) = ObjectOp::transform(&a, &b, &opts()).unwrap();
        assert_eq!(a2, ObjectOp::Nop);
        assert_eq!(b2, ObjectOp::set("a", json!(1), json!(2)));
        assert_eq!(check_diamond(&base, &a, &b), json!({"a": 2}));
        assert_eq!(check_diamond(&base, &b, &a), json!({"a": 1}));
    }

    #[test]
    fn set_set_survivor_still_inverts() {
        let a = ObjectOp::set("a", json!(0), json!(1));
        let b = ObjectOp::set("a", json!(0), json!(2));
        let (_, b2) = ObjectOp::transform(&a, &b, &opts()).unwrap();
        let mut doc = json!({"a": 0});
        a.apply(&mut doc).unwrap();
        b2.apply(&mut doc).unwrap();
        b2.invert().apply(&mut doc).unwrap();
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn no_conflict_refuses_resolvable_conflicts() {
        let strict = TransformOptions { no_conflict: true };
        let del = ObjectOp::delete("a", json!("x"));
        let set = ObjectOp::set("a", json!("x"), json!("y"));
        assert_eq!(
            ObjectOp::transform(&del, &set, &strict).unwrap_err(),
            TransformError::Conflict
        );
        // Redundant deletes are not conflicts, strict mode or not.
        assert!(ObjectOp::transform(&del, &del.clone(), &strict).is_ok());
    }

    #[test]
    fn transform_inplace_mutates_operands() {
        let mut a = ObjectOp::set("a", json!(0), json!(1));
        let mut b = ObjectOp::set("a", json!(0), json!(2));
        ObjectOp::transform_inplace(&mut a, &mut b, &opts()).unwrap();
        assert_eq!(a, ObjectOp::Nop);
        assert_eq!(b, ObjectOp::set("a", json!(1), json!(2)));
    }
}
