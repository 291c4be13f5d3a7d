//! Error types shared by the operation families.
//!
//! Application errors are fatal by design: a mismatch between an operation
//! and the state it is applied to means the operation was derived from a
//! different base state, and silently skipping it would corrupt every
//! derived history. Transform conflicts are the one catchable class — the
//! transaction layer decides whether to abort, rebase, or surface them.

use doc_ot_path::PathError;
use thiserror::Error;

/// Failure while applying an operation to a state it does not match.
#[derive(Debug, Error, PartialEq)]
pub enum OpError {
    /// Position lies beyond the end of the target sequence.
    #[error("POS_OUT_OF_BOUNDS: {pos} > {len}")]
    PosOutOfBounds { pos: usize, len: usize },
    /// A delete's stored payload differs from the value actually found.
    #[error("VALUE_MISMATCH")]
    ValueMismatch,
    /// No value exists at the operation's path.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    /// The value at the path is not the kind the diff expects.
    #[error("WRONG_TYPE: expected {expected}")]
    WrongType { expected: &'static str },
    /// Path navigation failed below the operation level.
    #[error("PATH: {0}")]
    Path(#[from] PathError),
}

/// Failure while transforming two concurrent operations.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    /// Two operations independently created a value at the same path; there
    /// is no well-defined merge. Raised unconditionally.
    #[error("CREATE_CREATE_CONFLICT")]
    CreateCreate,
    /// A create paired with any other operation at the same path: the base
    /// state cannot both lack and contain the property.
    #[error("CREATE_INCOMPATIBLE")]
    CreateIncompatible,
    /// A structural diff cannot be reconciled with a full replacement.
    /// Raised unconditionally.
    #[error("UPDATE_SET_CONFLICT")]
    UpdateSet,
    /// The two operations cannot have been derived from the same base state.
    #[error("BASE_MISMATCH")]
    BaseMismatch,
    /// A resolvable conflict was detected while the caller requested
    /// conflict-free transformation.
    #[error("CONFLICT")]
    Conflict,
}
