//! doc-ot — operation algebra and transform engine for collaborative
//! document editing.
//!
//! Atomic, invertible edit operations over ordered sequences
//! ([`ArrayOp`]), character sequences ([`TextOp`]), and a path-addressed
//! property tree ([`ObjectOp`]), plus the pairwise transform functions that
//! let two operations produced concurrently against the same base state be
//! reordered while converging on one final state (the diamond property).
//!
//! Everything here is synchronous and pure: `apply` mutates the tree or
//! sequence it is handed, `transform` reads its inputs (or mutates them,
//! through the explicit `_inplace` variants), and nothing does I/O. The
//! transaction engine above this crate owns event emission, history, and
//! the decision what to do when a transform reports a conflict.

pub mod codec;
pub mod error;
pub mod obj_ot;
pub mod seq_ot;

pub use codec::DecodeError;
pub use error::{OpError, TransformError};
pub use obj_ot::{Diff, ObjectOp, PropertyTree};
pub use seq_ot::{ArrayOp, TextOp, TransformOptions};
