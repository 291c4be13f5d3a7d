//! Codecs for operations.
//!
//! Two representations:
//! - [`compact`] — the positional-array wire format, the only persisted and
//!   transmitted form.
//! - [`json`] — a named-field form for debugging and interchange, backing
//!   `to_json`/`from_json` on every operation type.
//!
//! Both decode sides validate shape exhaustively and fail with a typed
//! [`DecodeError`] rather than trusting input.

use thiserror::Error;

pub mod compact;
pub mod json;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// The input's structure does not match the format.
    #[error("BAD_SHAPE: {0}")]
    BadShape(String),
    /// The input is well-formed but names an unknown operation or diff code.
    #[error("UNKNOWN_CODE: {0}")]
    UnknownCode(String),
}
