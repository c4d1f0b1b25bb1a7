//! Error taxonomy for the boundaries of the crate.
//!
//! The search core itself never raises an error: out-of-range values,
//! non-representable quadratic operations, and algebra mismatches are all
//! encoded as `None` inside [`crate::value::Value`] methods and silently
//! skipped. `TchislaError` only surfaces at the edges: problem parsing and
//! the final "no solver in the chain found anything" report.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TchislaError {
    #[error("value out of range for this algebra")]
    OutOfRange,

    #[error("quadratic operation not representable in this algebra")]
    NotRepresentable,

    #[error("target does not fit this algebra")]
    TargetMismatch,

    #[error("search exhausted max_depth={0} without finding a solution")]
    DepthExhausted(usize),

    #[error("invalid problem token: {0}")]
    InvalidInput(String),

    #[error("world-record lookup failed: {0}")]
    RecordLookup(String),
}

pub type Result<T> = std::result::Result<T, TchislaError>;
