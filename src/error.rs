//! Central error types for tracelens.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic
//! `Display` and `From` implementations.
//!
//! Non-negativity of [`crate::distance::ControlFlowDistance`] fields is a
//! programmer-error invariant and is enforced with panicking assertions
//! rather than an error variant: a negative distance can never be handled
//! meaningfully by a caller.

use thiserror::Error;

use crate::registry::{CodeObjectId, PredicateId};

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum TraceLensError {
    /// A distance or slice query named a code object that was never
    /// registered with the static registry.
    #[error("Unknown code object: {0:?}")]
    UnknownCodeObject(CodeObjectId),

    /// A distance or slice query named a predicate that was never
    /// registered with the static registry.
    #[error("Unknown predicate: {0:?}")]
    UnknownPredicate(PredicateId),

    /// An instruction's (code object, line) pair has no matching entry in
    /// the static line table. Must surface instead of defaulting: a guessed
    /// line id silently corrupts coverage reporting.
    #[error("No registered line for code object {code_object:?} at line {line}")]
    LineNotFound {
        code_object: CodeObjectId,
        line: u32,
    },

    /// A post-processing pass encountered a statement kind it has not been
    /// extended to handle yet.
    #[error("Unsupported statement kind: {0}")]
    UnsupportedConstruct(&'static str),

    /// Invalid argument provided to a query (e.g. a criterion position past
    /// the end of the trace).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results using TraceLensError.
pub type Result<T> = std::result::Result<T, TraceLensError>;
