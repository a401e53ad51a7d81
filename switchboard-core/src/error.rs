//! Error types for the Switchboard command system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a recoverable argument-count or argument-shape problem.
///
/// These never propagate out of a dispatch: the dispatcher renders a help
/// block for the invoker and returns `false` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageError {
    /// Fewer tokens than the command's mandatory argument count
    NotEnoughArguments,

    /// More tokens than the command's bounded maximum
    TooManyArguments,

    /// A token failed type validation, or leftover tokens with no collector
    MismatchArguments,
}

/// Errors raised while building or mutating a command tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// Argument order invariant: once a slot is optional, every later slot must be too
    #[error("cannot add a mandatory argument after an optional argument")]
    MandatoryAfterOptional,

    /// A collector consumes the rest of the line, so nothing may follow it
    #[error("cannot add an argument after a collector argument")]
    ArgAfterCollector,

    /// Sibling command names must be unique
    #[error("a subcommand named '{0}' already exists")]
    DuplicateChild(String),
}

/// Failures that propagate out of the dispatcher to the host's top-level
/// invocation boundary. Both variants are enriched with the label and the
/// owning component before leaving the dispatch call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The handler itself failed; never retried or suppressed
    #[error("unhandled failure executing command '{label}' registered by {owner}")]
    Execution {
        label: String,
        owner: String,
        #[source]
        source: anyhow::Error,
    },

    /// Completion crashed, as opposed to producing no candidates
    #[error("unhandled failure completing '{line}' registered by {owner}")]
    Completion {
        line: String,
        owner: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Result type alias for dispatch operations
pub type Result<T> = std::result::Result<T, DispatchError>;
