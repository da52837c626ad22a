//! Primary error enum for mutation tracking and scope loading.

use figment::Error as FigmentError;
use thiserror::Error;

use super::aggregate::AggregatedErrors;

/// Errors that can occur while recording, decoding, or loading variables.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VarError {
    /// An unrecognised mutation kind, or a `set` without a key.
    #[error("invalid instruction '{instruction}': {reason}")]
    InvalidInstruction {
        /// The instruction as supplied by the caller.
        instruction: String,
        /// Why the instruction was rejected.
        reason: String,
    },

    /// A serialized changeset record could not be decoded.
    #[error("malformed changeset: {reason}")]
    MalformedChangeset {
        /// Human-readable explanation of the decoding failure.
        reason: String,
    },

    /// A serialized mutation log document has an unusable shape.
    #[error("malformed mutation log: {reason}")]
    MalformedLog {
        /// Human-readable explanation of the decoding failure.
        reason: String,
    },

    /// Error while gathering variables from figment providers.
    #[error("Failed to gather variables: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// Multiple errors occurred while decoding a batch of records.
    #[error("multiple variable errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}
