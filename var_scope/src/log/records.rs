//! Lenient decoding of serialized changeset records.

use std::sync::Arc;

use serde_json::Value;

use super::MutationLog;
use crate::changeset::Changeset;
use crate::{VarError, VarResult};

/// A log built from decodable records alongside the errors for the rest.
#[derive(Debug)]
pub struct RecordComposition {
    log: MutationLog,
    errors: Vec<Arc<VarError>>,
}

impl RecordComposition {
    /// Create a composition from `log` and `errors`.
    #[must_use]
    #[expect(
        clippy::missing_const_for_fn,
        reason = "Vec-backed compositions are built at runtime"
    )]
    pub fn new(log: MutationLog, errors: Vec<Arc<VarError>>) -> Self {
        Self { log, errors }
    }

    /// Decompose the composition into its constituent parts.
    #[must_use]
    pub fn into_parts(self) -> (MutationLog, Vec<Arc<VarError>>) {
        (self.log, self.errors)
    }

    /// Indicates whether any record failed to decode.
    #[must_use]
    #[expect(
        clippy::missing_const_for_fn,
        reason = "Borrowing the error buffer is not const in stable Rust"
    )]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Log holding every record that decoded.
    #[must_use]
    pub const fn log(&self) -> &MutationLog {
        &self.log
    }

    /// Return the log only when every record decoded.
    ///
    /// # Errors
    ///
    /// Returns the single decoding error, or an aggregate when several
    /// records failed.
    pub fn into_result(self) -> VarResult<MutationLog> {
        let (log, mut errors) = self.into_parts();
        match errors.len() {
            0 => Ok(log),
            1 => Err(errors.remove(0)),
            _ => Err(Arc::new(VarError::aggregate(errors))),
        }
    }
}

pub(super) fn collect<'a, I>(mut log: MutationLog, records: I) -> RecordComposition
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut errors = Vec::new();
    for (position, record) in records.into_iter().enumerate() {
        match Changeset::from_record(record) {
            Ok(changeset) => {
                let (key, mutation) = changeset.into_parts();
                log.insert(Changeset::from_parts(key, mutation));
            }
            Err(err) => {
                tracing::debug!(position, error = %err, "skipping undecodable record");
                errors.push(err);
            }
        }
    }
    RecordComposition::new(log, errors)
}
