//! Constructors and aggregation helpers for `VarError`.

use std::sync::Arc;

use super::{AggregatedErrors, VarError};

impl VarError {
    /// Tries to build a [`VarError`] from an iterator of errors.
    ///
    /// The iterator is consumed eagerly. It returns:
    /// * `None` when no errors are supplied;
    /// * the inner error when a single [`Arc`] is uniquely owned;
    /// * [`Self::Aggregate`] containing that single [`Arc`] when the error is already shared; and
    /// * [`Self::Aggregate`] combining every error for two or more inputs.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.is_empty() {
            return None;
        }
        Some(if arcs.len() == 1 {
            let last = arcs.pop()?;
            match Arc::try_unwrap(last) {
                Ok(err) => err,
                Err(shared) => Self::Aggregate(Box::new(AggregatedErrors::new(vec![shared]))),
            }
        } else {
            Self::Aggregate(Box::new(AggregatedErrors::new(arcs)))
        })
    }

    /// Build a [`VarError`] from at least one error.
    ///
    /// # Panics
    ///
    /// Panics if `errors` is empty. Use [`VarError::try_aggregate`] when the
    /// list may be empty.
    #[must_use]
    #[track_caller]
    pub fn aggregate<I, E>(errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        Self::try_aggregate(errors).map_or_else(
            || panic!("aggregate requires at least one error"),
            |err| err,
        )
    }

    /// Construct an [`VarError::InvalidInstruction`].
    ///
    /// # Examples
    ///
    /// ```
    /// use var_scope::VarError;
    /// let e = VarError::invalid_instruction("push", "expected 'set' or 'unset'");
    /// assert!(matches!(e, VarError::InvalidInstruction { .. }));
    /// ```
    #[must_use]
    pub fn invalid_instruction(instruction: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInstruction {
            instruction: instruction.into(),
            reason: reason.into(),
        }
    }

    /// Construct a [`VarError::MalformedChangeset`].
    #[must_use]
    pub fn malformed_changeset(reason: impl Into<String>) -> Self {
        Self::MalformedChangeset {
            reason: reason.into(),
        }
    }

    /// Construct a [`VarError::MalformedLog`].
    #[must_use]
    pub fn malformed_log(reason: impl Into<String>) -> Self {
        Self::MalformedLog {
            reason: reason.into(),
        }
    }

    /// Construct a gathering error wrapped in an [`Arc`].
    ///
    /// # Examples
    ///
    /// ```
    /// use var_scope::VarError;
    /// let e = VarError::gathering_arc(figment::Error::from("boom"));
    /// assert!(matches!(&*e, VarError::Gathering(_)));
    /// ```
    #[must_use]
    pub fn gathering_arc(source: figment::Error) -> Arc<Self> {
        Arc::new(Self::Gathering(Box::new(source)))
    }
}
