//! Aggregation container and iteration support for multiple `VarError` values.

use std::{error::Error, fmt, sync::Arc};

use super::VarError;

/// Collection of [`VarError`]s produced while decoding a batch of records.
///
/// # Examples
///
/// ```
/// use var_scope::VarError;
/// let e = VarError::aggregate(vec![
///     VarError::malformed_changeset("expected at least 2 elements, found 1"),
///     VarError::malformed_changeset("id must be a non-negative integer"),
/// ]);
/// if let VarError::Aggregate(agg) = e {
///     assert_eq!(agg.len(), 2);
/// }
/// ```
#[derive(Debug, Default)]
pub struct AggregatedErrors(Vec<Arc<VarError>>);

impl AggregatedErrors {
    /// Create a new aggregation from a vector of errors.
    #[must_use]
    pub const fn new(errors: Vec<Arc<VarError>>) -> Self {
        Self(errors)
    }

    /// Iterate over the contained errors.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> impl Iterator<Item = &VarError> {
        self.0.iter().map(Arc::as_ref)
    }

    /// Number of errors in the aggregation.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the aggregation holds no errors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {e}", i + 1)?;
        }
        Ok(())
    }
}

impl Error for AggregatedErrors {}

impl<'a> IntoIterator for &'a AggregatedErrors {
    type Item = &'a VarError;
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, Arc<VarError>>,
        fn(&'a Arc<VarError>) -> &'a VarError,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().map(Arc::as_ref)
    }
}

impl IntoIterator for AggregatedErrors {
    type Item = Arc<VarError>;
    type IntoIter = std::vec::IntoIter<Arc<VarError>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
