//! Trait-based conversions between external error types and `VarError`.

use figment::Error as FigmentError;

use super::VarError;

impl From<FigmentError> for VarError {
    fn from(e: FigmentError) -> Self {
        Self::Gathering(e.into())
    }
}

impl From<VarError> for FigmentError {
    /// Allow using `?` in tests that run inside a `figment::Jail`.
    fn from(e: VarError) -> Self {
        match e {
            VarError::Gathering(fe) => *fe,
            other => Self::from(other.to_string()),
        }
    }
}
