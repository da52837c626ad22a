//! Extensions for surfacing `VarResult` errors inside `figment` code.
//!
//! Code running in a `figment::Jail` must return `figment::Error`; these
//! helpers map the crate's `Arc<VarError>` into it so `?` keeps working.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use var_scope::{MutationLog, ResultIntoFigment};
//!
//! figment::Jail::expect_with(|_| {
//!     let log = MutationLog::from_json(&json!({"sequence": [[1, "a", 1]]})).to_figment()?;
//!     assert_eq!(log.count(), 1);
//!     Ok(())
//! });
//! ```

use crate::VarError;
use std::sync::Arc;

/// Convert shared errors into `figment::Error` for code running inside a
/// `figment::Jail`.
pub trait IntoFigmentError {
    /// Convert into a `figment::Error`, preserving the message text.
    fn into_figment(self) -> figment::Error;
}

impl IntoFigmentError for Arc<VarError> {
    fn into_figment(self) -> figment::Error {
        figment::Error::from(self.to_string())
    }
}

/// Extension to convert `Result<T, Arc<VarError>>` into `Result<T, figment::Error>`.
#[expect(
    clippy::result_large_err,
    reason = "figment::Error is large; this helper is test-facing only"
)]
pub trait ResultIntoFigment<T> {
    /// Map the `Arc<VarError>` error into a `figment::Error` using
    /// [`IntoFigmentError`].
    ///
    /// # Errors
    ///
    /// Returns a `figment::Error` containing the original message.
    fn to_figment(self) -> Result<T, figment::Error>;
}

impl<T> ResultIntoFigment<T> for Result<T, Arc<VarError>> {
    fn to_figment(self) -> Result<T, figment::Error> {
        self.map_err(IntoFigmentError::into_figment)
    }
}
