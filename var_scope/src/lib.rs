//! Request variable scopes with a mergeable mutation log and bounded
//! template substitution.
//!
//! The crate has two halves:
//!
//! * [`MutationLog`] records `set`/`unset` [`Changeset`]s against a variable
//!   space, compacts them to one entry per key, replays them onto any
//!   [`VariableStore`], merges other logs, and round-trips through a compact
//!   JSON form.
//! * [`Substitutor`] resolves `{{token}}` placeholders inside arbitrary JSON
//!   data against an ordered list of [`Provider`]s, including generator-backed
//!   [`DynamicVariables`], stopping after [`MAX_REPLACEMENTS`] substitutions.
//!
//! [`VariableScope`] ties both together as an in-memory store that can track
//! its own mutations and interoperate with `figment`.

mod changeset;
mod error;
mod log;
mod result_ext;
mod sources;
mod store;
mod substitution;

use std::sync::Arc;

pub use changeset::{
    Changeset, Instruction, KEY_PATH_SEPARATOR, MAX_ID, Mutation, join_key_path,
};
pub use error::{AggregatedErrors, VarError};
pub use log::{LogMode, MutationLog, RecordComposition};
pub use result_ext::{IntoFigmentError, ResultIntoFigment};
pub use store::{VariableScope, VariableStore};
pub use substitution::{
    DynamicVariables, Generator, MAX_REPLACEMENTS, Provider, RANDOM_INT_MAX, Resolution,
    Substitutor, resolve,
};

/// Result type used throughout the crate. Errors are shared so they can be
/// collected into aggregates without cloning.
pub type VarResult<T> = Result<T, Arc<VarError>>;
