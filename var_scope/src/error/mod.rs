//! Error types produced by the mutation log and variable scope.

mod aggregate;
mod constructors;
mod conversions;
mod types;

pub use aggregate::AggregatedErrors;
pub use types::VarError;

#[cfg(test)]
mod tests;
