//! Shared fixtures for the behavioural scenarios.

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::Value;
use var_scope::{MutationLog, VarError};

/// State shared by the mutation log steps.
#[derive(Debug, Default, ScenarioState)]
pub struct LogContext {
    /// Log under test.
    pub log: Slot<MutationLog>,
    /// Error returned by the most recent failing step.
    pub error: Slot<Arc<VarError>>,
}

/// State shared by the substitution steps.
#[derive(Debug, Default, ScenarioState)]
pub struct TemplateContext {
    /// One single-key provider per `Given`, in priority order.
    pub providers: Slot<Vec<Value>>,
    /// Resolved text.
    pub result: Slot<String>,
    /// Replacements made while resolving.
    pub replacements: Slot<usize>,
}

/// Creates a clean mutation log context.
#[fixture]
pub fn log_context() -> LogContext {
    LogContext::default()
}

/// Creates a clean substitution context.
#[fixture]
pub fn template_context() -> TemplateContext {
    TemplateContext::default()
}
