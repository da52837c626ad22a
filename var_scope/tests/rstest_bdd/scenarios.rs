//! Binds the feature files to the step registry.

use crate::fixtures::{LogContext, TemplateContext, log_context, template_context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/mutation_log.feature",
    fixtures = [log_context: LogContext]
);
scenarios!(
    "tests/features/substitution.feature",
    fixtures = [template_context: TemplateContext]
);
