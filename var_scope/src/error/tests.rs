//! Unit tests for error construction and aggregation behaviour.

use rstest::rstest;
use std::sync::Arc;

use super::VarError;

fn sample(reason: &str) -> VarError {
    VarError::malformed_changeset(reason)
}

#[rstest]
fn try_aggregate_returns_none_for_empty_input() {
    assert!(VarError::try_aggregate(Vec::<VarError>::new()).is_none());
}

#[rstest]
fn single_owned_error_is_unwrapped() {
    let err = VarError::aggregate(vec![sample("short")]);
    assert!(matches!(err, VarError::MalformedChangeset { .. }));
}

#[rstest]
fn single_shared_error_stays_aggregated() {
    let shared = Arc::new(sample("short"));
    let _keep = Arc::clone(&shared);
    let err = VarError::aggregate(vec![shared]);
    let VarError::Aggregate(agg) = err else {
        panic!("expected aggregate, got {err:?}");
    };
    assert_eq!(agg.len(), 1);
}

#[rstest]
fn multiple_errors_are_numbered_in_display() {
    let err = VarError::aggregate(vec![sample("first"), sample("second")]);
    let rendered = err.to_string();
    assert!(rendered.contains("1: malformed changeset: first"), "{rendered}");
    assert!(rendered.contains("2: malformed changeset: second"), "{rendered}");
}

#[rstest]
#[case(VarError::invalid_instruction("push", "unknown"), "invalid instruction 'push': unknown")]
#[case(VarError::malformed_log("not an object"), "malformed mutation log: not an object")]
fn display_messages_name_the_problem(#[case] err: VarError, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[rstest]
fn gathering_errors_convert_back_into_figment() {
    let err = VarError::from(figment::Error::from("missing"));
    let figment_err: figment::Error = err.into();
    assert!(figment_err.to_string().contains("missing"));
}
