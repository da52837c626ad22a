//! Step definitions for the mutation log and substitution features.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow, ensure};
use rstest_bdd_macros::{given, then, when};
use serde_json::{Map, Value};
use test_helpers::text::{json_arg, normalize_scalar};
use var_scope::{Instruction, LogMode, MutationLog, Provider, Substitutor, VarError};

use crate::fixtures::{LogContext, TemplateContext};

fn current_log(log_context: &LogContext) -> Result<MutationLog> {
    log_context
        .log
        .get()
        .ok_or_else(|| anyhow!("a mutation log must be created first"))
}

#[given("an empty sequential mutation log")]
fn empty_sequential(log_context: &LogContext) {
    log_context.log.set(MutationLog::new(LogMode::Sequential));
}

#[given("an empty compacted mutation log")]
fn empty_compacted(log_context: &LogContext) {
    log_context.log.set(MutationLog::compacted());
}

#[when("the log records set {key} to {value}")]
fn record_set(log_context: &LogContext, key: String, value: String) -> Result<()> {
    let mut log = current_log(log_context)?;
    log.track(Instruction::Set, &normalize_scalar(&key), Some(json_arg(&value)))
        .map_err(|err| anyhow!(err))?;
    log_context.log.set(log);
    Ok(())
}

#[when("the log records unset {key}")]
fn record_unset(log_context: &LogContext, key: String) -> Result<()> {
    let mut log = current_log(log_context)?;
    log.track(Instruction::Unset, &normalize_scalar(&key), None)
        .map_err(|err| anyhow!(err))?;
    log_context.log.set(log);
    Ok(())
}

#[when("the log records instruction {instruction} for {key}")]
fn record_named(log_context: &LogContext, instruction: String, key: String) -> Result<()> {
    let mut log = current_log(log_context)?;
    let instruction = normalize_scalar(&instruction);
    if let Err(err) = log.track_named(&instruction, &normalize_scalar(&key), None) {
        log_context.error.set(err);
    }
    log_context.log.set(log);
    Ok(())
}

#[when("the log is compacted")]
fn compact(log_context: &LogContext) -> Result<()> {
    let mut log = current_log(log_context)?;
    log.compact();
    log_context.log.set(log);
    Ok(())
}

#[when("the log is reset")]
fn reset(log_context: &LogContext) -> Result<()> {
    let mut log = current_log(log_context)?;
    log.reset();
    log_context.log.set(log);
    Ok(())
}

#[then("the log holds {count} changesets")]
fn holds(log_context: &LogContext, count: usize) -> Result<()> {
    let log = current_log(log_context)?;
    ensure!(
        log.count() == count,
        "expected {count} changesets, found {}",
        log.count()
    );
    Ok(())
}

#[then("replaying the log leaves {key} absent")]
fn replay_absent(log_context: &LogContext, key: String) -> Result<()> {
    let log = current_log(log_context)?;
    let mut store: BTreeMap<String, Value> = BTreeMap::new();
    log.apply(&mut store);
    let key = normalize_scalar(&key);
    ensure!(!store.contains_key(&key), "{key} should be absent after replay");
    Ok(())
}

#[then("the entry for {key} has id {id} and value {value}")]
fn entry_matches(log_context: &LogContext, key: String, id: u64, value: String) -> Result<()> {
    let log = current_log(log_context)?;
    let key = normalize_scalar(&key);
    let entry = log
        .latest(&key)
        .ok_or_else(|| anyhow!("no entry recorded for {key}"))?;
    let expected = json_arg(&value);
    ensure!(entry.id() == id, "expected id {id}, found {}", entry.id());
    ensure!(
        entry.value() == Some(&expected),
        "expected value {expected}, found {:?}",
        entry.value()
    );
    Ok(())
}

#[then("the last error is an invalid instruction")]
fn last_error_invalid(log_context: &LogContext) -> Result<()> {
    let err = log_context
        .error
        .take()
        .ok_or_else(|| anyhow!("expected a failing step to record an error"))?;
    ensure!(
        matches!(&*err, VarError::InvalidInstruction { .. }),
        "unexpected error: {err}"
    );
    Ok(())
}

#[given("a provider with {key} set to {value}")]
fn add_provider(template_context: &TemplateContext, key: String, value: String) {
    let mut providers = template_context.providers.get().unwrap_or_default();
    let mut map = Map::new();
    map.insert(normalize_scalar(&key), json_arg(&value));
    providers.push(Value::Object(map));
    template_context.providers.set(providers);
}

#[when("{template} is resolved")]
fn resolve_template(template_context: &TemplateContext, template: String) {
    let providers = template_context.providers.get().unwrap_or_default();
    let mut substitutor = Substitutor::new();
    for provider in &providers {
        substitutor.push(provider as &dyn Provider);
    }
    let outcome = substitutor.resolve_text(&normalize_scalar(&template));
    template_context.replacements.set(outcome.replacements());
    template_context.result.set(outcome.into_text());
}

#[then("the result is {expected}")]
fn result_is(template_context: &TemplateContext, expected: String) -> Result<()> {
    let result = template_context
        .result
        .get()
        .ok_or_else(|| anyhow!("a template must be resolved first"))?;
    let expected = normalize_scalar(&expected);
    ensure!(result == expected, "expected {expected:?}, found {result:?}");
    Ok(())
}

#[then("{count} replacements were made")]
fn replacements_made(template_context: &TemplateContext, count: usize) -> Result<()> {
    let made = template_context
        .replacements
        .get()
        .ok_or_else(|| anyhow!("a template must be resolved first"))?;
    ensure!(made == count, "expected {count} replacements, found {made}");
    Ok(())
}
