//! A [`VariableStore`] that remembers every call made against it.

use std::collections::BTreeMap;

use serde_json::Value;
use var_scope::VariableStore;

/// One mutation observed by a [`RecordingStore`].
#[derive(Clone, Debug, PartialEq)]
pub enum StoreCall {
    /// `set(key, value)`.
    Set(String, Value),
    /// `unset(key)`.
    Unset(String),
}

/// Map-backed store that records each `set` and `unset` in call order.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use var_scope_test_helpers::store::{RecordingStore, StoreCall};
/// use var_scope::MutationLog;
///
/// let mut log = MutationLog::default();
/// log.set("a", json!(1));
/// let mut store = RecordingStore::default();
/// log.apply(&mut store);
/// assert_eq!(store.calls(), &[StoreCall::Set("a".into(), json!(1))]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingStore {
    values: BTreeMap<String, Value>,
    calls: Vec<StoreCall>,
}

impl RecordingStore {
    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> &[StoreCall] {
        &self.calls
    }

    /// Keys touched, in call order.
    #[must_use]
    pub fn touched_keys(&self) -> Vec<&str> {
        self.calls
            .iter()
            .map(|call| match call {
                StoreCall::Set(key, _) | StoreCall::Unset(key) => key.as_str(),
            })
            .collect()
    }

    /// Current values.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

impl VariableStore for RecordingStore {
    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.calls.push(StoreCall::Set(key.to_owned(), value.clone()));
        self.values.insert(key.to_owned(), value);
    }

    fn unset(&mut self, key: &str) {
        self.calls.push(StoreCall::Unset(key.to_owned()));
        self.values.remove(key);
    }
}
