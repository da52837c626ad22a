//! Addressable key/value spaces that logs replay onto.
//!
//! [`VariableStore`] is the minimal contract a [`crate::MutationLog`] needs to
//! replay. It is implemented for the plain map types and for
//! [`VariableScope`], the in-memory store that can record its own mutations.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::changeset::{Changeset, Mutation};
use crate::log::{LogMode, MutationLog};
use crate::substitution::{DynamicVariables, Substitutor};

/// Key/value space addressed by flat string keys.
pub trait VariableStore {
    /// Whether `key` is present, regardless of its value.
    fn has(&self, key: &str) -> bool;

    /// Value stored under `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Assign `value` to `key`.
    fn set(&mut self, key: &str, value: Value);

    /// Remove `key`. Removing an absent key is not an error.
    fn unset(&mut self, key: &str);
}

impl VariableStore for BTreeMap<String, Value> {
    fn has(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        Self::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.insert(key.to_owned(), value);
    }

    fn unset(&mut self, key: &str) {
        self.remove(key);
    }
}

impl<S: BuildHasher> VariableStore for HashMap<String, Value, S> {
    fn has(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        Self::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.insert(key.to_owned(), value);
    }

    fn unset(&mut self, key: &str) {
        self.remove(key);
    }
}

impl VariableStore for Map<String, Value> {
    fn has(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        Self::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.insert(key.to_owned(), value);
    }

    fn unset(&mut self, key: &str) {
        self.remove(key);
    }
}

/// In-memory variable store with optional mutation tracking.
///
/// While tracking is enabled every [`VariableStore::set`] and
/// [`VariableStore::unset`] is recorded in the scope's [`MutationLog`], so the
/// changes can be shipped elsewhere and replayed.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use var_scope::{LogMode, VariableScope, VariableStore};
///
/// let mut scope = VariableScope::new();
/// scope.enable_tracking(LogMode::Sequential);
/// scope.set("host", json!("example.com"));
/// scope.set("path", json!("/v1"));
///
/// let mut mirror = VariableScope::new();
/// if let Some(log) = scope.mutations() {
///     log.apply(&mut mirror);
/// }
/// assert_eq!(mirror.get("host"), Some(json!("example.com")));
/// assert_eq!(
///     scope.replace_in(&json!("https://{{host}}{{path}}")),
///     json!("https://example.com/v1")
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableScope {
    #[serde(default)]
    values: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mutations: Option<MutationLog>,
}

impl VariableScope {
    /// Create an empty, untracked scope.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            mutations: None,
        }
    }

    /// Create an untracked scope holding `values`.
    #[must_use]
    pub fn from_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            mutations: None,
        }
    }

    /// Start recording mutations.
    ///
    /// An existing log is kept; asking for [`LogMode::Compacted`] compacts it.
    pub fn enable_tracking(&mut self, mode: LogMode) {
        match self.mutations.as_mut() {
            Some(log) if mode == LogMode::Compacted => log.compact(),
            Some(_) => {}
            None => self.mutations = Some(MutationLog::new(mode)),
        }
    }

    /// Stop recording and hand back the log collected so far.
    pub fn disable_tracking(&mut self) -> Option<MutationLog> {
        self.mutations.take()
    }

    /// Whether mutations are currently recorded.
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.mutations.is_some()
    }

    /// Mutations recorded while tracking was enabled.
    #[must_use]
    pub const fn mutations(&self) -> Option<&MutationLog> {
        self.mutations.as_ref()
    }

    /// Apply a single changeset. The change is itself tracked when tracking
    /// is enabled.
    pub fn apply_mutation(&mut self, changeset: &Changeset) {
        match changeset.mutation() {
            Mutation::Set(value) => self.set(changeset.key(), value.clone()),
            Mutation::Unset => self.unset(changeset.key()),
        }
    }

    /// Remove every variable, recording one unset per key when tracking.
    pub fn clear(&mut self) {
        let keys: Vec<String> = self.values.keys().cloned().collect();
        for key in keys {
            self.unset(&key);
        }
    }

    /// Number of variables held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no variables are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over variable names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Plain object holding every variable.
    #[must_use]
    pub fn to_object(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Copy every variable onto `target`.
    pub fn sync_to<S>(&self, target: &mut S)
    where
        S: VariableStore + ?Sized,
    {
        for (key, value) in &self.values {
            target.set(key, value.clone());
        }
    }

    /// Resolve `{{token}}` placeholders in `template` against this scope,
    /// falling back to the default dynamic variables such as `$guid`.
    #[must_use]
    pub fn replace_in(&self, template: &Value) -> Value {
        let dynamic = DynamicVariables::defaults();
        Substitutor::new().with(self).with(&dynamic).resolve(template)
    }

    pub(crate) const fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

impl VariableStore for VariableScope {
    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        if let Some(log) = self.mutations.as_mut() {
            log.set(key, value.clone());
        }
        self.values.insert(key.to_owned(), value);
    }

    fn unset(&mut self, key: &str) {
        if let Some(log) = self.mutations.as_mut() {
            log.unset(key);
        }
        self.values.remove(key);
    }
}
