//! Lookup sources consulted by the [`super::Substitutor`].

use serde_json::Value;

use crate::store::VariableStore;

/// Source the substitutor can query for a token's value.
///
/// Presence, not truthiness, decides a lookup: a provider that [`has`] a key
/// wins even when its value is `null`, `false` or empty.
///
/// [`has`]: Provider::has
pub trait Provider {
    /// Whether the provider knows `key`.
    fn has(&self, key: &str) -> bool;

    /// Value for `key`. Generator-backed providers produce a fresh value on
    /// every call.
    fn get(&self, key: &str) -> Option<Value>;
}

impl<T: VariableStore + ?Sized> Provider for T {
    fn has(&self, key: &str) -> bool {
        VariableStore::has(self, key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        VariableStore::get(self, key)
    }
}

/// A JSON object acts as a plain key/value provider; other values provide
/// nothing.
impl Provider for Value {
    fn has(&self, key: &str) -> bool {
        self.as_object().is_some_and(|map| map.contains_key(key))
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.as_object().and_then(|map| map.get(key)).cloned()
    }
}
