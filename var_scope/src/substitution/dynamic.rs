//! Generator-backed providers.
//!
//! [`DynamicVariables`] maps names to zero-argument generators that run on
//! every lookup. Nothing is memoised, so two occurrences of `{{$guid}}` in one
//! string resolve to two different ids. Stateful generators (a counter, say)
//! own their state; the table only calls them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde_json::Value;
use uuid::Uuid;

use super::Provider;

/// Upper bound (inclusive) of `$randomInt`.
pub const RANDOM_INT_MAX: u32 = 1000;

/// Zero-argument value generator.
pub type Generator = Box<dyn Fn() -> Value + Send + Sync>;

/// Table of named generators.
#[derive(Default)]
pub struct DynamicVariables {
    generators: BTreeMap<String, Generator>,
}

impl DynamicVariables {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generators: BTreeMap::new(),
        }
    }

    /// Table holding the built-in generators:
    ///
    /// | name            | value                              |
    /// |-----------------|------------------------------------|
    /// | `$guid`         | random v4 UUID                     |
    /// | `$randomUUID`   | random v4 UUID                     |
    /// | `$timestamp`    | current Unix time in seconds       |
    /// | `$isoTimestamp` | current UTC time, RFC 3339, millis |
    /// | `$randomInt`    | uniform integer in `0..=1000`      |
    #[must_use]
    pub fn defaults() -> Self {
        Self::new()
            .with("$guid", uuid_v4)
            .with("$randomUUID", uuid_v4)
            .with("$timestamp", || Value::from(Utc::now().timestamp()))
            .with("$isoTimestamp", || {
                Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
            })
            .with("$randomInt", || {
                Value::from(rand::thread_rng().gen_range(0..=RANDOM_INT_MAX))
            })
    }

    /// Register `generator` under `name`, replacing any previous one.
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, generator: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.insert(name, generator);
        self
    }

    /// Register `generator` under `name`, replacing any previous one.
    pub fn insert<F>(&mut self, name: impl Into<String>, generator: F)
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.generators.insert(name.into(), Box::new(generator));
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }
}

fn uuid_v4() -> Value {
    Value::from(Uuid::new_v4().to_string())
}

impl fmt::Debug for DynamicVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.generators.keys()).finish()
    }
}

impl Provider for DynamicVariables {
    fn has(&self, key: &str) -> bool {
        self.generators.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.generators.get(key).map(|generator| generator())
    }
}
