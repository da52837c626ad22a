//! Mutation log recording changes to a variable space.
//!
//! A [`MutationLog`] hands out strictly increasing ids and stores
//! [`Changeset`]s either as an ordered sequence or, once compacted, as an
//! index holding only the latest changeset per key. Logs replay onto any
//! [`VariableStore`], merge via [`MutationLog::import`], and round-trip
//! through the serialized form produced by [`MutationLog::to_json`].
//!
//! A log is single-writer: every mutating call reads then writes the id
//! counter without synchronisation.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use serde_json::{Value, json};
//! use var_scope::{LogMode, MutationLog};
//!
//! let mut log = MutationLog::new(LogMode::Sequential);
//! log.set("foo", json!("bar"));
//! log.unset("foo");
//! assert_eq!(log.count(), 2);
//!
//! let mut store: BTreeMap<String, Value> = BTreeMap::new();
//! log.apply(&mut store);
//! assert!(store.is_empty());
//! ```

mod records;
mod serialized;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::changeset::{Changeset, Instruction, Mutation};
use crate::store::VariableStore;
use crate::VarResult;

pub use records::RecordComposition;

/// Storage strategy of a [`MutationLog`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Every changeset in insertion order; keys may repeat.
    #[default]
    Sequential,
    /// Latest changeset per key only.
    Compacted,
}

impl LogMode {
    /// Lower-case name used in the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Compacted => "compacted",
        }
    }
}

/// Ordered or compacted collection of [`Changeset`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MutationLog {
    mode: LogMode,
    counter: u64,
    sequence: Vec<Changeset>,
    index: BTreeMap<String, Changeset>,
}

impl MutationLog {
    /// Create an empty log in `mode`.
    #[must_use]
    pub const fn new(mode: LogMode) -> Self {
        Self {
            mode,
            counter: 0,
            sequence: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Create an empty compacted log, where new changesets overwrite earlier
    /// ones for the same key.
    #[must_use]
    pub const fn compacted() -> Self {
        Self::new(LogMode::Compacted)
    }

    /// Current storage mode.
    #[must_use]
    pub const fn mode(&self) -> LogMode {
        self.mode
    }

    /// Last id handed out. `0` when nothing has been tracked yet.
    #[must_use]
    pub const fn counter(&self) -> u64 {
        self.counter
    }

    /// Record a mutation.
    ///
    /// Returns the id assigned to the new changeset, or `None` when `key` is
    /// empty (junk input is ignored rather than rejected).
    ///
    /// # Errors
    ///
    /// Returns [`crate::VarError::InvalidInstruction`] when the changeset
    /// cannot be built. The log is left untouched.
    pub fn track(
        &mut self,
        instruction: Instruction,
        key: &str,
        value: Option<Value>,
    ) -> VarResult<Option<u64>> {
        if key.is_empty() {
            tracing::trace!(%instruction, "ignoring mutation without a key");
            return Ok(None);
        }
        let changeset = Changeset::make(instruction, key, value)?;
        Ok(Some(self.insert(changeset)))
    }

    /// Record a mutation named by a string such as `"set"` or `"unset"`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::VarError::InvalidInstruction`] for unrecognised
    /// instruction names. The log is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use var_scope::{MutationLog, VarError};
    ///
    /// let mut log = MutationLog::default();
    /// assert_eq!(log.track_named("set", "foo", Some(json!(1)))?, Some(1));
    /// let err = log.track_named("push", "foo", None).unwrap_err();
    /// assert!(matches!(&*err, VarError::InvalidInstruction { .. }));
    /// assert_eq!(log.count(), 1);
    /// # Ok::<_, std::sync::Arc<VarError>>(())
    /// ```
    pub fn track_named(
        &mut self,
        instruction: &str,
        key: &str,
        value: Option<Value>,
    ) -> VarResult<Option<u64>> {
        let parsed: Instruction = instruction.parse()?;
        self.track(parsed, key, value)
    }

    /// Record a `set`. Returns `None` when `key` is empty.
    pub fn set(&mut self, key: &str, value: Value) -> Option<u64> {
        self.record(key, Mutation::Set(value))
    }

    /// Record an `unset`. Returns `None` when `key` is empty.
    pub fn unset(&mut self, key: &str) -> Option<u64> {
        self.record(key, Mutation::Unset)
    }

    fn record(&mut self, key: &str, mutation: Mutation) -> Option<u64> {
        if key.is_empty() {
            return None;
        }
        Some(self.insert(Changeset::from_parts(key.to_owned(), mutation)))
    }

    fn insert(&mut self, changeset: Changeset) -> u64 {
        self.counter += 1;
        let id = self.counter;
        let changeset = changeset.with_id(id);
        tracing::trace!(
            id,
            key = changeset.key(),
            instruction = %changeset.instruction(),
            "tracked mutation"
        );
        self.store(changeset);
        id
    }

    /// Place an already-numbered changeset according to the current mode.
    fn store(&mut self, changeset: Changeset) {
        match self.mode {
            LogMode::Sequential => self.sequence.push(changeset),
            LogMode::Compacted => {
                self.index.insert(changeset.key().to_owned(), changeset);
            }
        }
    }

    /// All changesets. Insertion order when sequential; key order when
    /// compacted.
    #[must_use]
    pub fn all(&self) -> Vec<&Changeset> {
        match self.mode {
            LogMode::Sequential => self.sequence.iter().collect(),
            LogMode::Compacted => self.index.values().collect(),
        }
    }

    /// Number of entries returned by [`MutationLog::all`].
    #[must_use]
    pub fn count(&self) -> usize {
        match self.mode {
            LogMode::Sequential => self.sequence.len(),
            LogMode::Compacted => self.index.len(),
        }
    }

    /// Returns `true` when the log holds no changesets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Latest changeset recorded for `key`, if any.
    #[must_use]
    pub fn latest(&self, key: &str) -> Option<&Changeset> {
        match self.mode {
            LogMode::Sequential => self
                .sequence
                .iter()
                .filter(|changeset| changeset.key() == key)
                .max_by_key(|changeset| changeset.id()),
            LogMode::Compacted => self.index.get(key),
        }
    }

    /// Changesets sorted by id, the order replay and import use.
    fn replay_order(&self) -> Vec<&Changeset> {
        let mut ordered = self.all();
        ordered.sort_by_key(|changeset| changeset.id());
        ordered
    }

    /// Fold the sequence into a per-key index keeping the highest id, and
    /// switch to [`LogMode::Compacted`]. Idempotent; there is no way back to
    /// the sequential history.
    pub fn compact(&mut self) {
        if self.mode == LogMode::Compacted {
            return;
        }
        let before = self.sequence.len();
        for changeset in std::mem::take(&mut self.sequence) {
            let newer_exists = self
                .index
                .get(changeset.key())
                .is_some_and(|existing| existing.id() > changeset.id());
            if !newer_exists {
                self.index.insert(changeset.key().to_owned(), changeset);
            }
        }
        self.mode = LogMode::Compacted;
        tracing::debug!(before, after = self.index.len(), "compacted mutation log");
    }

    /// Forget every changeset but keep the id counter, so later ids continue
    /// from where they left off.
    pub fn reset(&mut self) {
        tracing::debug!(
            dropped = self.count(),
            counter = self.counter,
            "reset mutation log"
        );
        self.sequence.clear();
        self.index.clear();
    }

    /// Replay every changeset onto `store` in increasing id order.
    pub fn apply<S>(&self, store: &mut S)
    where
        S: VariableStore + ?Sized,
    {
        let ordered = self.replay_order();
        tracing::debug!(changesets = ordered.len(), "applying mutation log");
        for changeset in ordered {
            match changeset.mutation() {
                Mutation::Set(value) => store.set(changeset.key(), value.clone()),
                Mutation::Unset => store.unset(changeset.key()),
            }
        }
    }

    /// Append every changeset of `other`, in its id order, under fresh local
    /// ids. Importing the same log twice duplicates its effects.
    ///
    /// Returns the number of changesets imported.
    pub fn import(&mut self, other: &Self) -> usize {
        let ordered = other.replay_order();
        let imported = ordered.len();
        for changeset in ordered {
            let (key, mutation) = changeset.clone().into_parts();
            self.insert(Changeset::from_parts(key, mutation));
        }
        tracing::debug!(imported, counter = self.counter, "imported mutation log");
        imported
    }

    /// Decode `records` leniently into a fresh log.
    ///
    /// Every decodable record is tracked under a new id; failures are kept
    /// alongside so the caller can decide whether to skip or abort.
    #[must_use]
    pub fn collect_records<'a, I>(mode: LogMode, records: I) -> RecordComposition
    where
        I: IntoIterator<Item = &'a Value>,
    {
        records::collect(Self::new(mode), records)
    }

    /// Encode the log in its canonical serialized form.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use var_scope::MutationLog;
    ///
    /// let mut log = MutationLog::default();
    /// log.set("foo", json!("bar"));
    /// log.unset("foo");
    /// assert_eq!(
    ///     log.to_json(),
    ///     json!({"mode": "sequential", "sequence": [[1, "foo", "bar"], [2, "foo"]], "counter": 2})
    /// );
    /// ```
    #[must_use]
    pub fn to_json(&self) -> Value {
        serialized::encode(self)
    }

    /// Decode a serialized log, canonical or legacy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::VarError::MalformedLog`] when the document has the
    /// wrong shape or its counter exceeds [`crate::MAX_ID`], or
    /// [`crate::VarError::MalformedChangeset`] for the first record that
    /// cannot be decoded.
    pub fn from_json(value: &Value) -> VarResult<Self> {
        serialized::decode(value)
    }

    /// Rebuild a log from numbered changesets, keeping their ids.
    pub(crate) fn restore(mode: LogMode, counter: u64, changesets: Vec<Changeset>) -> Self {
        let mut log = Self::new(LogMode::Sequential);
        let highest = changesets.iter().map(Changeset::id).max().unwrap_or(0);
        log.counter = counter.max(highest);
        log.sequence = changesets;
        if mode == LogMode::Compacted {
            log.compact();
        }
        log
    }
}

impl Serialize for MutationLog {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MutationLog {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error as _;
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(D::Error::custom)
    }
}
