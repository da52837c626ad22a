//! Atomic mutation records.
//!
//! A [`Changeset`] captures one `set` or `unset` of a variable together with
//! the id its [`crate::MutationLog`] assigned. On the wire a changeset is a
//! positional array: `[id, key]` for an unset and `[id, key, value]` for a set.
//! The array length discriminates the two, so `[id, key, null]` is a set to
//! `null` and never an unset.
//!
//! Older writers stored wall-clock timestamps as ids and keys as arrays of
//! path segments (`[1588765455123, ["headers", "accept"], "json"]`). Those
//! records are still accepted by [`Changeset::from_record`] and normalised to
//! the flat dotted key; they are never produced.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{VarError, VarResult};

/// Separator used when flattening multi-segment key paths.
pub const KEY_PATH_SEPARATOR: char = '.';

/// Largest id a serialized record or counter may carry. Readers that parse
/// JSON numbers as doubles represent every integer up to this bound exactly.
pub const MAX_ID: u64 = (1 << 53) - 1;

/// Join key path segments into the flat key stored in a [`Changeset`].
///
/// # Examples
///
/// ```
/// use var_scope::join_key_path;
/// assert_eq!(join_key_path(["headers", "accept"]), "headers.accept");
/// ```
#[must_use]
pub fn join_key_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut key = String::new();
    for (i, segment) in segments.into_iter().enumerate() {
        if i > 0 {
            key.push(KEY_PATH_SEPARATOR);
        }
        key.push_str(segment.as_ref());
    }
    key
}

/// Kind of mutation recorded by a changeset.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
    /// Assign a value to a key.
    Set,
    /// Remove a key.
    Unset,
}

impl Instruction {
    /// Lower-case name of the instruction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Unset => "unset",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Instruction {
    type Err = VarError;

    /// Parse `"set"` or `"unset"`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("set") {
            Ok(Self::Set)
        } else if s.eq_ignore_ascii_case("unset") {
            Ok(Self::Unset)
        } else {
            Err(VarError::invalid_instruction(
                s,
                "expected 'set' or 'unset'",
            ))
        }
    }
}

/// The effect of a changeset. Only `Set` carries a value.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    /// Assign the contained value. `null`, `false` and `""` are all valid.
    Set(Value),
    /// Remove the key.
    Unset,
}

impl Mutation {
    /// Instruction corresponding to this mutation.
    #[must_use]
    pub const fn instruction(&self) -> Instruction {
        match self {
            Self::Set(_) => Instruction::Set,
            Self::Unset => Instruction::Unset,
        }
    }

    /// Value assigned by a `Set`, `None` for an `Unset`.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unset => None,
        }
    }
}

/// One recorded mutation with its log-scoped sequence id.
#[derive(Clone, Debug, PartialEq)]
pub struct Changeset {
    id: u64,
    key: String,
    mutation: Mutation,
}

impl Changeset {
    /// Build an unnumbered changeset (id `0`).
    ///
    /// A value passed alongside [`Instruction::Unset`] is dropped. A `Set`
    /// without a value records `null`.
    ///
    /// # Errors
    ///
    /// Returns [`VarError::InvalidInstruction`] when a `Set` is requested with
    /// an empty key.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use var_scope::{Changeset, Instruction};
    ///
    /// let unset = Changeset::make(Instruction::Unset, "foo", Some(json!("ignored")))?;
    /// assert!(unset.value().is_none());
    /// # Ok::<_, std::sync::Arc<var_scope::VarError>>(())
    /// ```
    pub fn make(
        instruction: Instruction,
        key: impl Into<String>,
        value: Option<Value>,
    ) -> VarResult<Self> {
        let key = key.into();
        let mutation = match instruction {
            Instruction::Set if key.is_empty() => {
                return Err(VarError::invalid_instruction(
                    instruction.as_str(),
                    "a set requires a key",
                )
                .into());
            }
            Instruction::Set => Mutation::Set(value.unwrap_or(Value::Null)),
            Instruction::Unset => Mutation::Unset,
        };
        Ok(Self {
            id: 0,
            key,
            mutation,
        })
    }

    /// Unnumbered changeset from a key already known to be non-empty.
    pub(crate) const fn from_parts(key: String, mutation: Mutation) -> Self {
        Self {
            id: 0,
            key,
            mutation,
        }
    }

    pub(crate) fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Sequence id assigned by the owning log. `0` means not yet tracked.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Flat key, with path segments joined by `.`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key split back into its path segments.
    #[must_use]
    pub fn key_path(&self) -> Vec<&str> {
        self.key.split(KEY_PATH_SEPARATOR).collect()
    }

    /// Instruction recorded by this changeset.
    #[must_use]
    pub const fn instruction(&self) -> Instruction {
        self.mutation.instruction()
    }

    /// Mutation recorded by this changeset.
    #[must_use]
    pub const fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    /// Value assigned by a `Set`, `None` for an `Unset`.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.mutation.value()
    }

    /// Decompose into key and mutation, discarding the id.
    #[must_use]
    pub fn into_parts(self) -> (String, Mutation) {
        (self.key, self.mutation)
    }

    /// Canonical positional record: `[id, key]` or `[id, key, value]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use var_scope::{Changeset, Instruction};
    ///
    /// let set = Changeset::make(Instruction::Set, "foo", Some(json!(null)))?;
    /// assert_eq!(set.to_record(), json!([0, "foo", null]));
    /// # Ok::<_, std::sync::Arc<var_scope::VarError>>(())
    /// ```
    #[must_use]
    pub fn to_record(&self) -> Value {
        let mut record = vec![Value::from(self.id), Value::String(self.key.clone())];
        if let Mutation::Set(value) = &self.mutation {
            record.push(value.clone());
        }
        Value::Array(record)
    }

    /// Decode a positional record, accepting the legacy timestamp and
    /// key-path encoding.
    ///
    /// # Errors
    ///
    /// Returns [`VarError::MalformedChangeset`] when the record is not an
    /// array of two or three elements, the id is not an integer in
    /// `0..=MAX_ID`, or the key is neither a string nor an array of path
    /// segments.
    pub fn from_record(record: &Value) -> VarResult<Self> {
        let Value::Array(items) = record else {
            return Err(VarError::malformed_changeset(format!(
                "expected an array record, found {}",
                kind_of(record)
            ))
            .into());
        };
        let (id, key, mutation) = match items.as_slice() {
            [id, key] => (id, key, Mutation::Unset),
            [id, key, value] => (id, key, Mutation::Set(value.clone())),
            _ => {
                return Err(VarError::malformed_changeset(format!(
                    "expected 2 or 3 elements, found {}",
                    items.len()
                ))
                .into());
            }
        };
        let id = id.as_u64().filter(|id| *id <= MAX_ID).ok_or_else(|| {
            VarError::malformed_changeset(format!(
                "id must be an integer between 0 and {MAX_ID}, found {id}"
            ))
        })?;
        let key = decode_key(key)?;
        Ok(Self { id, key, mutation })
    }
}

fn decode_key(key: &Value) -> VarResult<String> {
    let flat = match key {
        Value::String(key) => key.clone(),
        Value::Array(segments) => {
            let parts = segments
                .iter()
                .map(|segment| match segment {
                    Value::String(s) => Ok(s.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    other => Err(VarError::malformed_changeset(format!(
                        "key path segments must be strings or numbers, found {}",
                        kind_of(other)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            tracing::trace!(segments = parts.len(), "decoded legacy key path");
            join_key_path(parts)
        }
        other => {
            return Err(VarError::malformed_changeset(format!(
                "key must be a string or a key path, found {}",
                kind_of(other)
            ))
            .into());
        }
    };
    if flat.is_empty() {
        return Err(VarError::malformed_changeset("key must not be empty").into());
    }
    Ok(flat)
}

pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for Changeset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.value().is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.id)?;
        seq.serialize_element(&self.key)?;
        if let Some(value) = self.value() {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Changeset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Value::deserialize(deserializer)?;
        Self::from_record(&record).map_err(D::Error::custom)
    }
}
