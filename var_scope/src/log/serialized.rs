//! Wire form of a [`MutationLog`].
//!
//! ```text
//! { "mode": "sequential" | "compacted",
//!   "sequence": [ [id, key, value?], ... ],      // sequential
//!   "index":    { key: [id, key, value?], ... },  // compacted
//!   "counter":  n }                               // optional
//! ```
//!
//! Legacy documents may instead carry `stream` and `compacted` collections
//! and an `autoCompact` flag in place of `mode`. Both collections are read
//! when present; only the canonical shape is written. A document naming a
//! collection under both its canonical and its legacy name is rejected.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{LogMode, MutationLog};
use crate::changeset::{Changeset, MAX_ID, kind_of};
use crate::{VarError, VarResult};

/// Canonical field names paired with the legacy names aliasing them.
const ALIASED_FIELDS: [(&str, &str); 2] = [("sequence", "stream"), ("index", "compacted")];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerializedLog {
    #[serde(default)]
    mode: Option<LogMode>,
    #[serde(default, alias = "stream")]
    sequence: Option<Vec<Value>>,
    #[serde(default, alias = "compacted")]
    index: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    auto_compact: Option<bool>,
    #[serde(default)]
    counter: Option<u64>,
}

pub(super) fn encode(log: &MutationLog) -> Value {
    let mut doc = Map::new();
    doc.insert("mode".to_owned(), Value::from(log.mode.as_str()));
    match log.mode {
        LogMode::Sequential => {
            let sequence = log.sequence.iter().map(Changeset::to_record).collect();
            doc.insert("sequence".to_owned(), Value::Array(sequence));
        }
        LogMode::Compacted => {
            let index = log
                .index
                .iter()
                .map(|(key, changeset)| (key.clone(), changeset.to_record()))
                .collect();
            doc.insert("index".to_owned(), Value::Object(index));
        }
    }
    doc.insert("counter".to_owned(), Value::from(log.counter));
    Value::Object(doc)
}

pub(super) fn decode(value: &Value) -> VarResult<MutationLog> {
    let Value::Object(fields) = value else {
        return Err(VarError::malformed_log(format!(
            "expected an object, found {}",
            kind_of(value)
        ))
        .into());
    };
    for (canonical, legacy) in ALIASED_FIELDS {
        if fields.contains_key(canonical) && fields.contains_key(legacy) {
            return Err(VarError::malformed_log(format!(
                "`{canonical}` and its legacy name `{legacy}` are both present"
            ))
            .into());
        }
    }
    let doc: SerializedLog = serde_json::from_value(value.clone())
        .map_err(|err| VarError::malformed_log(err.to_string()))?;
    let counter = doc.counter.unwrap_or(0);
    if counter > MAX_ID {
        return Err(VarError::malformed_log(format!(
            "counter must not exceed {MAX_ID}, found {counter}"
        ))
        .into());
    }

    let mode = doc
        .mode
        .or_else(|| {
            doc.auto_compact.map(|auto| {
                if auto {
                    LogMode::Compacted
                } else {
                    LogMode::Sequential
                }
            })
        })
        .unwrap_or_default();

    let mut changesets = Vec::new();
    for record in doc.sequence.iter().flatten() {
        changesets.push(Changeset::from_record(record)?);
    }
    let mut indexed = Vec::new();
    for (key, record) in doc.index.iter().flatten() {
        let changeset = Changeset::from_record(record)?;
        if changeset.key() != key {
            tracing::warn!(
                index_key = %key,
                record_key = changeset.key(),
                "index entry key differs from its record; using the record key"
            );
        }
        indexed.push(changeset);
    }
    indexed.sort_by_key(Changeset::id);
    changesets.extend(indexed);

    tracing::debug!(?mode, changesets = changesets.len(), "decoded mutation log");
    Ok(MutationLog::restore(mode, counter, changesets))
}
