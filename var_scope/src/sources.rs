//! Figment interop for variable scopes.
//!
//! Scopes can be seeded from any figment provider stack (environment
//! variables, TOML files, serialized defaults) and can themselves be merged
//! into a figment configuration as a provider.

use std::collections::BTreeMap;

use figment::providers::Serialized;
use figment::value::{Dict, Map};
use figment::{Figment, Metadata, Profile};
use serde_json::Value;

use crate::store::VariableScope;
use crate::{VarError, VarResult};

impl VariableScope {
    /// Build an untracked scope from the top-level keys `figment` extracts.
    ///
    /// # Errors
    ///
    /// Returns [`VarError::Gathering`] when the figment cannot be extracted
    /// into a key/value map.
    ///
    /// # Examples
    ///
    /// ```
    /// use figment::{Figment, providers::Serialized};
    /// use serde_json::json;
    /// use var_scope::{VariableScope, VariableStore};
    ///
    /// let figment = Figment::from(Serialized::defaults(json!({"host": "localhost"})));
    /// let scope = VariableScope::from_figment(&figment)?;
    /// assert_eq!(scope.get("host"), Some(json!("localhost")));
    /// # Ok::<_, std::sync::Arc<var_scope::VarError>>(())
    /// ```
    pub fn from_figment(figment: &Figment) -> VarResult<Self> {
        let values: BTreeMap<String, Value> =
            figment.extract().map_err(VarError::gathering_arc)?;
        tracing::debug!(variables = values.len(), "loaded variable scope from figment");
        Ok(Self::from_values(values))
    }
}

impl figment::Provider for VariableScope {
    fn metadata(&self) -> Metadata {
        Metadata::named("variable scope")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self.values()).data()
    }
}
