//! Resolution of `{{token}}` placeholders.
//!
//! The [`Substitutor`] walks arbitrary JSON data and rewrites every string it
//! finds, replacing `{{name}}` with the value the first matching
//! [`Provider`] has for `name`. Values may themselves contain tokens, so the
//! string is rescanned until a pass replaces nothing or [`MAX_REPLACEMENTS`]
//! substitutions have been made in total. Token bodies never contain braces,
//! which makes nested forms such as `{{beta-{{gamma}}}}` resolve from the
//! inside out across successive passes.
//!
//! Resolution is best effort. A cycle such as `a -> b -> a` is not detected;
//! it runs until the budget is spent and the remaining `{{...}}` text is
//! returned as-is.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use var_scope::Substitutor;
//!
//! let vars = json!({"name": "World"});
//! let out = Substitutor::new().with(&vars).resolve(&json!({"greeting": "Hello {{name}}"}));
//! assert_eq!(out, json!({"greeting": "Hello World"}));
//! ```

mod dynamic;
mod provider;

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

pub use dynamic::{DynamicVariables, Generator, RANDOM_INT_MAX};
pub use provider::Provider;

/// Total substitutions after which rescanning stops.
pub const MAX_REPLACEMENTS: usize = 19;

#[expect(
    clippy::expect_used,
    reason = "the token pattern is a literal and always compiles"
)]
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("token pattern compiles"));

/// Outcome of resolving a single string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolution {
    text: String,
    passes: usize,
    replacements: usize,
}

impl Resolution {
    /// The resolved text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of scans performed, including the final one.
    #[must_use]
    pub const fn passes(&self) -> usize {
        self.passes
    }

    /// Number of tokens replaced across all passes.
    #[must_use]
    pub const fn replacements(&self) -> usize {
        self.replacements
    }

    /// Returns `true` when the text still contains a `{{...}}` token.
    #[must_use]
    pub fn has_unresolved(&self) -> bool {
        TOKEN.is_match(&self.text)
    }

    /// Consume the outcome, keeping the text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Resolves tokens against an ordered list of providers.
///
/// Providers are consulted in the order they were added; the first one that
/// has a key supplies its value.
#[derive(Clone, Default)]
pub struct Substitutor<'a> {
    providers: Vec<&'a dyn Provider>,
}

impl<'a> Substitutor<'a> {
    /// Create a substitutor with no providers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Append `provider` with the lowest priority so far.
    #[must_use]
    pub fn with<P: Provider + 'a>(mut self, provider: &'a P) -> Self {
        self.push(provider);
        self
    }

    /// Append `provider` with the lowest priority so far.
    pub fn push(&mut self, provider: &'a dyn Provider) {
        self.providers.push(provider);
    }

    /// Number of providers consulted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` when no providers were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Value of `key` from the first provider that has it.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<Value> {
        self.providers
            .iter()
            .find(|provider| provider.has(key))
            .and_then(|provider| provider.get(key))
    }

    /// Return a copy of `value` with tokens in every string resolved.
    ///
    /// Arrays and objects are rebuilt element by element; object keys are
    /// left alone. Non-string scalars are returned unchanged.
    #[must_use]
    pub fn resolve(&self, value: &Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.resolve_text(text).into_text()),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.resolve(item)).collect())
            }
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.resolve(item)))
                    .collect(),
            ),
            Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
        }
    }

    /// Resolve the tokens in `text`.
    #[must_use]
    pub fn resolve_str(&self, text: &str) -> String {
        self.resolve_text(text).into_text()
    }

    /// Resolve the tokens in `text`, reporting pass and replacement counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use var_scope::Substitutor;
    ///
    /// let a = json!({"a": "{{b}}"});
    /// let b = json!({"b": "{{a}}"});
    /// let outcome = Substitutor::new().with(&a).with(&b).resolve_text("{{a}}");
    /// assert_eq!(outcome.replacements(), 19);
    /// assert!(outcome.has_unresolved());
    /// ```
    #[must_use]
    pub fn resolve_text(&self, text: &str) -> Resolution {
        let mut current = text.to_owned();
        let mut passes = 0;
        let mut replacements = 0;
        loop {
            let (next, replaced) = self.substitute_pass(&current);
            current = next;
            passes += 1;
            replacements += replaced;
            tracing::trace!(passes, replaced, replacements, "substitution pass");
            if replaced == 0 || replacements >= MAX_REPLACEMENTS {
                break;
            }
        }
        if replacements >= MAX_REPLACEMENTS && TOKEN.is_match(&current) {
            tracing::debug!(
                replacements,
                "replacement budget exhausted with unresolved tokens"
            );
        }
        Resolution {
            text: current,
            passes,
            replacements,
        }
    }

    /// Replace every innermost token once. Returns the new text and the
    /// number of tokens replaced.
    fn substitute_pass(&self, text: &str) -> (String, usize) {
        let mut replaced = 0;
        let next = TOKEN.replace_all(text, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let name = caps.get(1).map_or("", |m| m.as_str());
            match self.find(name).as_ref().and_then(primitive_text) {
                Some(value) => {
                    replaced += 1;
                    value
                }
                None => whole.to_owned(),
            }
        });
        (next.into_owned(), replaced)
    }
}

/// Text inserted for a primitive value; `None` leaves the token untouched.
fn primitive_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl std::fmt::Debug for Substitutor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Substitutor")
            .field("providers", &self.providers.len())
            .finish()
    }
}

/// Resolve `value` against `providers`, searched in order.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use var_scope::{Provider, resolve};
///
/// let first = json!({"alpha": "{{beta-{{gamma}}}}"});
/// let second = json!({"gamma": "delta"});
/// let third = json!({"beta-delta": "epsilon"});
/// let providers: [&dyn Provider; 3] = [&first, &second, &third];
/// assert_eq!(resolve(&json!("{{alpha}}"), &providers), json!("epsilon"));
/// ```
#[must_use]
pub fn resolve(value: &Value, providers: &[&dyn Provider]) -> Value {
    let mut substitutor = Substitutor::new();
    for provider in providers {
        substitutor.push(*provider);
    }
    substitutor.resolve(value)
}
