//! Per-call evaluation context.

use std::collections::HashMap;
use std::collections::hash_map;
use std::sync::{Arc, OnceLock};

use crate::value::Value;

/// Caller-supplied named values made available to `Method` and `Service`
/// policy expressions.
///
/// The names `subject` and `resource` are always bound by the engine and
/// cannot be overridden from here.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: HashMap<String, Value>,
    subject_cache: Option<SubjectCache>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Resolve subjects through `cache` for every evaluation using this
    /// context.
    #[must_use]
    pub fn with_subject_cache(mut self, cache: SubjectCache) -> Self {
        self.subject_cache = Some(cache);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.values.iter()
    }

    #[must_use]
    pub fn subject_cache(&self) -> Option<&SubjectCache> {
        self.subject_cache.as_ref()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            subject_cache: None,
        }
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Compute-once slot for the subject list of one logical request.
///
/// Clones share the same slot: create one per request, attach it to every
/// [`Context`] of that request, and subjects are located only once.
#[derive(Debug, Clone, Default)]
pub struct SubjectCache {
    slot: Arc<OnceLock<Vec<Value>>>,
}

impl SubjectCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached subjects, computing them on first access.
    #[must_use]
    pub fn get_or_init(&self, locate: impl FnOnce() -> Vec<Value>) -> Vec<Value> {
        self.slot.get_or_init(locate).clone()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }
}
