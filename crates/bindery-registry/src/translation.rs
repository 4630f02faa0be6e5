//! Placeholder-to-rendered translation table.
//!
//! While rendering, every placeholder that gets replaced is recorded here
//! against its replacement. The patcher then rewrites namespace attributes
//! through this table, and the type-to-type pairs are reported back to the
//! engine.

use bindery_core::{Identity, TypeHash, Value};
use rustc_hash::FxHashMap;

/// Map from placeholder identity to rendered value.
///
/// The `None` key collects replacements whose placeholder did not exist;
/// it is dropped before patching so absent placeholders never match
/// anything.
#[derive(Debug, Default)]
pub struct TranslationTable {
    entries: FxHashMap<Option<Identity>, Value>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a replacement. Re-recording the same placeholder keeps the
    /// latest replacement.
    pub fn record(&mut self, old: Option<Identity>, new: Value) {
        self.entries.insert(old, new);
    }

    /// Remove the absent-placeholder sentinel. Must run before lookups
    /// drive patching.
    pub fn drop_sentinel(&mut self) {
        self.entries.remove(&None);
    }

    /// The replacement for a placeholder identity, if one was recorded.
    pub fn lookup(&self, old: Identity) -> Option<&Value> {
        self.entries.get(&Some(old))
    }

    /// The replacement for a value, resolved through its identity.
    /// Values with no identity never match.
    pub fn lookup_value(&self, value: &Value) -> Option<&Value> {
        self.lookup(value.identity()?)
    }

    /// Every class-to-class pair in the table, for engine type
    /// translation.
    pub fn type_pairs(&self) -> Vec<(TypeHash, TypeHash)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| match (k, v) {
                (Some(Identity::Type(old)), Value::Class(new)) => Some((*old, *new)),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
