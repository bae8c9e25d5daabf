//! Per-type schema memoization.

use crate::analyzer::Analyzer;
use crate::error::AnalysisError;
use crate::schema::Schema;
use dashmap::DashMap;
use recordbind_core::Bindable;
use std::any::TypeId;
use std::sync::Arc;

/// Concurrent cache of analyzed schemas keyed by target type.
///
/// A schema is analyzed at most once per type in the common case; two threads
/// racing on the first request for a type may both analyze it, and the first
/// insert wins.
#[derive(Debug, Default)]
pub struct SchemaCache {
    analyzer: Analyzer,
    entries: DashMap<TypeId, Arc<Schema>>,
}

impl SchemaCache {
    /// Creates an empty cache using `analyzer`.
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            entries: DashMap::new(),
        }
    }

    /// The analyzer used for cache misses.
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Returns the cached schema for `T`, if any.
    pub fn get<T: Bindable>(&self) -> Option<Arc<Schema>> {
        self.entries
            .get(&TypeId::of::<T>())
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Analyzes `T` and stores the result, keeping an entry that is already
    /// present.
    pub fn insert<T: Bindable>(&self) -> Result<Arc<Schema>, AnalysisError> {
        let schema = Arc::new(self.analyzer.analyze_type::<T>()?);
        let entry = self.entries.entry(TypeId::of::<T>()).or_insert(schema);
        Ok(Arc::clone(entry.value()))
    }

    /// Returns the cached schema for `T`, analyzing it on a miss.
    pub fn get_or_analyze<T: Bindable>(&self) -> Result<Arc<Schema>, AnalysisError> {
        match self.get::<T>() {
            Some(schema) => Ok(schema),
            None => self.insert::<T>(),
        }
    }

    /// Returns `true` if `T` has been analyzed.
    pub fn contains<T: Bindable>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of cached schemas.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
