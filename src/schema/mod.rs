//! Per-graph schema name cache.
//!
//! The compact reply format does not inline label, property-name, or
//! relationship-type strings; rows carry small integer indices into three
//! server-side tables. This cache mirrors those tables locally and is
//! populated on demand by calling the matching introspection procedure, which
//! always returns the full current list for its table. The protocol has no
//! incremental diff, so every refresh replaces the local snapshot wholesale.
//!
//! Concurrency: readers clone an `Arc` snapshot and never block; a refresh is
//! serialized per table through an async gate so concurrent misses collapse
//! into one introspection round-trip.

use std::sync::{Arc, RwLock};

/// Which of the three name tables an index points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Labels,
    PropertyNames,
    RelationshipTypes,
}

impl TableKind {
    /// Introspection procedure that lists this table's names.
    pub fn procedure(self) -> &'static str {
        match self {
            TableKind::Labels => "db.labels",
            TableKind::PropertyNames => "db.propertyKeys",
            TableKind::RelationshipTypes => "db.relationshipTypes",
        }
    }

    pub(crate) const ALL: [TableKind; 3] = [
        TableKind::Labels,
        TableKind::PropertyNames,
        TableKind::RelationshipTypes,
    ];
}

/// One lazily populated index → name table.
#[derive(Debug, Default)]
pub struct SchemaTable {
    snapshot: RwLock<Arc<Vec<String>>>,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl SchemaTable {
    /// Current snapshot. Cheap; never blocks on a refresh in flight.
    pub fn snapshot(&self) -> Arc<Vec<String>> {
        // Poisoning only happens if a writer panicked mid-replace; the
        // snapshot itself is always a complete table.
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Resolve an index against the current snapshot.
    pub fn resolve(&self, index: i64) -> Option<String> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.snapshot().get(i).cloned())
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Whether `index` already resolves without a refresh.
    pub(crate) fn covers(&self, index: i64) -> bool {
        match usize::try_from(index) {
            Ok(i) => i < self.len(),
            Err(_) => true,
        }
    }

    /// Replace the snapshot wholesale with a freshly fetched table.
    pub(crate) fn replace(&self, names: Vec<String>) {
        let next = Arc::new(names);
        match self.snapshot.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Gate serializing refreshes of this table. Holders must re-check
    /// [`covers`](Self::covers) after acquiring: another flight may have
    /// already refreshed while they waited.
    pub(crate) fn refresh_gate(&self) -> &tokio::sync::Mutex<()> {
        &self.refresh_gate
    }
}

/// The three name tables of one graph.
///
/// A cache instance lives exactly as long as the client's registry entry for
/// its graph id; deleting the graph discards the cache.
#[derive(Debug, Default)]
pub struct SchemaCache {
    labels: SchemaTable,
    property_names: SchemaTable,
    relationship_types: SchemaTable,
}

impl SchemaCache {
    pub fn new() -> Self {
        SchemaCache::default()
    }

    pub fn table(&self, kind: TableKind) -> &SchemaTable {
        match kind {
            TableKind::Labels => &self.labels,
            TableKind::PropertyNames => &self.property_names,
            TableKind::RelationshipTypes => &self.relationship_types,
        }
    }

    pub fn label(&self, index: i64) -> Option<String> {
        self.labels.resolve(index)
    }

    pub fn property_name(&self, index: i64) -> Option<String> {
        self.property_names.resolve(index)
    }

    pub fn relationship_type(&self, index: i64) -> Option<String> {
        self.relationship_types.resolve(index)
    }
}

/// Highest index per table referenced by one reply's rows.
///
/// Computed by scanning the raw rows before record decoding begins, so the
/// client can refresh undersized tables in one pass and row decoding itself
/// never performs I/O.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SchemaDemand {
    labels: Option<i64>,
    property_names: Option<i64>,
    relationship_types: Option<i64>,
}

impl SchemaDemand {
    pub(crate) fn note(&mut self, kind: TableKind, index: i64) {
        let slot = match kind {
            TableKind::Labels => &mut self.labels,
            TableKind::PropertyNames => &mut self.property_names,
            TableKind::RelationshipTypes => &mut self.relationship_types,
        };
        *slot = Some(slot.map_or(index, |current| current.max(index)));
    }

    pub(crate) fn max_index(&self, kind: TableKind) -> Option<i64> {
        match kind {
            TableKind::Labels => self.labels,
            TableKind::PropertyNames => self.property_names,
            TableKind::RelationshipTypes => self.relationship_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_snapshot() {
        let table = SchemaTable::default();
        assert_eq!(table.resolve(0), None);
        assert!(!table.covers(0));
        assert!(table.covers(-1));

        table.replace(vec!["Person".into(), "Actor".into()]);
        assert_eq!(table.resolve(0).as_deref(), Some("Person"));
        assert_eq!(table.resolve(1).as_deref(), Some("Actor"));
        assert_eq!(table.resolve(2), None);
        assert!(table.covers(1));
        assert!(!table.covers(2));
    }

    #[test]
    fn test_refresh_is_monotonic_for_known_indices() {
        // The server only appends names, so a wholesale replacement keeps
        // every previously resolved index stable.
        let table = SchemaTable::default();
        table.replace(vec!["Person".into()]);
        let before = table.resolve(0);

        table.replace(vec!["Person".into(), "Actor".into(), "Director".into()]);
        assert_eq!(table.resolve(0), before);
        assert_eq!(table.resolve(2).as_deref(), Some("Director"));
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let table = SchemaTable::default();
        table.replace(vec!["A".into()]);
        let snapshot = table.snapshot();

        table.replace(vec!["A".into(), "B".into()]);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_cache_tables_are_independent() {
        let cache = SchemaCache::new();
        cache.table(TableKind::Labels).replace(vec!["L".into()]);
        assert_eq!(cache.label(0).as_deref(), Some("L"));
        assert_eq!(cache.property_name(0), None);
        assert_eq!(cache.relationship_type(0), None);
    }

    #[test]
    fn test_demand_tracks_maximum() {
        let mut demand = SchemaDemand::default();
        assert_eq!(demand.max_index(TableKind::Labels), None);

        demand.note(TableKind::Labels, 2);
        demand.note(TableKind::Labels, 1);
        demand.note(TableKind::PropertyNames, 0);
        assert_eq!(demand.max_index(TableKind::Labels), Some(2));
        assert_eq!(demand.max_index(TableKind::PropertyNames), Some(0));
        assert_eq!(demand.max_index(TableKind::RelationshipTypes), None);
    }
}
