//! Symbol table: bidirectional label ↔ ID mapping.
//!
//! The [`SymbolTable`] interns identifier strings into dense [`SymbolId`]s and
//! resolves them back in O(1). It is filled by a single thread while the
//! index is built and only read afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use crate::symbol::SymbolId;

/// Interning table mapping identifier strings to [`SymbolId`]s and back.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    /// Forward map: label → id.
    label_to_id: HashMap<Arc<str>, SymbolId>,
    /// Reverse map: `id.slot()` → label.
    id_to_label: Vec<Arc<str>>,
}

impl SymbolTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of `label`, allocating the next id if it is new.
    ///
    /// Panics past `u32::MAX` labels; graph loading stops earlier at
    /// [`TripleIndex::CAPACITY`](crate::graph::TripleIndex::CAPACITY).
    pub fn intern(&mut self, label: &str) -> SymbolId {
        if let Some(&id) = self.label_to_id.get(label) {
            return id;
        }
        let raw = u32::try_from(self.id_to_label.len() + 1)
            .expect("symbol table exceeds u32::MAX identifiers");
        let id = SymbolId::new(raw).expect("interned ids start at 1");
        let label: Arc<str> = Arc::from(label);
        self.id_to_label.push(Arc::clone(&label));
        self.label_to_id.insert(label, id);
        id
    }

    /// Look up the id of an already interned label.
    pub fn get(&self, label: &str) -> Option<SymbolId> {
        self.label_to_id.get(label).copied()
    }

    /// Resolve an id to its label.
    ///
    /// Ids are only handed out by this table, so a foreign id resolves to
    /// the empty string rather than panicking.
    pub fn resolve(&self, id: SymbolId) -> &str {
        self.id_to_label
            .get(id.slot())
            .map(|label| label.as_ref())
            .unwrap_or("")
    }

    /// Number of interned labels.
    pub fn len(&self) -> usize {
        self.id_to_label.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.id_to_label.is_empty()
    }

    /// Iterate over `(id, label)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &str)> {
        self.id_to_label.iter().enumerate().filter_map(|(slot, label)| {
            let id = SymbolId::new(u32::try_from(slot + 1).ok()?)?;
            Some((id, label.as_ref()))
        })
    }
}
