//! Knowledge graph: the in-memory triple index and the loaders that fill it.
//!
//! - **Index** ([`TripleIndex`]): edge arena with subject, predicate, object and
//!   (subject, predicate) lookup paths, plus literal attachments
//! - **Source** ([`source::GraphSource`]): RDF files parsed via `oxigraph`
//! - **Traversal** ([`traverse`]): bounded neighborhood extraction used by light mode
//!
//! Every index entry refers to an [`Edge`] stored exactly once in the arena.

pub mod index;
pub mod source;
pub mod traverse;

use serde::{Deserialize, Serialize};

use crate::symbol::SymbolId;

pub use index::TripleIndex;

/// An object triple (subject, predicate, object) between two graph entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// The subject of the triple.
    pub subject: SymbolId,
    /// The predicate (relation) of the triple.
    pub predicate: SymbolId,
    /// The object of the triple.
    pub object: SymbolId,
}

impl Edge {
    /// Create a new edge.
    pub fn new(subject: SymbolId, predicate: SymbolId, object: SymbolId) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// Position of an [`Edge`] in the index arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

impl EdgeId {
    pub(crate) fn from_slot(slot: usize) -> Self {
        Self(u32::try_from(slot).expect("edge arena exceeds u32::MAX edges"))
    }

    /// Zero-based arena slot.
    pub fn slot(self) -> usize {
        self.0 as usize
    }
}

/// What `add_edge` does with an exact (s, p, o) duplicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Multigraph semantics: parallel identical edges are kept.
    #[default]
    Keep,
    /// An identical edge already present turns the insert into a no-op.
    Skip,
}

/// Read-only view over an ordered bucket of edges.
///
/// Borrowed from the index; cheap to copy, indexable in O(1) so samplers can
/// draw a random edge without allocating.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    ids: &'a [EdgeId],
    arena: &'a [Edge],
}

impl<'a> EdgeView<'a> {
    pub(crate) fn new(ids: &'a [EdgeId], arena: &'a [Edge]) -> Self {
        Self { ids, arena }
    }

    pub(crate) fn empty(arena: &'a [Edge]) -> Self {
        Self { ids: &[], arena }
    }

    /// Number of edges in the view.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the view contains no edges.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The `i`-th edge in insertion order.
    pub fn get(&self, i: usize) -> Option<&'a Edge> {
        self.ids.get(i).map(|id| &self.arena[id.slot()])
    }

    /// Arena ids of the edges in the view.
    pub fn ids(&self) -> &'a [EdgeId] {
        self.ids
    }

    /// Iterate over the edges in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Edge> + 'a {
        let arena = self.arena;
        self.ids.iter().map(move |id| &arena[id.slot()])
    }
}
