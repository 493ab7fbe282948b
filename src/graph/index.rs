//! In-memory triple index with four edge access paths.
//!
//! Edges live once in an arena (`Vec<Edge>`); the subject, predicate, object
//! and (subject, predicate) indices hold [`EdgeId`]s into it. Literal
//! attachments are kept apart from the edge graph, keyed by subject and then
//! predicate.
//!
//! The index is built by a single thread and is read-only afterwards. It has
//! no interior mutability, so `&TripleIndex` can be shared across worker
//! threads without locking.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::registry::SymbolTable;
use crate::symbol::SymbolId;

use super::{DuplicatePolicy, Edge, EdgeId, EdgeView};

/// Literal values of one subject, grouped by predicate.
pub type LiteralMap = BTreeMap<SymbolId, BTreeSet<String>>;

/// Multi-keyed store of object edges and literal attachments.
#[derive(Clone, Default)]
pub struct TripleIndex {
    policy: DuplicatePolicy,
    symbols: SymbolTable,
    /// Edge arena; every index below refers into it.
    edges: Vec<Edge>,
    by_subject: HashMap<SymbolId, Vec<EdgeId>>,
    by_predicate: HashMap<SymbolId, Vec<EdgeId>>,
    by_object: HashMap<SymbolId, Vec<EdgeId>>,
    by_subject_predicate: HashMap<(SymbolId, SymbolId), Vec<EdgeId>>,
    /// subject → predicate → literal values.
    literals: HashMap<SymbolId, LiteralMap>,
    literal_count: usize,
    /// Entities incident to at least one edge. Kept in step with the
    /// subject/object maps on every insert.
    node_count: usize,
}

impl TripleIndex {
    /// Most edges, and most distinct identifiers, one index can hold. Ids are
    /// 32-bit and a statement interns at most three new identifiers.
    pub const CAPACITY: usize = u32::MAX as usize - 3;

    /// Create an empty index with multigraph semantics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with an explicit duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Whether the next insert could overflow [`CAPACITY`](Self::CAPACITY).
    /// Inserting into a full index panics; loaders check this first.
    pub fn is_full(&self) -> bool {
        at_capacity(self.edges.len(), self.symbols.len())
    }

    /// The duplicate policy applied by [`add_edge`](Self::add_edge).
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    // -----------------------------------------------------------------------
    // Insertion
    // -----------------------------------------------------------------------

    /// Insert an object edge.
    ///
    /// Returns the arena id of the new edge, or `None` when the index uses
    /// [`DuplicatePolicy::Skip`] and an identical edge is already present.
    pub fn add_edge(&mut self, subject: &str, predicate: &str, object: &str) -> Option<EdgeId> {
        let s = self.symbols.intern(subject);
        let p = self.symbols.intern(predicate);
        let o = self.symbols.intern(object);
        self.insert_edge(Edge::new(s, p, o))
    }

    fn insert_edge(&mut self, edge: Edge) -> Option<EdgeId> {
        if self.policy == DuplicatePolicy::Skip && self.contains_edge(&edge) {
            return None;
        }

        let new_subject = !self.is_node(edge.subject);
        let new_object = edge.object != edge.subject && !self.is_node(edge.object);

        let id = EdgeId::from_slot(self.edges.len());
        self.edges.push(edge);
        self.by_subject.entry(edge.subject).or_default().push(id);
        self.by_predicate.entry(edge.predicate).or_default().push(id);
        self.by_object.entry(edge.object).or_default().push(id);
        self.by_subject_predicate
            .entry((edge.subject, edge.predicate))
            .or_default()
            .push(id);

        self.node_count += usize::from(new_subject) + usize::from(new_object);
        Some(id)
    }

    /// Attach a literal value to `(subject, predicate)`.
    ///
    /// Returns `false` when the exact text was already attached.
    pub fn add_literal(&mut self, subject: &str, predicate: &str, text: &str) -> bool {
        let s = self.symbols.intern(subject);
        let p = self.symbols.intern(predicate);
        let inserted = self
            .literals
            .entry(s)
            .or_default()
            .entry(p)
            .or_default()
            .insert(text.to_owned());
        if inserted {
            self.literal_count += 1;
        }
        inserted
    }

    /// Copy every edge and literal attachment of `other` into `self`.
    ///
    /// `other` is left untouched. Edges go through this index's duplicate
    /// policy, so under the default [`DuplicatePolicy::Keep`] the result is
    /// the multigraph union of both indices.
    pub fn merge_from(&mut self, other: &TripleIndex) {
        for edge in &other.edges {
            let s = self.symbols.intern(other.label(edge.subject));
            let p = self.symbols.intern(other.label(edge.predicate));
            let o = self.symbols.intern(other.label(edge.object));
            self.insert_edge(Edge::new(s, p, o));
        }
        for (&subject, by_predicate) in &other.literals {
            for (&predicate, values) in by_predicate {
                for text in values {
                    self.add_literal(other.label(subject), other.label(predicate), text);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Lookups by label
    // -----------------------------------------------------------------------

    /// Edges whose subject is `subject`.
    pub fn edges_by_subject(&self, subject: &str) -> EdgeView<'_> {
        match self.symbols.get(subject) {
            Some(s) => self.outgoing(s),
            None => EdgeView::empty(&self.edges),
        }
    }

    /// Edges whose predicate is `predicate`.
    pub fn edges_by_predicate(&self, predicate: &str) -> EdgeView<'_> {
        match self.symbols.get(predicate) {
            Some(p) => self.with_predicate(p),
            None => EdgeView::empty(&self.edges),
        }
    }

    /// Edges whose object is `object`.
    pub fn edges_by_object(&self, object: &str) -> EdgeView<'_> {
        match self.symbols.get(object) {
            Some(o) => self.incoming(o),
            None => EdgeView::empty(&self.edges),
        }
    }

    /// Edges matching both `subject` and `predicate`.
    pub fn edges_by_subject_predicate(&self, subject: &str, predicate: &str) -> EdgeView<'_> {
        match (self.symbols.get(subject), self.symbols.get(predicate)) {
            (Some(s), Some(p)) => self.with_subject_predicate(s, p),
            _ => EdgeView::empty(&self.edges),
        }
    }

    /// Literal attachments of `subject`, grouped by predicate.
    pub fn literals_for_subject(&self, subject: &str) -> Option<&LiteralMap> {
        self.literals.get(&self.symbols.get(subject)?)
    }

    /// Literal values attached to `(subject, predicate)`.
    pub fn literals(&self, subject: &str, predicate: &str) -> Option<&BTreeSet<String>> {
        let s = self.symbols.get(subject)?;
        let p = self.symbols.get(predicate)?;
        self.literals.get(&s)?.get(&p)
    }

    /// Whether `entity` is incident to at least one edge.
    pub fn contains_node(&self, entity: &str) -> bool {
        self.symbols.get(entity).is_some_and(|id| self.is_node(id))
    }

    // -----------------------------------------------------------------------
    // Lookups by symbol (sampler hot path)
    // -----------------------------------------------------------------------

    /// Outgoing edges of `subject`.
    pub fn outgoing(&self, subject: SymbolId) -> EdgeView<'_> {
        self.view(self.by_subject.get(&subject))
    }

    /// Incoming edges of `object`.
    pub fn incoming(&self, object: SymbolId) -> EdgeView<'_> {
        self.view(self.by_object.get(&object))
    }

    /// Edges carrying `predicate`.
    pub fn with_predicate(&self, predicate: SymbolId) -> EdgeView<'_> {
        self.view(self.by_predicate.get(&predicate))
    }

    /// Edges matching `(subject, predicate)`.
    pub fn with_subject_predicate(&self, subject: SymbolId, predicate: SymbolId) -> EdgeView<'_> {
        self.view(self.by_subject_predicate.get(&(subject, predicate)))
    }

    /// Number of edges carrying `predicate`.
    pub fn predicate_frequency(&self, predicate: SymbolId) -> usize {
        self.by_predicate.get(&predicate).map_or(0, Vec::len)
    }

    /// Literal attachments of `subject`, grouped by predicate.
    pub fn literals_of(&self, subject: SymbolId) -> Option<&LiteralMap> {
        self.literals.get(&subject)
    }

    /// Whether `id` is incident to at least one edge.
    pub fn is_node(&self, id: SymbolId) -> bool {
        self.by_subject.contains_key(&id) || self.by_object.contains_key(&id)
    }

    fn view<'a>(&'a self, ids: Option<&'a Vec<EdgeId>>) -> EdgeView<'a> {
        match ids {
            Some(ids) => EdgeView::new(ids, &self.edges),
            None => EdgeView::empty(&self.edges),
        }
    }

    fn contains_edge(&self, edge: &Edge) -> bool {
        self.with_subject_predicate(edge.subject, edge.predicate)
            .iter()
            .any(|e| e.object == edge.object)
    }

    // -----------------------------------------------------------------------
    // Symbols and whole-index accessors
    // -----------------------------------------------------------------------

    /// Id of an interned identifier.
    pub fn symbol(&self, label: &str) -> Option<SymbolId> {
        self.symbols.get(label)
    }

    /// Identifier string of a symbol.
    pub fn label(&self, id: SymbolId) -> &str {
        self.symbols.resolve(id)
    }

    /// The labels of an edge as `(subject, predicate, object)`.
    pub fn edge_labels(&self, edge: &Edge) -> (&str, &str, &str) {
        (
            self.label(edge.subject),
            self.label(edge.predicate),
            self.label(edge.object),
        )
    }

    /// The interning table.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Edge stored at `id`.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.slot())
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All nodes: the union of edge subjects and edge objects.
    pub fn nodes(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.by_subject.keys().copied().chain(
            self.by_object
                .keys()
                .copied()
                .filter(|id| !self.by_subject.contains_key(id)),
        )
    }

    /// Subjects carrying at least one literal attachment.
    pub fn literal_subjects(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.literals.keys().copied()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of object edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of distinct literal attachments.
    pub fn literal_count(&self) -> usize {
        self.literal_count
    }

    /// Whether the index holds neither edges nor literals.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.literals.is_empty()
    }
}

impl std::fmt::Debug for TripleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripleIndex")
            .field("policy", &self.policy)
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("literals", &self.literal_count())
            .finish()
    }
}

fn at_capacity(edges: usize, symbols: usize) -> bool {
    edges >= TripleIndex::CAPACITY || symbols >= TripleIndex::CAPACITY
}
