//! Entity scoping for light mode.
//!
//! Light mode generates walks for a requested subset of entities only. The
//! resolvers here compute the neighbourhood those walks can reach within the
//! walk depth and materialize it as a small [`TripleIndex`], either from an
//! index already in memory or by streaming a [`GraphSource`] once per hop.
//!
//! Requested entities that do not occur in the graph are reported in the
//! [`ScopeReport`] and logged; they never fail the resolution.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{ConfigError, SourceError};
use crate::graph::TripleIndex;
use crate::graph::source::{GraphSource, LoadOptions, Statement};
use crate::graph::traverse::{Direction, extract_subgraph};
use crate::shorten::UriShortener;

/// Requested entities, in file order, without repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityList {
    entities: Vec<String>,
}

impl EntityList {
    /// Build from identifiers that are already in their final form.
    pub fn new<I, S>(entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let entities = entities
            .into_iter()
            .map(Into::<String>::into)
            .filter(|entity| seen.insert(entity.clone()))
            .collect();
        Self { entities }
    }

    /// Parse one identifier per line.
    ///
    /// Lines are trimmed; blank lines and lines starting with `#` are
    /// skipped. Identifiers are shortened with `shortener`.
    pub fn parse(content: &str, shortener: &UriShortener) -> Self {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(|line| shortener.shorten(line).into_owned()),
        )
    }

    /// Read an entity file.
    pub fn read(path: &Path, shortener: &UriShortener) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingInput {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let list = Self::parse(&content, shortener);
        tracing::info!(path = %path.display(), entities = list.len(), "entity list read");
        Ok(list)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entities
    }
}

/// Outcome of scoping a requested entity list against a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeReport {
    /// Number of distinct entities requested.
    pub requested: usize,
    /// Requested entities present in the graph.
    pub found: usize,
    /// Requested entities absent from the graph, in request order.
    pub missing: Vec<String>,
}

impl ScopeReport {
    fn from_lookup(entities: &[String], is_present: impl Fn(&str) -> bool) -> Self {
        let missing: Vec<String> = entities
            .iter()
            .filter(|entity| !is_present(entity.as_str()))
            .cloned()
            .collect();
        let report = ScopeReport {
            requested: entities.len(),
            found: entities.len() - missing.len(),
            missing,
        };
        for entity in &report.missing {
            tracing::warn!(%entity, "requested entity not found in graph");
        }
        report
    }
}

/// Scope an in-memory index to the neighbourhood of `entities`.
///
/// Collects every edge within `depth` hops of a requested entity in
/// `direction`. At least one hop is always taken so that each found entity
/// is a node of the scoped index. With `embed_text`, the literal
/// attachments of requested entities are copied and literal-only subjects
/// count as found.
pub fn resolve_in_index(
    full: &TripleIndex,
    entities: &[String],
    depth: usize,
    direction: Direction,
    embed_text: bool,
) -> (TripleIndex, ScopeReport) {
    let present = |entity: &str| {
        full.symbol(entity).is_some_and(|id| {
            full.is_node(id) || (embed_text && full.literals_of(id).is_some())
        })
    };
    let report = ScopeReport::from_lookup(entities, present);

    let seeds: Vec<_> = entities.iter().filter_map(|e| full.symbol(e)).collect();
    let reached = extract_subgraph(full, &seeds, depth.max(1), direction);

    let mut scoped = TripleIndex::with_policy(full.policy());
    for edge in reached.edges.iter().filter_map(|&id| full.edge(id)) {
        let (s, p, o) = full.edge_labels(edge);
        scoped.add_edge(s, p, o);
    }
    if embed_text {
        for &seed in &seeds {
            let Some(literals) = full.literals_of(seed) else {
                continue;
            };
            let subject = full.label(seed);
            for (&predicate, texts) in literals {
                for text in texts {
                    scoped.add_literal(subject, full.label(predicate), text);
                }
            }
        }
    }

    tracing::info!(
        requested = report.requested,
        found = report.found,
        hops = reached.depth_reached,
        edges = scoped.edge_count(),
        "scoped index built"
    );
    (scoped, report)
}

/// Scope a graph source to the neighbourhood of `entities` without loading
/// the whole graph.
///
/// Makes one pass over the source per hop. Each pass keeps the edges
/// incident to the current frontier and moves the frontier to the newly
/// reached entities; statements are identified by their position in the
/// stream so an edge taken in an earlier pass is not taken again.
pub fn resolve_streaming(
    source: &GraphSource,
    entities: &[String],
    depth: usize,
    direction: Direction,
    options: &LoadOptions,
    embed_text: bool,
) -> Result<(TripleIndex, ScopeReport), SourceError> {
    let requested: HashSet<&str> = entities.iter().map(String::as_str).collect();
    let mut found: HashSet<String> = HashSet::new();
    let mut visited: HashSet<String> = entities.iter().cloned().collect();
    let mut frontier: HashSet<String> = visited.clone();
    let mut taken: HashSet<usize> = HashSet::new();
    let mut scoped = TripleIndex::with_policy(options.duplicate_policy);
    let mut passes = 0;

    for hop in 0..depth.max(1) {
        if frontier.is_empty() {
            break;
        }
        let mut next: HashSet<String> = HashSet::new();
        let mut ordinal = 0usize;
        let mut inserted = Ok(());
        source.for_each_statement(options, |statement| {
            let position = ordinal;
            ordinal += 1;
            match &statement {
                Statement::Edge {
                    subject, object, ..
                } => {
                    if hop == 0 {
                        for end in [subject, object] {
                            if requested.contains(end.as_str()) {
                                found.insert(end.clone());
                            }
                        }
                    }
                    let forward = frontier.contains(subject.as_str());
                    let backward =
                        direction == Direction::Both && frontier.contains(object.as_str());
                    if !(forward || backward) || !taken.insert(position) {
                        return;
                    }
                    if inserted.is_ok() {
                        inserted = statement.insert_into(&mut scoped);
                    }
                    if forward && visited.insert(object.clone()) {
                        next.insert(object.clone());
                    }
                    if backward && visited.insert(subject.clone()) {
                        next.insert(subject.clone());
                    }
                }
                Statement::Literal { subject, .. } => {
                    if hop == 0 && embed_text && requested.contains(subject.as_str()) {
                        found.insert(subject.clone());
                        if inserted.is_ok() {
                            inserted = statement.insert_into(&mut scoped);
                        }
                    }
                }
            }
        })?;
        inserted?;
        passes += 1;
        frontier = next;
    }

    let report = ScopeReport::from_lookup(entities, |entity| found.contains(entity));
    tracing::info!(
        requested = report.requested,
        found = report.found,
        passes,
        edges = scoped.edge_count(),
        literals = scoped.literal_count(),
        "scoped index streamed"
    );
    Ok((scoped, report))
}
