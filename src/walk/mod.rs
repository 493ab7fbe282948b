//! Walk samplers: algorithms that turn a start entity into token sequences.
//!
//! A sampler reads a [`TripleIndex`] and never mutates it. Each sampler
//! declares its [`Capabilities`]; the manager checks the configured
//! [`WalkMode`] against them once, before any work starts, so a mismatch is a
//! configuration error rather than a per-entity failure.
//!
//! Graph walks are sampled as [`WalkPath`]s of symbol ids and rendered to
//! space-separated lines at the end; duplicate detection works on the ids.

pub mod mid;
pub mod random;
pub mod text;
pub mod weight;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::graph::TripleIndex;
use crate::graph::traverse::Direction;
use crate::symbol::SymbolId;

pub use weight::EdgeWeighting;

/// Walk generation modes selectable in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalkMode {
    /// Independent forward random walks, duplicates kept.
    RandomWalks,
    /// Forward random walks, every sequence distinct.
    RandomWalksDuplicateFree,
    /// Walks grown in both directions around the start entity.
    MidWalks,
    /// Mid walks, every sequence distinct.
    MidWalksDuplicateFree,
    /// Mid walks drawing edges from a weighted distribution.
    MidWalksWeighted,
}

impl WalkMode {
    /// Every mode, in declaration order.
    pub const ALL: [WalkMode; 5] = [
        WalkMode::RandomWalks,
        WalkMode::RandomWalksDuplicateFree,
        WalkMode::MidWalks,
        WalkMode::MidWalksDuplicateFree,
        WalkMode::MidWalksWeighted,
    ];

    /// Canonical upper-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            WalkMode::RandomWalks => "RANDOM_WALKS",
            WalkMode::RandomWalksDuplicateFree => "RANDOM_WALKS_DUPLICATE_FREE",
            WalkMode::MidWalks => "MID_WALKS",
            WalkMode::MidWalksDuplicateFree => "MID_WALKS_DUPLICATE_FREE",
            WalkMode::MidWalksWeighted => "MID_WALKS_WEIGHTED",
        }
    }

    /// The sampler capability this mode needs.
    pub fn capability(self) -> Capability {
        match self {
            WalkMode::RandomWalks => Capability::RandomWalks,
            WalkMode::RandomWalksDuplicateFree => Capability::DuplicateFreeRandomWalks,
            WalkMode::MidWalks | WalkMode::MidWalksDuplicateFree => Capability::MidWalks,
            WalkMode::MidWalksWeighted => Capability::WeightedMidWalks,
        }
    }

    /// Whether the produced sequences are deduplicated per entity.
    pub fn is_duplicate_free(self) -> bool {
        matches!(
            self,
            WalkMode::RandomWalksDuplicateFree | WalkMode::MidWalksDuplicateFree
        )
    }

    /// Edge directions a walk in this mode can take from a node.
    pub fn direction(self) -> Direction {
        match self {
            WalkMode::RandomWalks | WalkMode::RandomWalksDuplicateFree => Direction::Forward,
            _ => Direction::Both,
        }
    }
}

impl fmt::Display for WalkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalkMode {
    type Err = ConfigError;

    /// Case-insensitive; `-` and spaces are accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        WalkMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownMode {
                value: s.to_owned(),
            })
    }
}

/// One kind of walk a sampler may be able to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    RandomWalks,
    DuplicateFreeRandomWalks,
    MidWalks,
    WeightedMidWalks,
    TextWalks,
}

impl Capability {
    fn bit(self) -> u8 {
        match self {
            Capability::RandomWalks => 1,
            Capability::DuplicateFreeRandomWalks => 1 << 1,
            Capability::MidWalks => 1 << 2,
            Capability::WeightedMidWalks => 1 << 3,
            Capability::TextWalks => 1 << 4,
        }
    }
}

/// Set of [`Capability`] values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No capability at all.
    pub const NONE: Capabilities = Capabilities(0);
    /// Every capability.
    pub const ALL: Capabilities = Capabilities(0b1_1111);

    /// The set extended by `capability`.
    pub fn with(self, capability: Capability) -> Self {
        Capabilities(self.0 | capability.bit())
    }

    /// Whether `capability` is in the set.
    pub fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    /// Whether the set allows `mode`.
    pub fn supports(self, mode: WalkMode) -> bool {
        self.contains(mode.capability())
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Capabilities::NONE, Capabilities::with)
    }
}

/// Per-run sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkSettings {
    /// Maximum number of hops per walk.
    pub depth: usize,
    /// Walks requested per entity.
    pub walks_per_entity: usize,
    /// Edge weights of weighted mid walks.
    pub weighting: EdgeWeighting,
    /// Sliding window over literal tokens; `None` emits one walk per literal.
    pub text_window: Option<usize>,
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            depth: 4,
            walks_per_entity: 100,
            weighting: EdgeWeighting::default(),
            text_window: None,
        }
    }
}

/// A sampled walk as symbol ids: entity, predicate, entity, ...
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalkPath(pub Vec<SymbolId>);

impl WalkPath {
    /// Number of hops (edges) in the walk.
    pub fn hops(&self) -> usize {
        self.0.len() / 2
    }

    /// Render as a space-separated line of identifiers.
    pub fn render(&self, index: &TripleIndex) -> String {
        let mut line = String::new();
        for (i, &id) in self.0.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(index.label(id));
        }
        line
    }
}

/// Keep the first occurrence of every path.
pub(crate) fn dedup_paths(paths: Vec<WalkPath>) -> Vec<WalkPath> {
    let mut seen = HashSet::with_capacity(paths.len());
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// A walk-generation strategy over a read-only index.
///
/// Implementations must be shareable across worker threads; any randomness
/// comes from the `rng` handed in per task.
pub trait WalkSampler: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// What this sampler can generate.
    fn capabilities(&self) -> Capabilities;

    /// Graph walks for `entity` in `mode`, rendered as lines.
    ///
    /// An entity without eligible edges yields no walks. With `depth == 0`
    /// every known entity yields its single-token walk.
    fn walks(
        &self,
        index: &TripleIndex,
        mode: WalkMode,
        entity: SymbolId,
        settings: &WalkSettings,
        rng: &mut dyn RngCore,
    ) -> Vec<String>;

    /// Literal-text walks for `entity`, rendered as lines.
    fn text_walks(&self, index: &TripleIndex, entity: SymbolId, settings: &WalkSettings)
    -> Vec<String>;
}

/// The default sampler: every mode, backed directly by the index.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexWalker;

impl WalkSampler for IndexWalker {
    fn name(&self) -> &str {
        "index-walker"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn walks(
        &self,
        index: &TripleIndex,
        mode: WalkMode,
        entity: SymbolId,
        settings: &WalkSettings,
        rng: &mut dyn RngCore,
    ) -> Vec<String> {
        if !index.is_node(entity) {
            return Vec::new();
        }
        if settings.depth == 0 {
            return vec![index.label(entity).to_owned()];
        }

        let n = settings.walks_per_entity;
        let paths = match mode {
            WalkMode::RandomWalks => random::random_walks(index, entity, settings.depth, n, rng),
            WalkMode::RandomWalksDuplicateFree => {
                random::duplicate_free_random_walks(index, entity, settings.depth, n, rng)
            }
            WalkMode::MidWalks => mid::mid_walks(index, entity, settings.depth, n, rng),
            WalkMode::MidWalksDuplicateFree => {
                dedup_paths(mid::mid_walks(index, entity, settings.depth, n, rng))
            }
            WalkMode::MidWalksWeighted => mid::weighted_mid_walks(
                index,
                entity,
                settings.depth,
                n,
                settings.weighting,
                rng,
            ),
        };
        paths.iter().map(|path| path.render(index)).collect()
    }

    fn text_walks(
        &self,
        index: &TripleIndex,
        entity: SymbolId,
        settings: &WalkSettings,
    ) -> Vec<String> {
        text::text_walks(index, entity, settings.text_window)
    }
}
