//! Walk generation manager: drives one run from index to walk file.
//!
//! A run moves through [`RunState`]s in order:
//!
//! ```text
//! Idle ──load_index / with_index / load_scoped──▶ IndexBuilt ──generate──▶ Generating ──▶ Finalized
//! ```
//!
//! The index is built single-threaded and never mutated afterwards. During
//! generation a fixed-size rayon pool runs one task per entity; each task
//! samples its walks against the shared index and appends them to the shared
//! [`WalkSink`] as a single batch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::WalkConfig;
use crate::error::{ConfigError, KgWalkResult, ManagerError, SinkError};
use crate::graph::TripleIndex;
use crate::graph::source::GraphSource;
use crate::scope::{EntityList, ScopeReport, resolve_in_index, resolve_streaming};
use crate::sink::WalkSink;
use crate::walk::{Capability, WalkMode, WalkSampler, WalkSettings};

/// Lifecycle of a [`WalkGenerationManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    IndexBuilt,
    Generating,
    Finalized,
}

impl RunState {
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Idle => "Idle",
            RunState::IndexBuilt => "IndexBuilt",
            RunState::Generating => "Generating",
            RunState::Finalized => "Finalized",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Walk generation mode used.
    pub mode: WalkMode,
    /// Entities processed.
    pub entities: usize,
    /// Entities that contributed at least one walk.
    pub entities_with_walks: usize,
    /// Entities absent from the (possibly scoped) index.
    pub skipped_not_in_graph: usize,
    /// Entities present but without any eligible walk.
    pub skipped_no_walks: usize,
    /// Lines in the walk file.
    pub walks_written: u64,
    /// Path of the walk file.
    pub output: PathBuf,
    /// Wall-clock time of the generation phase.
    pub elapsed_ms: u64,
}

/// Orchestrates index construction and concurrent walk generation.
pub struct WalkGenerationManager {
    config: WalkConfig,
    mode: WalkMode,
    settings: WalkSettings,
    sampler: Box<dyn WalkSampler>,
    state: RunState,
    index: Option<TripleIndex>,
    requested: Option<Vec<String>>,
    scope: Option<ScopeReport>,
}

impl WalkGenerationManager {
    /// Manager for a run over the whole graph.
    ///
    /// Fails when the configuration is invalid or the sampler cannot produce
    /// the configured mode (or text walks, when enabled).
    pub fn new(config: WalkConfig, sampler: Box<dyn WalkSampler>) -> Result<Self, ConfigError> {
        Self::build(config, sampler, false)
    }

    /// Manager for a light run; only differs in the default mode.
    pub fn new_light(
        config: WalkConfig,
        sampler: Box<dyn WalkSampler>,
    ) -> Result<Self, ConfigError> {
        Self::build(config, sampler, true)
    }

    fn build(
        config: WalkConfig,
        sampler: Box<dyn WalkSampler>,
        light: bool,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mode = config.mode_for(light);
        let capabilities = sampler.capabilities();
        if !capabilities.supports(mode) {
            return Err(ConfigError::UnsupportedMode {
                sampler: sampler.name().to_owned(),
                mode: mode.to_string(),
            });
        }
        if config.embed_text && !capabilities.contains(Capability::TextWalks) {
            return Err(ConfigError::UnsupportedText {
                sampler: sampler.name().to_owned(),
            });
        }
        tracing::debug!(sampler = sampler.name(), %mode, light, "walk generation configured");
        Ok(Self {
            settings: config.settings(),
            config,
            mode,
            sampler,
            state: RunState::Idle,
            index: None,
            requested: None,
            scope: None,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn mode(&self) -> WalkMode {
        self.mode
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// The index walks are drawn from, once built.
    pub fn index(&self) -> Option<&TripleIndex> {
        self.index.as_ref()
    }

    /// Scoping outcome of a light run.
    pub fn scope_report(&self) -> Option<&ScopeReport> {
        self.scope.as_ref()
    }

    fn expect_state(&self, expected: RunState) -> Result<(), ManagerError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ManagerError::InvalidState {
                expected: expected.as_str(),
                actual: self.state.as_str(),
            })
        }
    }

    /// Use an index built elsewhere.
    pub fn with_index(&mut self, index: TripleIndex) -> Result<(), ManagerError> {
        self.expect_state(RunState::Idle)?;
        self.index = Some(index);
        self.state = RunState::IndexBuilt;
        Ok(())
    }

    /// Parse the whole graph source into the index.
    pub fn load_index(&mut self, source: &GraphSource) -> KgWalkResult<()> {
        self.expect_state(RunState::Idle)?;
        let index = source.load(&self.config.load_options())?;
        self.with_index(index)?;
        Ok(())
    }

    /// Stream the source and keep only the neighbourhood of `entities`.
    ///
    /// Later calls to [`generate`](Self::generate) without an explicit
    /// entity list process exactly `entities`.
    pub fn load_scoped(
        &mut self,
        source: &GraphSource,
        entities: &EntityList,
    ) -> KgWalkResult<&ScopeReport> {
        self.expect_state(RunState::Idle)?;
        let (index, report) = resolve_streaming(
            source,
            entities.as_slice(),
            self.config.depth,
            self.mode.direction(),
            &self.config.load_options(),
            self.config.embed_text,
        )?;
        Ok(self.install_scope(index, entities, report))
    }

    /// Scope an index already in memory to the neighbourhood of `entities`.
    pub fn with_scoped_index(
        &mut self,
        full: &TripleIndex,
        entities: &EntityList,
    ) -> Result<&ScopeReport, ManagerError> {
        self.expect_state(RunState::Idle)?;
        let (index, report) = resolve_in_index(
            full,
            entities.as_slice(),
            self.config.depth,
            self.mode.direction(),
            self.config.embed_text,
        );
        Ok(self.install_scope(index, entities, report))
    }

    fn install_scope(
        &mut self,
        index: TripleIndex,
        entities: &EntityList,
        report: ScopeReport,
    ) -> &ScopeReport {
        self.index = Some(index);
        self.requested = Some(entities.as_slice().to_vec());
        self.state = RunState::IndexBuilt;
        self.scope.insert(report)
    }

    /// Every node of the index, plus literal-only subjects when text walks
    /// are enabled, sorted by label.
    fn default_entities(&self, index: &TripleIndex) -> Vec<String> {
        let mut ids: Vec<_> = index.nodes().collect();
        if self.config.embed_text {
            ids.extend(index.literal_subjects().filter(|&id| !index.is_node(id)));
        }
        let mut labels: Vec<String> = ids.into_iter().map(|id| index.label(id).to_owned()).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Generate walks for `entities` (or the default working set) into
    /// `output` and finalize the run.
    ///
    /// Explicit entities may be given as full IRIs or already shortened.
    ///
    /// Per-entity gaps are counted in the summary. Only output failures and
    /// worker pool construction abort the run.
    pub fn generate(
        &mut self,
        entities: Option<&[String]>,
        output: &Path,
    ) -> KgWalkResult<RunSummary> {
        self.expect_state(RunState::IndexBuilt)?;
        let Some(index) = self.index.as_ref() else {
            return Err(ManagerError::InvalidState {
                expected: RunState::IndexBuilt.as_str(),
                actual: RunState::Idle.as_str(),
            }
            .into());
        };
        self.state = RunState::Generating;

        let working_set: Vec<String> = match (entities, self.requested.as_deref()) {
            (Some(explicit), _) => {
                let shortener = self.config.shortener();
                explicit
                    .iter()
                    .map(|entity| shortener.shorten(entity).into_owned())
                    .collect()
            }
            (None, Some(requested)) => requested.to_vec(),
            (None, None) => self.default_entities(index),
        };
        let threads = self.config.effective_threads();
        tracing::info!(
            mode = %self.mode,
            entities = working_set.len(),
            threads,
            depth = self.settings.depth,
            walks_per_entity = self.settings.walks_per_entity,
            "generating walks"
        );

        let started = Instant::now();
        let sink = WalkSink::create(output)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| ManagerError::ThreadPool {
                message: e.to_string(),
            })?;

        // Requested entities the scope found; the scoped index may still lack
        // them (e.g. only incoming edges under a forward mode).
        let found_in_scope: Option<HashSet<&str>> = self
            .scope
            .as_ref()
            .zip(self.requested.as_deref())
            .map(|(report, requested)| {
                let missing: HashSet<&str> = report.missing.iter().map(String::as_str).collect();
                requested
                    .iter()
                    .map(String::as_str)
                    .filter(|entity| !missing.contains(entity))
                    .collect()
            });

        let task = EntityTask {
            index,
            found_in_scope: found_in_scope.as_ref(),
            sampler: self.sampler.as_ref(),
            mode: self.mode,
            settings: &self.settings,
            embed_text: self.config.embed_text,
            unique_lines: self.config.unique_lines,
            seed: self.config.seed,
        };
        let with_walks = AtomicUsize::new(0);
        let not_in_graph = AtomicUsize::new(0);
        let no_walks = AtomicUsize::new(0);

        pool.install(|| {
            working_set.par_iter().try_for_each(|entity| {
                match task.run(entity) {
                    EntityOutcome::NotInGraph => {
                        tracing::debug!(%entity, "entity not in graph, skipped");
                        not_in_graph.fetch_add(1, Ordering::Relaxed);
                    }
                    EntityOutcome::NoWalks => {
                        tracing::debug!(%entity, "no walks for entity");
                        no_walks.fetch_add(1, Ordering::Relaxed);
                    }
                    EntityOutcome::Walks(lines) => {
                        sink.write_batch(&lines)?;
                        with_walks.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Ok::<(), SinkError>(())
            })
        })?;

        let walks_written = sink.lines_written();
        let path = sink.finish()?;
        self.state = RunState::Finalized;

        let summary = RunSummary {
            mode: self.mode,
            entities: working_set.len(),
            entities_with_walks: with_walks.into_inner(),
            skipped_not_in_graph: not_in_graph.into_inner(),
            skipped_no_walks: no_walks.into_inner(),
            walks_written,
            output: path,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        tracing::info!(
            entities = summary.entities,
            with_walks = summary.entities_with_walks,
            not_in_graph = summary.skipped_not_in_graph,
            no_walks = summary.skipped_no_walks,
            walks = summary.walks_written,
            output = %summary.output.display(),
            elapsed_ms = summary.elapsed_ms,
            "walk generation finished"
        );
        Ok(summary)
    }
}

impl std::fmt::Debug for WalkGenerationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkGenerationManager")
            .field("sampler", &self.sampler.name())
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("index", &self.index)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Per-entity task
// ---------------------------------------------------------------------------

enum EntityOutcome {
    NotInGraph,
    NoWalks,
    Walks(Vec<String>),
}

/// Everything a worker needs for one entity; shared by reference.
struct EntityTask<'a> {
    index: &'a TripleIndex,
    found_in_scope: Option<&'a HashSet<&'a str>>,
    sampler: &'a dyn WalkSampler,
    mode: WalkMode,
    settings: &'a WalkSettings,
    embed_text: bool,
    unique_lines: bool,
    seed: Option<u64>,
}

impl EntityTask<'_> {
    fn run(&self, entity: &str) -> EntityOutcome {
        let present = self.index.symbol(entity).filter(|&id| {
            self.index.is_node(id) || (self.embed_text && self.index.literals_of(id).is_some())
        });
        let Some(id) = present else {
            return if self
                .found_in_scope
                .is_some_and(|found| found.contains(entity))
            {
                EntityOutcome::NoWalks
            } else {
                EntityOutcome::NotInGraph
            };
        };

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(entity_seed(seed, entity))),
            None => Box::new(rand::thread_rng()),
        };
        let mut lines = self
            .sampler
            .walks(self.index, self.mode, id, self.settings, rng.as_mut());
        if self.embed_text {
            lines.extend(self.sampler.text_walks(self.index, id, self.settings));
        }
        if self.unique_lines {
            let mut seen = HashSet::with_capacity(lines.len());
            lines.retain(|line| seen.insert(line.clone()));
        }

        if lines.is_empty() {
            EntityOutcome::NoWalks
        } else {
            EntityOutcome::Walks(lines)
        }
    }
}

/// Per-entity seed: FNV-1a over the run seed and the entity label, so a
/// seeded run does not depend on which worker picks up which entity.
fn entity_seed(seed: u64, entity: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    seed.to_le_bytes()
        .iter()
        .chain(entity.as_bytes())
        .fold(OFFSET, |hash, &byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::{Capabilities, IndexWalker};
    use flate2::read::GzDecoder;
    use std::collections::HashMap;
    use std::io::Read;

    fn read_walks(path: &Path) -> Vec<String> {
        let mut text = String::new();
        GzDecoder::new(std::fs::File::open(path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        text.lines().map(str::to_owned).collect()
    }

    /// A sampler that can only produce plain random walks and echoes the
    /// entity label.
    struct EchoSampler;

    impl WalkSampler for EchoSampler {
        fn name(&self) -> &str {
            "echo"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::NONE.with(Capability::RandomWalks)
        }

        fn walks(
            &self,
            index: &TripleIndex,
            _mode: WalkMode,
            entity: crate::symbol::SymbolId,
            _settings: &WalkSettings,
            _rng: &mut dyn RngCore,
        ) -> Vec<String> {
            vec![format!("echo {}", index.label(entity))]
        }

        fn text_walks(
            &self,
            _index: &TripleIndex,
            _entity: crate::symbol::SymbolId,
            _settings: &WalkSettings,
        ) -> Vec<String> {
            Vec::new()
        }
    }

    fn config(mode: WalkMode) -> WalkConfig {
        WalkConfig {
            mode: Some(mode),
            threads: Some(2),
            ..Default::default()
        }
    }

    /// E0..E{n-1}, each with `fan_out` outgoing edges.
    fn star_graph(n: usize, fan_out: usize) -> TripleIndex {
        let mut index = TripleIndex::new();
        for i in 0..n {
            for j in 0..fan_out {
                index.add_edge(&format!("E{i}"), "p", &format!("T{i}_{j}"));
            }
        }
        index
    }

    #[test]
    fn rejects_unsupported_mode() {
        let err = WalkGenerationManager::new(config(WalkMode::MidWalks), Box::new(EchoSampler))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedMode { .. }));
    }

    #[test]
    fn rejects_unsupported_text() {
        let cfg = WalkConfig {
            embed_text: true,
            ..config(WalkMode::RandomWalks)
        };
        let err = WalkGenerationManager::new(cfg, Box::new(EchoSampler)).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedText { .. }));
    }

    #[test]
    fn light_manager_defaults_to_mid_walks() {
        let manager = WalkGenerationManager::new_light(
            WalkConfig::default(),
            Box::new(IndexWalker),
        )
        .unwrap();
        assert_eq!(manager.mode(), WalkMode::MidWalks);
        let manager =
            WalkGenerationManager::new(WalkConfig::default(), Box::new(IndexWalker)).unwrap();
        assert_eq!(manager.mode(), WalkMode::RandomWalksDuplicateFree);
    }

    #[test]
    fn out_of_order_calls_are_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("walks.gz");
        let mut manager =
            WalkGenerationManager::new(config(WalkMode::RandomWalks), Box::new(IndexWalker))
                .unwrap();

        let err = manager.generate(None, &out).unwrap_err();
        assert!(matches!(
            err,
            crate::error::KgWalkError::Manager(ManagerError::InvalidState { actual: "Idle", .. })
        ));

        manager.with_index(star_graph(2, 1)).unwrap();
        assert!(manager.with_index(star_graph(1, 1)).is_err());
        manager.generate(None, &out).unwrap();
        assert_eq!(manager.state(), RunState::Finalized);

        let err = manager.generate(None, &out).unwrap_err();
        assert!(matches!(
            err,
            crate::error::KgWalkError::Manager(ManagerError::InvalidState {
                actual: "Finalized",
                ..
            })
        ));
    }

    #[test]
    fn eight_threads_over_hundred_entities() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = WalkConfig {
            mode: Some(WalkMode::RandomWalks),
            depth: 1,
            walks_per_entity: 3,
            threads: Some(8),
            ..Default::default()
        };
        let mut manager = WalkGenerationManager::new(cfg, Box::new(IndexWalker)).unwrap();
        manager.with_index(star_graph(100, 4)).unwrap();
        let entities: Vec<String> = (0..100).map(|i| format!("E{i}")).collect();
        let summary = manager
            .generate(Some(&entities), &dir.path().join("walks.gz"))
            .unwrap();

        assert_eq!(summary.entities, 100);
        assert_eq!(summary.entities_with_walks, 100);
        assert_eq!(summary.walks_written, 300);

        let lines = read_walks(&summary.output);
        assert_eq!(lines.len(), 300);
        let mut per_entity: HashMap<String, usize> = HashMap::new();
        for line in &lines {
            let tokens: Vec<&str> = line.split(' ').collect();
            assert_eq!(tokens.len(), 3, "corrupted line {line:?}");
            let i = tokens[0].strip_prefix('E').unwrap();
            assert_eq!(tokens[1], "p");
            assert!(tokens[2].starts_with(&format!("T{i}_")), "line {line:?}");
            *per_entity.entry(tokens[0].to_owned()).or_default() += 1;
        }
        assert_eq!(per_entity.len(), 100);
        assert!(per_entity.values().all(|&n| n == 3));
    }

    #[test]
    fn skips_are_counted_not_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut manager =
            WalkGenerationManager::new(config(WalkMode::RandomWalks), Box::new(IndexWalker))
                .unwrap();
        manager.with_index(star_graph(1, 1)).unwrap();
        let entities = vec!["E0".to_owned(), "T0_0".to_owned(), "Ghost".to_owned()];
        let summary = manager
            .generate(Some(&entities), &dir.path().join("walks.gz"))
            .unwrap();
        assert_eq!(summary.entities_with_walks, 1);
        assert_eq!(summary.skipped_no_walks, 1);
        assert_eq!(summary.skipped_not_in_graph, 1);
    }

    #[test]
    fn default_working_set_includes_text_subjects() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = WalkConfig {
            embed_text: true,
            walks_per_entity: 1,
            depth: 1,
            ..config(WalkMode::RandomWalks)
        };
        let mut index = TripleIndex::new();
        index.add_edge("A", "p", "B");
        index.add_literal("Doc", "title", "Hello World");
        let mut manager = WalkGenerationManager::new(cfg, Box::new(IndexWalker)).unwrap();
        manager.with_index(index).unwrap();
        let summary = manager.generate(None, dir.path()).unwrap();

        assert_eq!(summary.entities, 3); // A, B, Doc
        assert_eq!(summary.output, dir.path().join(crate::sink::WALK_FILE_NAME));
        let mut lines = read_walks(&summary.output);
        lines.sort();
        assert_eq!(lines, vec!["A p B", "Doc title hello world"]);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let dir = tempfile::TempDir::new().unwrap();
        let run = |name: &str, threads: usize| {
            let cfg = WalkConfig {
                mode: Some(WalkMode::MidWalks),
                depth: 3,
                walks_per_entity: 5,
                threads: Some(threads),
                seed: Some(1234),
                ..Default::default()
            };
            let mut index = star_graph(20, 3);
            for i in 0..19 {
                index.add_edge(&format!("T{i}_0"), "q", &format!("E{}", i + 1));
            }
            let mut manager = WalkGenerationManager::new(cfg, Box::new(IndexWalker)).unwrap();
            manager.with_index(index).unwrap();
            let summary = manager.generate(None, &dir.path().join(name)).unwrap();
            let mut lines = read_walks(&summary.output);
            lines.sort();
            lines
        };
        assert_eq!(run("one.gz", 1), run("four.gz", 4));
    }

    #[test]
    fn unique_lines_removes_repeats() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = WalkConfig {
            unique_lines: true,
            walks_per_entity: 10,
            ..config(WalkMode::RandomWalks)
        };
        let mut manager = WalkGenerationManager::new(cfg, Box::new(IndexWalker)).unwrap();
        manager.with_index(star_graph(1, 1)).unwrap();
        let summary = manager
            .generate(Some(&["E0".to_owned()]), &dir.path().join("w.gz"))
            .unwrap();
        assert_eq!(summary.walks_written, 1);
    }

    #[test]
    fn scoped_run_processes_requested_entities_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut manager =
            WalkGenerationManager::new_light(config(WalkMode::MidWalks), Box::new(IndexWalker))
                .unwrap();
        let full = star_graph(10, 2);
        let entities = EntityList::new(["E3", "E7", "Nope"]);
        let report = manager.with_scoped_index(&full, &entities).unwrap();
        assert_eq!(report.missing, vec!["Nope".to_owned()]);

        let summary = manager.generate(None, &dir.path().join("w.gz")).unwrap();
        assert_eq!(summary.entities, 3);
        assert_eq!(summary.entities_with_walks, 2);
        assert_eq!(summary.skipped_not_in_graph, 1);
        for line in read_walks(&summary.output) {
            assert!(line.starts_with("E3 ") || line.starts_with("E7 "), "{line}");
        }
    }

    #[test]
    fn explicit_entities_are_shortened() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = WalkConfig {
            depth: 1,
            walks_per_entity: 2,
            ..config(WalkMode::RandomWalks)
        };
        let mut index = TripleIndex::new();
        index.add_edge("dbr:Paris", "dbo:country", "dbr:France");
        let mut manager = WalkGenerationManager::new(cfg, Box::new(IndexWalker)).unwrap();
        manager.with_index(index).unwrap();
        let entities = vec![
            "http://dbpedia.org/resource/Paris".to_owned(),
            "dbr:France".to_owned(),
        ];
        let summary = manager
            .generate(Some(&entities), &dir.path().join("w.gz"))
            .unwrap();
        assert_eq!(summary.entities_with_walks, 1);
        assert_eq!(summary.skipped_not_in_graph, 0);
        assert_eq!(summary.skipped_no_walks, 1);
        assert_eq!(
            read_walks(&summary.output),
            vec!["dbr:Paris dbo:country dbr:France"; 2]
        );
    }

    #[test]
    fn duplicate_free_random_walks_bounded_by_reachable_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = WalkConfig {
            depth: 2,
            walks_per_entity: 5,
            ..config(WalkMode::RandomWalksDuplicateFree)
        };
        let mut index = TripleIndex::new();
        index.add_edge("A", "p", "B");
        index.add_edge("B", "p", "C");
        index.add_edge("A", "p", "D");
        let mut manager = WalkGenerationManager::new(cfg, Box::new(IndexWalker)).unwrap();
        manager.with_index(index).unwrap();
        let summary = manager
            .generate(Some(&["A".to_owned()]), &dir.path().join("w.gz"))
            .unwrap();

        let lines = read_walks(&summary.output);
        let unique: HashSet<&String> = lines.iter().collect();
        assert!(lines.len() <= 2);
        assert_eq!(unique.len(), lines.len());
        assert!(lines.iter().all(|line| line.starts_with("A ")));
    }

    #[test]
    fn duplicate_free_mid_walks_never_repeat() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = WalkConfig {
            depth: 3,
            walks_per_entity: 50,
            seed: Some(5),
            ..config(WalkMode::MidWalksDuplicateFree)
        };
        let mut index = star_graph(1, 2);
        index.add_edge("In", "q", "E0");
        index.add_edge("T0_0", "r", "Out");
        let mut manager = WalkGenerationManager::new(cfg, Box::new(IndexWalker)).unwrap();
        manager.with_index(index).unwrap();
        let summary = manager
            .generate(Some(&["E0".to_owned()]), &dir.path().join("w.gz"))
            .unwrap();

        let lines = read_walks(&summary.output);
        assert!(!lines.is_empty());
        assert!(lines.len() < 50);
        let unique: HashSet<&String> = lines.iter().collect();
        assert_eq!(unique.len(), lines.len(), "repeated mid walk");
        for line in &lines {
            assert!(line.split(' ').step_by(2).any(|t| t == "E0"), "{line}");
        }
    }

    #[test]
    fn scoped_entity_without_forward_edges_counts_as_no_walks() {
        let dir = tempfile::TempDir::new().unwrap();
        let full = star_graph(2, 1);
        let entities = EntityList::new(["E0", "T1_0"]);

        let mut manager =
            WalkGenerationManager::new_light(config(WalkMode::RandomWalks), Box::new(IndexWalker))
                .unwrap();
        let report = manager.with_scoped_index(&full, &entities).unwrap();
        assert_eq!(report.found, 2);
        let scoped = manager
            .generate(None, &dir.path().join("scoped.gz"))
            .unwrap();

        let mut manager =
            WalkGenerationManager::new(config(WalkMode::RandomWalks), Box::new(IndexWalker))
                .unwrap();
        manager.with_index(full).unwrap();
        let whole = manager
            .generate(Some(entities.as_slice()), &dir.path().join("whole.gz"))
            .unwrap();

        for summary in [&scoped, &whole] {
            assert_eq!(summary.entities_with_walks, 1);
            assert_eq!(summary.skipped_no_walks, 1);
            assert_eq!(summary.skipped_not_in_graph, 0);
        }
    }

    #[test]
    fn entity_seed_depends_on_both_inputs() {
        assert_eq!(entity_seed(1, "A"), entity_seed(1, "A"));
        assert_ne!(entity_seed(1, "A"), entity_seed(2, "A"));
        assert_ne!(entity_seed(1, "A"), entity_seed(1, "B"));
    }
}
