//! Walk generation configuration, loadable from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration.
//! Command-line flags override individual fields after loading.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::graph::DuplicatePolicy;
use crate::graph::source::LoadOptions;
use crate::shorten::UriShortener;
use crate::walk::{EdgeWeighting, WalkMode, WalkSettings};

/// Immutable configuration of one walk generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Walk generation mode. When unset, [`mode_for`](Self::mode_for) picks
    /// the default for full or light runs.
    #[serde(default)]
    pub mode: Option<WalkMode>,
    /// Maximum hops per walk.
    #[serde(default = "default_depth")]
    pub depth: usize,
    /// Walks requested per entity.
    #[serde(default = "default_walks_per_entity")]
    pub walks_per_entity: usize,
    /// Worker threads; half the available cores when unset.
    #[serde(default)]
    pub threads: Option<usize>,
    /// Also emit walks over literal text.
    #[serde(default)]
    pub embed_text: bool,
    /// Sliding window over literal tokens.
    #[serde(default)]
    pub text_window: Option<usize>,
    /// Handling of repeated identical edges while loading.
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    /// Edge weights for `MID_WALKS_WEIGHTED`.
    #[serde(default)]
    pub weighting: EdgeWeighting,
    /// Rewrite identifiers to `code:local` tokens.
    #[serde(default = "default_shorten_uris")]
    pub shorten_uris: bool,
    /// Extra namespace → code pairs, on top of the built-in ones.
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    /// Run seed for reproducible output.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Drop repeated lines within one entity's batch.
    #[serde(default)]
    pub unique_lines: bool,
}

fn default_depth() -> usize {
    4
}
fn default_walks_per_entity() -> usize {
    100
}
fn default_shorten_uris() -> bool {
    true
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            mode: None,
            depth: default_depth(),
            walks_per_entity: default_walks_per_entity(),
            threads: None,
            embed_text: false,
            text_window: None,
            duplicate_policy: DuplicatePolicy::default(),
            weighting: EdgeWeighting::default(),
            shorten_uris: default_shorten_uris(),
            prefixes: BTreeMap::new(),
            seed: None,
            unique_lines: false,
        }
    }
}

impl WalkConfig {
    /// Load from a TOML file and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: WalkConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.walks_per_entity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "walks_per_entity",
                message: "must be greater than 0".into(),
            });
        }
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "threads",
                message: "must be greater than 0".into(),
            });
        }
        if self.text_window == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "text_window",
                message: "must be greater than 0 when set".into(),
            });
        }
        if let Some((namespace, _)) = self
            .prefixes
            .iter()
            .find(|(namespace, code)| namespace.is_empty() || code.is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "prefixes",
                message: format!("empty namespace or code in entry for `{namespace}`"),
            });
        }
        Ok(())
    }

    /// Worker threads to use: the configured count, or half the available
    /// cores (at least one).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            let cores = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            (cores / 2).max(1)
        })
    }

    /// The configured mode, or the default: duplicate-free random walks for
    /// full runs, mid walks in light mode.
    pub fn mode_for(&self, light: bool) -> WalkMode {
        self.mode.unwrap_or(if light {
            WalkMode::MidWalks
        } else {
            WalkMode::RandomWalksDuplicateFree
        })
    }

    /// Identifier shortener for this run.
    pub fn shortener(&self) -> UriShortener {
        if !self.shorten_uris {
            return UriShortener::disabled();
        }
        let mut shortener = UriShortener::with_defaults();
        shortener.extend(&self.prefixes);
        shortener
    }

    /// Sampling parameters handed to walk samplers.
    pub fn settings(&self) -> WalkSettings {
        WalkSettings {
            depth: self.depth,
            walks_per_entity: self.walks_per_entity,
            weighting: self.weighting,
            text_window: self.text_window,
        }
    }

    /// Options for loading a graph source under this configuration.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            duplicate_policy: self.duplicate_policy,
            shortener: self.shortener(),
        }
    }
}
