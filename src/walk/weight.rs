//! Edge weighting schemes for weighted mid walks.

use serde::{Deserialize, Serialize};

use crate::graph::{Edge, TripleIndex};

/// How much probability mass an edge candidate receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeWeighting {
    /// `1 / n` where `n` is the number of edges carrying the same predicate,
    /// so rare relations are preferred over ubiquitous ones like `rdf:type`.
    #[default]
    InversePredicateFrequency,
    /// Every edge weighs 1.
    Uniform,
}

impl EdgeWeighting {
    /// Weight of `edge` under this scheme. Always finite and positive for an
    /// edge stored in `index`.
    pub fn weight(self, index: &TripleIndex, edge: &Edge) -> f64 {
        match self {
            EdgeWeighting::Uniform => 1.0,
            EdgeWeighting::InversePredicateFrequency => {
                let frequency = index.predicate_frequency(edge.predicate).max(1);
                1.0 / frequency as f64
            }
        }
    }
}
