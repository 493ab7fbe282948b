//! Mid walks: the start entity sits inside the walk.
//!
//! Each hop either prepends an incoming edge of the current first node or
//! appends an outgoing edge of the current last node. A direction without
//! candidates falls back to the other one; when neither has candidates the
//! walk stops early and is kept as it is.

use std::collections::VecDeque;

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};

use crate::graph::{Edge, EdgeView, TripleIndex};
use crate::symbol::SymbolId;

use super::{EdgeWeighting, WalkPath};

/// Growing walk with its two open ends.
struct MidWalk {
    tokens: VecDeque<SymbolId>,
    first: SymbolId,
    last: SymbolId,
}

impl MidWalk {
    fn new(start: SymbolId, depth: usize) -> Self {
        let mut tokens = VecDeque::with_capacity(1 + 2 * depth);
        tokens.push_back(start);
        Self {
            tokens,
            first: start,
            last: start,
        }
    }

    fn prepend(&mut self, edge: &Edge) {
        self.tokens.push_front(edge.predicate);
        self.tokens.push_front(edge.subject);
        self.first = edge.subject;
    }

    fn append(&mut self, edge: &Edge) {
        self.tokens.push_back(edge.predicate);
        self.tokens.push_back(edge.object);
        self.last = edge.object;
    }

    fn finish(self) -> WalkPath {
        WalkPath(self.tokens.into())
    }
}

fn has_neighbors(index: &TripleIndex, entity: SymbolId) -> bool {
    !index.outgoing(entity).is_empty() || !index.incoming(entity).is_empty()
}

fn pick<'a>(candidates: EdgeView<'a>, rng: &mut dyn RngCore) -> Option<&'a Edge> {
    candidates.get(rng.gen_range(0..candidates.len()))
}

/// Sample one mid walk of at most `depth` hops.
pub fn mid_walk(
    index: &TripleIndex,
    start: SymbolId,
    depth: usize,
    rng: &mut dyn RngCore,
) -> WalkPath {
    let mut walk = MidWalk::new(start, depth);
    for _ in 0..depth {
        let backward = index.incoming(walk.first);
        let forward = index.outgoing(walk.last);
        let go_forward = match (backward.is_empty(), forward.is_empty()) {
            (true, true) => break,
            (true, false) => true,
            (false, true) => false,
            (false, false) => rng.gen_bool(0.5),
        };
        if go_forward {
            if let Some(edge) = pick(forward, rng) {
                walk.append(edge);
            }
        } else if let Some(edge) = pick(backward, rng) {
            walk.prepend(edge);
        }
    }
    walk.finish()
}

/// `count` independent mid walks; isolated entities yield none.
pub fn mid_walks(
    index: &TripleIndex,
    start: SymbolId,
    depth: usize,
    count: usize,
    rng: &mut dyn RngCore,
) -> Vec<WalkPath> {
    if !has_neighbors(index, start) {
        return Vec::new();
    }
    (0..count)
        .map(|_| mid_walk(index, start, depth, &mut *rng))
        .collect()
}

/// Sample one mid walk drawing each hop from the weighted union of backward
/// and forward candidates.
///
/// With uniform weights the chance of extending in a direction is
/// proportional to its number of candidates. When every candidate has the
/// same weight, or the weights cannot form a distribution, the draw is
/// uniform over all candidates.
pub fn weighted_mid_walk(
    index: &TripleIndex,
    start: SymbolId,
    depth: usize,
    weighting: EdgeWeighting,
    rng: &mut dyn RngCore,
) -> WalkPath {
    let mut walk = MidWalk::new(start, depth);
    let mut weights: Vec<f64> = Vec::new();
    for _ in 0..depth {
        let backward = index.incoming(walk.first);
        let forward = index.outgoing(walk.last);
        let total = backward.len() + forward.len();
        if total == 0 {
            break;
        }

        weights.clear();
        weights.extend(
            backward
                .iter()
                .chain(forward.iter())
                .map(|edge| weighting.weight(index, edge)),
        );
        let choice = draw(&weights, rng);

        if choice < backward.len() {
            if let Some(edge) = backward.get(choice) {
                walk.prepend(edge);
            }
        } else if let Some(edge) = forward.get(choice - backward.len()) {
            walk.append(edge);
        }
    }
    walk.finish()
}

/// `count` independent weighted mid walks; isolated entities yield none.
pub fn weighted_mid_walks(
    index: &TripleIndex,
    start: SymbolId,
    depth: usize,
    count: usize,
    weighting: EdgeWeighting,
    rng: &mut dyn RngCore,
) -> Vec<WalkPath> {
    if !has_neighbors(index, start) {
        return Vec::new();
    }
    (0..count)
        .map(|_| weighted_mid_walk(index, start, depth, weighting, &mut *rng))
        .collect()
}

/// Index drawn from `weights` (non-empty).
fn draw(weights: &[f64], rng: &mut dyn RngCore) -> usize {
    let uniform = weights.windows(2).all(|pair| pair[0] == pair[1]);
    if !uniform {
        if let Ok(distribution) = WeightedIndex::new(weights) {
            return distribution.sample(rng);
        }
    }
    rng.gen_range(0..weights.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn seeded_rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(7)
    }

    /// X → A → Y → Z, plus W → X
    fn chain() -> TripleIndex {
        let mut index = TripleIndex::new();
        index.add_edge("W", "p", "X");
        index.add_edge("X", "p", "A");
        index.add_edge("A", "p", "Y");
        index.add_edge("Y", "p", "Z");
        index
    }

    fn contains_entity(walk: &WalkPath, entity: SymbolId) -> bool {
        walk.0.iter().step_by(2).any(|&id| id == entity)
    }

    #[test]
    fn mid_walks_respect_depth_and_contain_start() {
        let index = chain();
        let a = index.symbol("A").unwrap();
        let mut rng = seeded_rng();
        for depth in 0..4 {
            for walk in mid_walks(&index, a, depth, 20, &mut rng) {
                assert!(walk.hops() <= depth);
                assert!(contains_entity(&walk, a));
                assert_eq!(walk.0.len() % 2, 1);
            }
        }
    }

    #[test]
    fn walks_are_contiguous_paths() {
        let index = chain();
        let a = index.symbol("A").unwrap();
        for walk in mid_walks(&index, a, 3, 30, &mut seeded_rng()) {
            let line = walk.render(&index);
            assert!(
                "W p X p A p Y p Z".contains(&line),
                "walk {line} is not a sub-path of the chain"
            );
        }
    }

    #[test]
    fn only_incoming_edges_truncate_forward() {
        // A has no outgoing edges: walks extend backwards only and end at A.
        let mut index = TripleIndex::new();
        index.add_edge("B", "p", "A");
        let a = index.symbol("A").unwrap();
        let walks = mid_walks(&index, a, 4, 5, &mut seeded_rng());
        assert_eq!(walks.len(), 5);
        for walk in walks {
            assert_eq!(walk.render(&index), "B p A");
        }
    }

    #[test]
    fn only_outgoing_edges_truncate_backward() {
        let mut index = TripleIndex::new();
        index.add_edge("A", "p", "B");
        let a = index.symbol("A").unwrap();
        for walk in weighted_mid_walks(&index, a, 3, 5, EdgeWeighting::default(), &mut seeded_rng()) {
            assert_eq!(walk.render(&index), "A p B");
        }
    }

    #[test]
    fn isolated_entity_yields_no_walks() {
        let mut index = TripleIndex::new();
        index.add_edge("A", "p", "B");
        index.add_literal("Lonely", "label", "alone");
        let lonely = index.symbol("Lonely").unwrap();
        assert!(mid_walks(&index, lonely, 3, 5, &mut seeded_rng()).is_empty());
        assert!(
            weighted_mid_walks(&index, lonely, 3, 5, EdgeWeighting::Uniform, &mut seeded_rng())
                .is_empty()
        );
    }

    #[test]
    fn weighted_walks_prefer_rare_predicates() {
        // S has 9 outgoing `common` edges and one `rare` edge. Each `common`
        // edge weighs 1/9 so the single `rare` edge holds half of the mass.
        let mut index = TripleIndex::new();
        for i in 0..9 {
            index.add_edge("S", "common", &format!("C{i}"));
        }
        index.add_edge("S", "rare", "R");
        let s = index.symbol("S").unwrap();
        let rare = index.symbol("rare").unwrap();

        let mut rng = seeded_rng();
        let walks = weighted_mid_walks(
            &index,
            s,
            1,
            400,
            EdgeWeighting::InversePredicateFrequency,
            &mut rng,
        );
        let rare_hits = walks.iter().filter(|w| w.0.contains(&rare)).count();
        // Uniform choice would give ~40 hits; weighted gives ~200.
        assert!(rare_hits > 120, "only {rare_hits} of 400 walks took the rare edge");
    }

    #[test]
    fn draw_falls_back_to_uniform() {
        let mut rng = seeded_rng();
        for _ in 0..50 {
            assert!(draw(&[1.0, 1.0, 1.0], &mut rng) < 3);
        }
        // A zero-only vector cannot form a distribution.
        assert!(draw(&[0.0, 0.0], &mut rng) < 2);
        // NaN weights are rejected by WeightedIndex.
        assert!(draw(&[f64::NAN, 1.0], &mut rng) < 2);
    }
}
