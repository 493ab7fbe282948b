//! Forward random walks.
//!
//! A walk starts at the entity and follows a uniformly drawn outgoing edge
//! per hop, recording the predicate and the object. It ends early at a node
//! without outgoing edges; such truncated walks are kept.

use std::collections::HashSet;

use rand::{Rng, RngCore};

use crate::graph::TripleIndex;
use crate::symbol::SymbolId;

use super::WalkPath;

/// Sample one forward walk of at most `depth` hops.
pub fn random_walk(
    index: &TripleIndex,
    start: SymbolId,
    depth: usize,
    rng: &mut dyn RngCore,
) -> WalkPath {
    let mut path = Vec::with_capacity(1 + 2 * depth);
    path.push(start);
    let mut current = start;
    for _ in 0..depth {
        let candidates = index.outgoing(current);
        if candidates.is_empty() {
            break;
        }
        let Some(edge) = candidates.get(rng.gen_range(0..candidates.len())) else {
            break;
        };
        path.push(edge.predicate);
        path.push(edge.object);
        current = edge.object;
    }
    WalkPath(path)
}

/// `count` independent forward walks; duplicates are kept.
pub fn random_walks(
    index: &TripleIndex,
    start: SymbolId,
    depth: usize,
    count: usize,
    rng: &mut dyn RngCore,
) -> Vec<WalkPath> {
    if index.outgoing(start).is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| random_walk(index, start, depth, &mut *rng))
        .collect()
}

/// Up to `count` distinct forward walks, sampled without replacement.
///
/// Each hop draws uniformly among the outgoing edges that still lead to an
/// unseen walk, so every draw yields a new sequence. When the start entity
/// has fewer than `count` reachable walks, all of them are returned.
/// Sequences are returned in the order they were drawn.
pub fn duplicate_free_random_walks(
    index: &TripleIndex,
    start: SymbolId,
    depth: usize,
    count: usize,
    rng: &mut dyn RngCore,
) -> Vec<WalkPath> {
    if index.outgoing(start).is_empty() {
        return Vec::new();
    }

    let mut used = UsedPrefixes::default();
    let mut walks = Vec::with_capacity(count);
    let mut path = Vec::with_capacity(1 + 2 * depth);
    let mut open = Vec::new();
    while walks.len() < count && !used.contains(&[start]) {
        path.clear();
        path.push(start);
        let mut current = start;
        for _ in 0..depth {
            open.clear();
            for edge in index.outgoing(current).iter() {
                if !used.contains_step(&mut path, edge.predicate, edge.object) {
                    open.push(edge);
                }
            }
            if open.is_empty() {
                break;
            }
            let edge = open[rng.gen_range(0..open.len())];
            path.push(edge.predicate);
            path.push(edge.object);
            current = edge.object;
        }
        used.close(index, &path);
        walks.push(WalkPath(path.clone()));
    }
    if walks.len() < count {
        tracing::trace!(
            entity = index.label(start),
            requested = count,
            found = walks.len(),
            "fewer distinct walks reachable than requested"
        );
    }
    walks
}

/// Walk prefixes with no unseen continuation left.
#[derive(Default)]
struct UsedPrefixes(HashSet<Vec<SymbolId>>);

impl UsedPrefixes {
    fn contains(&self, prefix: &[SymbolId]) -> bool {
        self.0.contains(prefix)
    }

    /// Whether `path` extended by one hop is used up; `path` is restored.
    fn contains_step(
        &self,
        path: &mut Vec<SymbolId>,
        predicate: SymbolId,
        object: SymbolId,
    ) -> bool {
        path.push(predicate);
        path.push(object);
        let used = self.contains(path);
        path.truncate(path.len() - 2);
        used
    }

    /// Mark a drawn walk as used, then every prefix whose continuations are
    /// now all used.
    fn close(&mut self, index: &TripleIndex, walk: &[SymbolId]) {
        self.0.insert(walk.to_vec());
        let mut prefix = walk.to_vec();
        while prefix.len() > 1 {
            prefix.truncate(prefix.len() - 2);
            let Some(&node) = prefix.last() else {
                break;
            };
            let exhausted = index
                .outgoing(node)
                .iter()
                .all(|edge| self.contains_step(&mut prefix, edge.predicate, edge.object));
            if !exhausted {
                break;
            }
            self.0.insert(prefix.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn seeded_rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(42)
    }

    /// A→B→C, A→D
    fn small_graph() -> TripleIndex {
        let mut index = TripleIndex::new();
        index.add_edge("A", "p", "B");
        index.add_edge("B", "p", "C");
        index.add_edge("A", "p", "D");
        index
    }

    #[test]
    fn walks_start_at_entity_and_follow_edges() {
        let index = small_graph();
        let a = index.symbol("A").unwrap();
        let mut rng = seeded_rng();
        for _ in 0..20 {
            let walk = random_walk(&index, a, 2, &mut rng);
            assert_eq!(walk.0[0], a);
            assert!(walk.hops() <= 2);
            let line = walk.render(&index);
            assert!(line == "A p B p C" || line == "A p D", "unexpected walk {line}");
        }
    }

    #[test]
    fn plain_walks_keep_duplicates() {
        let mut index = TripleIndex::new();
        index.add_edge("A", "p", "B");
        let a = index.symbol("A").unwrap();
        let walks = random_walks(&index, a, 3, 4, &mut seeded_rng());
        assert_eq!(walks.len(), 4);
        assert!(walks.iter().all(|w| w.render(&index) == "A p B"));
    }

    #[test]
    fn duplicate_free_is_bounded_by_fan_out() {
        let index = small_graph();
        let a = index.symbol("A").unwrap();
        let walks = duplicate_free_random_walks(&index, a, 2, 5, &mut seeded_rng());
        let mut lines: Vec<String> = walks.iter().map(|w| w.render(&index)).collect();
        lines.sort();
        assert_eq!(lines, vec!["A p B p C", "A p D"]);
    }

    #[test]
    fn duplicate_free_returns_exactly_n_with_enough_fan_out() {
        // Fan-out of 6 at both hops: 36 distinct two-hop walks.
        let mut index = TripleIndex::new();
        for i in 0..6 {
            let mid = format!("M{i}");
            index.add_edge("S", "p", &mid);
            for j in 0..6 {
                index.add_edge(&mid, "q", &format!("T{i}_{j}"));
            }
        }
        let s = index.symbol("S").unwrap();
        for n in [5, 36] {
            let walks = duplicate_free_random_walks(&index, s, 2, n, &mut seeded_rng());
            assert_eq!(walks.len(), n);
            let unique: HashSet<_> = walks.iter().collect();
            assert_eq!(unique.len(), n);
            assert!(walks.iter().all(|w| w.hops() == 2));
        }
        let all = duplicate_free_random_walks(&index, s, 2, 100, &mut seeded_rng());
        assert_eq!(all.len(), 36);
    }

    #[test]
    fn duplicate_free_exhausts_wide_star_for_every_seed() {
        let mut index = TripleIndex::new();
        for i in 0..1000 {
            index.add_edge("hub", "p", &format!("leaf{i}"));
        }
        let hub = index.symbol("hub").unwrap();
        for seed in 0..25 {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let walks = duplicate_free_random_walks(&index, hub, 1, 1000, &mut rng);
            assert_eq!(walks.len(), 1000, "seed {seed}");
            let unique: HashSet<_> = walks.iter().collect();
            assert_eq!(unique.len(), 1000, "seed {seed}");
        }
    }

    #[test]
    fn duplicate_free_handles_cycles_and_parallel_edges() {
        let mut index = TripleIndex::new();
        index.add_edge("A", "p", "B");
        index.add_edge("A", "p", "B");
        index.add_edge("B", "p", "A");
        let a = index.symbol("A").unwrap();
        let walks = duplicate_free_random_walks(&index, a, 3, 10, &mut seeded_rng());
        assert_eq!(walks.len(), 1);
        assert_eq!(walks[0].render(&index), "A p B p A p B");
    }

    #[test]
    fn duplicate_free_mixes_truncated_and_full_walks() {
        // A→B→C→E and a dead end A→D.
        let mut index = small_graph();
        index.add_edge("C", "p", "E");
        let a = index.symbol("A").unwrap();
        let walks = duplicate_free_random_walks(&index, a, 3, 10, &mut seeded_rng());
        let mut lines: Vec<String> = walks.iter().map(|w| w.render(&index)).collect();
        lines.sort();
        assert_eq!(lines, vec!["A p B p C p E", "A p D"]);
    }

    #[test]
    fn sinks_produce_no_walks() {
        let index = small_graph();
        let c = index.symbol("C").unwrap();
        assert!(random_walks(&index, c, 3, 10, &mut seeded_rng()).is_empty());
        assert!(duplicate_free_random_walks(&index, c, 3, 10, &mut seeded_rng()).is_empty());
    }
}
