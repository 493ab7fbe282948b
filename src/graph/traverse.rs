//! Multi-hop graph traversal and subgraph extraction.
//!
//! Provides BFS-based traversal from seed nodes with a hop limit, following
//! outgoing edges only or both edge directions.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::symbol::SymbolId;

use super::EdgeId;
use super::index::TripleIndex;

/// Which edges a traversal follows from a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Outgoing edges only (node as subject).
    #[default]
    Forward,
    /// Outgoing and incoming edges.
    Both,
}

/// Configuration for a graph traversal.
#[derive(Debug, Clone)]
pub struct TraversalConfig {
    /// Maximum hop depth from seed nodes.
    pub max_depth: usize,
    /// Edge directions to follow.
    pub direction: Direction,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            direction: Direction::Forward,
        }
    }
}

/// Result of a multi-hop traversal.
#[derive(Debug, Clone, Default)]
pub struct TraversalResult {
    /// Arena ids of every edge discovered, each listed once.
    pub edges: Vec<EdgeId>,
    /// All nodes visited, seeds included.
    pub visited: HashSet<SymbolId>,
    /// Maximum depth actually reached.
    pub depth_reached: usize,
}

/// Perform a BFS traversal from seed nodes.
///
/// Collects every edge that lies on a path of at most `max_depth` hops from a
/// seed in the configured direction.
pub fn traverse_bfs(
    index: &TripleIndex,
    seeds: &[SymbolId],
    config: &TraversalConfig,
) -> TraversalResult {
    let mut visited: HashSet<SymbolId> = HashSet::new();
    let mut seen_edges: HashSet<EdgeId> = HashSet::new();
    let mut collected: Vec<EdgeId> = Vec::new();
    let mut depth_reached: usize = 0;

    // BFS queue: (node, current_depth)
    let mut queue: VecDeque<(SymbolId, usize)> = VecDeque::new();

    for &seed in seeds {
        if visited.insert(seed) {
            queue.push_back((seed, 0));
        }
    }

    while let Some((node, depth)) = queue.pop_front() {
        if depth >= config.max_depth {
            continue;
        }

        let outgoing = index.outgoing(node);
        let forward = outgoing
            .ids()
            .iter()
            .zip(outgoing.iter())
            .map(|(&id, edge)| (id, edge.object));

        let incoming = index.incoming(node);
        let backward = incoming
            .ids()
            .iter()
            .zip(incoming.iter())
            .map(|(&id, edge)| (id, edge.subject))
            .filter(|_| config.direction == Direction::Both);

        for (edge_id, neighbor) in forward.chain(backward) {
            if seen_edges.insert(edge_id) {
                collected.push(edge_id);
                depth_reached = depth_reached.max(depth + 1);
            }
            if visited.insert(neighbor) {
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    TraversalResult {
        edges: collected,
        visited,
        depth_reached,
    }
}

/// Extract the subgraph reachable from seeds within `max_depth` hops.
pub fn extract_subgraph(
    index: &TripleIndex,
    seeds: &[SymbolId],
    max_depth: usize,
    direction: Direction,
) -> TraversalResult {
    traverse_bfs(
        index,
        seeds,
        &TraversalConfig {
            max_depth,
            direction,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_chain_graph() -> TripleIndex {
        // A --r--> B --r--> C --r--> D
        let mut index = TripleIndex::new();
        index.add_edge("A", "r", "B");
        index.add_edge("B", "r", "C");
        index.add_edge("C", "r", "D");
        index
    }

    fn sym(index: &TripleIndex, label: &str) -> SymbolId {
        index.symbol(label).unwrap()
    }

    #[test]
    fn bfs_traversal_depth_1() {
        let index = build_chain_graph();
        let result = traverse_bfs(
            &index,
            &[sym(&index, "A")],
            &TraversalConfig {
                max_depth: 1,
                ..Default::default()
            },
        );

        assert_eq!(result.edges.len(), 1);
        assert!(result.visited.contains(&sym(&index, "A")));
        assert!(result.visited.contains(&sym(&index, "B")));
        assert_eq!(result.depth_reached, 1);
    }

    #[test]
    fn bfs_traversal_full_chain() {
        let index = build_chain_graph();
        let result = traverse_bfs(
            &index,
            &[sym(&index, "A")],
            &TraversalConfig {
                max_depth: 10,
                ..Default::default()
            },
        );

        assert_eq!(result.edges.len(), 3);
        assert_eq!(result.visited.len(), 4); // predicates are never visited
        assert_eq!(result.depth_reached, 3);
    }

    #[test]
    fn forward_ignores_incoming_edges() {
        let index = build_chain_graph();
        let result = extract_subgraph(&index, &[sym(&index, "C")], 5, Direction::Forward);
        assert_eq!(result.edges.len(), 1);
        assert!(!result.visited.contains(&sym(&index, "B")));
    }

    #[test]
    fn both_directions_reach_predecessors() {
        let index = build_chain_graph();
        let result = extract_subgraph(&index, &[sym(&index, "C")], 1, Direction::Both);
        // B -> C and C -> D
        assert_eq!(result.edges.len(), 2);
        assert!(result.visited.contains(&sym(&index, "B")));
        assert!(result.visited.contains(&sym(&index, "D")));
        assert!(!result.visited.contains(&sym(&index, "A")));
    }

    #[test]
    fn cycles_collect_each_edge_once() {
        let mut index = TripleIndex::new();
        index.add_edge("A", "r", "B");
        index.add_edge("B", "r", "A");
        let result = extract_subgraph(&index, &[sym(&index, "A")], 10, Direction::Both);
        assert_eq!(result.edges.len(), 2);
        assert_eq!(result.visited.len(), 2);
    }

    #[test]
    fn zero_depth_collects_nothing() {
        let index = build_chain_graph();
        let result = extract_subgraph(&index, &[sym(&index, "A")], 0, Direction::Both);
        assert!(result.edges.is_empty());
        assert_eq!(result.visited.len(), 1);
    }
}
