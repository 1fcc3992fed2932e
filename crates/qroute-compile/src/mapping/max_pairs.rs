//! Max-interacting-pairs initial mapping.
//!
//! Grows clusters: a seed qubit goes on the free node with the most free
//! neighbors, and the qubits it interacts with most are placed on those
//! neighbors. Every placed neighbor then becomes a seed for its own free
//! neighbors. Pending `(node, qubit)` seeds live in a FIFO work-list rather
//! than on the call stack. When the work-list drains, a fresh cluster is
//! started wherever the most free room is left.
//!
//! All choices are deterministic: node ties go to the smallest id, qubit
//! ties to the larger interaction degree and then the smallest id, which
//! places ancillas last.

use std::cmp::Reverse;
use std::collections::VecDeque;

use tracing::trace;

use qroute_ir::QubitId;

use crate::error::CompileResult;
use crate::interaction::InteractionModel;
use crate::layout::{Layout, LayoutBuilder};
use crate::topology::Topology;

/// Compute a max-interacting-pairs layout with the given fan-out.
///
/// `fan_out` caps how many partners are placed around each seed; it is
/// further capped by the seed node's free neighbors.
pub fn max_pairs_layout(
    interactions: &InteractionModel,
    topology: &Topology,
    fan_out: usize,
) -> CompileResult<Layout> {
    let mut state = ClusterState {
        interactions,
        topology,
        fan_out,
        builder: LayoutBuilder::new(topology.num_nodes()),
    };
    let mut seeds: VecDeque<(u32, QubitId)> = VecDeque::new();

    while state.builder.remaining() > 0 {
        let (node, qubit) = match seeds.pop_front() {
            Some(seed) => seed,
            None => {
                let Some(seed) = state.fresh_seed() else {
                    break;
                };
                seed
            }
        };

        let mut node_pool = state.free_neighbors(node);
        let mut qubit_pool = state.top_partners(qubit, state.fan_out.min(node_pool.len()));

        while !node_pool.is_empty() && !qubit_pool.is_empty() {
            let neighbor = state.roomiest_node(node_pool.iter().copied());
            let room = state.fan_out.min(state.free_neighbors(neighbor).len());
            let partner = state.best_qubit(qubit_pool.iter().copied(), room);

            trace!("Placing {partner} next to {qubit} on node {neighbor}");
            state.builder.bind(partner, neighbor);
            node_pool.retain(|&n| n != neighbor);
            qubit_pool.retain(|&q| q != partner);
            seeds.push_back((neighbor, partner));
        }
    }

    state.builder.finish()
}

struct ClusterState<'a> {
    interactions: &'a InteractionModel,
    topology: &'a Topology,
    fan_out: usize,
    builder: LayoutBuilder,
}

impl ClusterState<'_> {
    /// Start a new cluster: pick and bind the roomiest free node and the
    /// best-scoring free qubit.
    fn fresh_seed(&mut self) -> Option<(u32, QubitId)> {
        let free_nodes: Vec<u32> = self.builder.free_nodes().collect();
        if free_nodes.is_empty() {
            return None;
        }
        let node = self.roomiest_node(free_nodes.into_iter());
        let room = self.fan_out.min(self.free_neighbors(node).len());

        let free_qubits: Vec<QubitId> = self.builder.free_qubits().collect();
        if free_qubits.is_empty() {
            return None;
        }
        let qubit = self.best_qubit(free_qubits.into_iter(), room);

        trace!("Seeding cluster with {qubit} on node {node}");
        self.builder.bind(qubit, node);
        Some((node, qubit))
    }

    fn free_neighbors(&self, node: u32) -> Vec<u32> {
        self.topology
            .neighbors(node)
            .iter()
            .copied()
            .filter(|&n| self.builder.is_node_free(n))
            .collect()
    }

    /// Node with the most free neighbors; smallest id on ties.
    fn roomiest_node(&self, candidates: impl Iterator<Item = u32>) -> u32 {
        candidates
            .max_by_key(|&n| (self.free_neighbors(n).len(), Reverse(n)))
            .unwrap_or_default()
    }

    /// Up to `k` free partners of `qubit`, strongest interaction first.
    fn top_partners(&self, qubit: QubitId, k: usize) -> Vec<QubitId> {
        self.interactions
            .ranked_partners(qubit)
            .into_iter()
            .filter(|&(q, _)| self.builder.is_qubit_free(q))
            .take(k)
            .map(|(q, _)| q)
            .collect()
    }

    /// Total weight to the `k` strongest free partners of `qubit`.
    fn score(&self, qubit: QubitId, k: usize) -> u32 {
        self.interactions
            .ranked_partners(qubit)
            .into_iter()
            .filter(|&(q, _)| self.builder.is_qubit_free(q))
            .take(k)
            .map(|(_, w)| w)
            .sum()
    }

    /// Candidate with the highest score, then highest degree, then
    /// smallest id.
    fn best_qubit(&self, candidates: impl Iterator<Item = QubitId>, k: usize) -> QubitId {
        candidates
            .max_by_key(|&q| (self.score(q, k), self.interactions.degree(q), Reverse(q)))
            .unwrap_or(QubitId(0))
    }
}
