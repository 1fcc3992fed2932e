//! SWAP-insertion routing.
//!
//! The [`Router`] replays a circuit against a [`Layout`], emitting every
//! operation on the physical nodes its qubits currently occupy. When a
//! two-qubit operation lands on non-adjacent nodes, the endpoints are walked
//! toward each other along the topology's canonical shortest path, one SWAP
//! per hop, until they are adjacent. The [`LookaheadHeuristic`] decides which
//! endpoint walks.
//!
//! SWAPs appear in the output immediately before the operation that needed
//! them; every other operation keeps its relative order.

pub mod lookahead;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use qroute_ir::{Circuit, Operation, PhysicalOperation, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::layout::Layout;
use crate::topology::Topology;

pub use lookahead::{LookaheadHeuristic, Movement};

/// A SWAP inserted by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSwap {
    /// Index, in the input circuit, of the operation that required it.
    pub position: usize,
    pub node_a: u32,
    pub node_b: u32,
}

/// Result of routing a full circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingOutcome<P> {
    /// Physical operations, SWAPs included, in program order.
    pub operations: Vec<PhysicalOperation<P>>,
    /// Every inserted SWAP with its position in the input.
    pub schedule: Vec<ScheduledSwap>,
}

impl<P> RoutingOutcome<P> {
    /// Number of inserted SWAPs.
    pub fn swap_count(&self) -> usize {
        self.schedule.len()
    }
}

/// Routes circuits on one topology with one heuristic configuration.
#[derive(Debug, Clone, Copy)]
pub struct Router<'a> {
    topology: &'a Topology,
    heuristic: LookaheadHeuristic,
}

impl<'a> Router<'a> {
    /// Create a router.
    pub fn new(topology: &'a Topology, heuristic: LookaheadHeuristic) -> Self {
        Self {
            topology,
            heuristic,
        }
    }

    /// Route the whole circuit, mutating `layout` in place.
    ///
    /// On return `layout` is the final mapping; copy it beforehand to keep
    /// the initial one. `rng` is only drawn from when the heuristic finds
    /// no dominant endpoint.
    #[instrument(skip_all, fields(ops = circuit.len()))]
    pub fn route<P: Clone, R: Rng + ?Sized>(
        &self,
        circuit: &Circuit<P>,
        layout: &mut Layout,
        rng: &mut R,
    ) -> CompileResult<RoutingOutcome<P>> {
        self.check_sizes(circuit, layout)?;

        let pairs: Vec<(QubitId, QubitId)> = circuit.two_qubit_pairs().collect();
        let mut operations = Vec::with_capacity(circuit.len());
        let mut schedule = Vec::new();
        let mut pair_index = 0;

        for (position, op) in circuit.operations().iter().enumerate() {
            match op {
                Operation::Single { qubit, payload } => {
                    operations.push(PhysicalOperation::Single {
                        node: layout.physical(*qubit),
                        payload: payload.clone(),
                    });
                }
                Operation::TwoQubit { control, target } => {
                    self.resolve(&pairs, pair_index, layout, rng, |a, b| {
                        operations.push(PhysicalOperation::Swap { a, b });
                        schedule.push(ScheduledSwap {
                            position,
                            node_a: a,
                            node_b: b,
                        });
                    });
                    pair_index += 1;

                    let (c, t) = (layout.physical(*control), layout.physical(*target));
                    assert!(
                        self.topology.is_adjacent(c, t),
                        "routing left {control}/{target} on non-adjacent nodes {c}, {t}"
                    );
                    operations.push(PhysicalOperation::TwoQubit {
                        control: c,
                        target: t,
                    });
                }
            }
        }

        info!(
            "Routed {} two-qubit operations with {} swaps",
            pairs.len(),
            schedule.len()
        );

        Ok(RoutingOutcome {
            operations,
            schedule,
        })
    }

    /// Route only the first `limit` two-qubit operations and return the
    /// number of SWAPs needed. `layout` ends up as the mapping after that
    /// prefix. The lookahead window never reaches past the prefix.
    /// Single-qubit operations have no effect on routing and are skipped.
    #[instrument(skip_all, fields(limit = limit))]
    pub fn route_prefix<P, R: Rng + ?Sized>(
        &self,
        circuit: &Circuit<P>,
        layout: &mut Layout,
        limit: usize,
        rng: &mut R,
    ) -> CompileResult<usize> {
        self.check_sizes(circuit, layout)?;

        let pairs: Vec<(QubitId, QubitId)> = circuit.two_qubit_pairs().take(limit).collect();
        let mut swaps = 0;
        for index in 0..pairs.len() {
            self.resolve(&pairs, index, layout, rng, |_, _| swaps += 1);
        }

        debug!("Prefix of {limit} two-qubit operations needed {swaps} swaps");
        Ok(swaps)
    }

    /// Make `pairs[index]` executable, reporting each SWAP to `emit` after
    /// applying it to `layout`.
    fn resolve<R: Rng + ?Sized>(
        &self,
        pairs: &[(QubitId, QubitId)],
        index: usize,
        layout: &mut Layout,
        rng: &mut R,
        emit: impl FnMut(u32, u32),
    ) {
        let (control, target) = pairs[index];
        let (u, v) = (layout.physical(control), layout.physical(target));
        if self.topology.is_adjacent(u, v) {
            return;
        }

        let movement = self.heuristic.choose(pairs, index, rng);
        debug!(
            "{control}@{u} and {target}@{v} at distance {}: {movement:?}",
            self.topology.distance(u, v)
        );
        self.walk(layout, control, target, movement, emit);
    }

    /// Bring `control` and `target` next to each other along the canonical
    /// shortest path. The control's hops are applied first, then the
    /// target's, walking in from the far end of the path.
    fn walk(
        &self,
        layout: &mut Layout,
        control: QubitId,
        target: QubitId,
        movement: Movement,
        mut emit: impl FnMut(u32, u32),
    ) {
        let path = self
            .topology
            .shortest_path(layout.physical(control), layout.physical(target));
        let (control_hops, target_hops) = movement.split(path.len().saturating_sub(2));

        let forward = path.windows(2).take(control_hops).map(|w| (w[0], w[1]));
        let backward = path.windows(2).rev().take(target_hops).map(|w| (w[1], w[0]));
        for (a, b) in forward.chain(backward) {
            assert!(
                self.topology.is_adjacent(a, b),
                "swap between non-adjacent nodes {a}, {b}"
            );
            layout.swap_nodes(a, b);
            debug_assert!(layout.is_bijective());
            trace!("swap n{a}, n{b}");
            emit(a, b);
        }
    }

    fn check_sizes<P>(&self, circuit: &Circuit<P>, layout: &Layout) -> CompileResult<()> {
        let n = self.topology.num_nodes() as usize;
        if layout.len() != n {
            return Err(CompileError::InvalidConfiguration(format!(
                "layout covers {} qubits but topology has {n} nodes",
                layout.len()
            )));
        }
        if circuit.num_qubits() as usize > n {
            return Err(CompileError::InfeasibleMapping {
                required: circuit.num_qubits(),
                available: self.topology.num_nodes(),
            });
        }
        Ok(())
    }
}
