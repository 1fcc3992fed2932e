//! Logical-to-physical qubit mapping.

use serde::Serialize;

use qroute_ir::QubitId;

use crate::error::{CompileError, CompileResult};

/// A bijection between logical qubits and physical nodes.
///
/// Both directions are stored so lookups are O(1) either way. The only
/// mutation is [`Layout::swap_nodes`], which exchanges two entries in each
/// direction and therefore cannot break bijectivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    logical_to_physical: Vec<u32>,
    #[serde(skip)]
    physical_to_logical: Vec<u32>,
}

impl Layout {
    /// Create a trivial layout (logical qubit i -> node i).
    pub fn trivial(num_qubits: u32) -> Self {
        let identity: Vec<u32> = (0..num_qubits).collect();
        Self {
            logical_to_physical: identity.clone(),
            physical_to_logical: identity,
        }
    }

    /// Create a layout where logical qubit `i` sits on node `nodes[i]`.
    ///
    /// Fails if `nodes` is not a permutation of `0..nodes.len()`.
    pub fn from_physical(nodes: Vec<u32>) -> CompileResult<Self> {
        let n = nodes.len();
        let mut physical_to_logical = vec![u32::MAX; n];
        for (logical, &node) in nodes.iter().enumerate() {
            let slot = physical_to_logical.get_mut(node as usize).ok_or_else(|| {
                CompileError::InvalidConfiguration(format!(
                    "layout maps qubit {logical} to node {node}, outside 0..{n}"
                ))
            })?;
            if *slot != u32::MAX {
                return Err(CompileError::InvalidConfiguration(format!(
                    "layout maps both q{} and q{logical} to node {node}",
                    *slot
                )));
            }
            *slot = logical as u32;
        }
        Ok(Self {
            logical_to_physical: nodes,
            physical_to_logical,
        })
    }

    /// Node currently holding `qubit`.
    #[inline]
    pub fn physical(&self, qubit: QubitId) -> u32 {
        self.logical_to_physical[qubit.index()]
    }

    /// Logical qubit currently held by `node`.
    #[inline]
    pub fn logical(&self, node: u32) -> QubitId {
        QubitId(self.physical_to_logical[node as usize])
    }

    /// Exchange the logical qubits held by two nodes.
    pub fn swap_nodes(&mut self, a: u32, b: u32) {
        self.physical_to_logical.swap(a as usize, b as usize);
        self.logical_to_physical[self.physical_to_logical[a as usize] as usize] = a;
        self.logical_to_physical[self.physical_to_logical[b as usize] as usize] = b;
    }

    /// Number of mapped qubits (equal to the number of nodes).
    pub fn len(&self) -> usize {
        self.logical_to_physical.len()
    }

    /// Check if the layout is empty.
    pub fn is_empty(&self) -> bool {
        self.logical_to_physical.is_empty()
    }

    /// Node of every logical qubit, indexed by qubit.
    pub fn logical_to_physical(&self) -> &[u32] {
        &self.logical_to_physical
    }

    /// Iterate over `(logical, physical)` pairs in qubit order.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, u32)> + '_ {
        self.logical_to_physical
            .iter()
            .enumerate()
            .map(|(q, &p)| (QubitId::from(q), p))
    }

    /// Check that both directions agree and form a permutation.
    pub fn is_bijective(&self) -> bool {
        self.logical_to_physical.len() == self.physical_to_logical.len()
            && self.logical_to_physical.iter().enumerate().all(|(q, &p)| {
                self.physical_to_logical
                    .get(p as usize)
                    .is_some_and(|&back| back as usize == q)
            })
    }
}

/// Incrementally binds qubits to nodes while a mapping strategy runs.
///
/// Tracks which qubits and nodes are still free; [`LayoutBuilder::finish`]
/// turns a complete assignment into a [`Layout`].
#[derive(Debug, Clone)]
pub struct LayoutBuilder {
    assignment: Vec<Option<u32>>,
    node_taken: Vec<bool>,
    remaining: usize,
}

impl LayoutBuilder {
    /// Start with `n` free qubits and `n` free nodes.
    pub fn new(n: u32) -> Self {
        Self {
            assignment: vec![None; n as usize],
            node_taken: vec![false; n as usize],
            remaining: n as usize,
        }
    }

    /// Bind a free qubit to a free node.
    ///
    /// # Panics
    ///
    /// Panics if either side is already bound; strategies only ever pick
    /// from the free pools.
    pub fn bind(&mut self, qubit: QubitId, node: u32) {
        assert!(self.is_qubit_free(qubit), "{qubit} bound twice");
        assert!(self.is_node_free(node), "node {node} bound twice");
        self.assignment[qubit.index()] = Some(node);
        self.node_taken[node as usize] = true;
        self.remaining -= 1;
    }

    /// Check if `qubit` has not been bound yet.
    #[inline]
    pub fn is_qubit_free(&self, qubit: QubitId) -> bool {
        self.assignment[qubit.index()].is_none()
    }

    /// Check if `node` has not been bound yet.
    #[inline]
    pub fn is_node_free(&self, node: u32) -> bool {
        !self.node_taken[node as usize]
    }

    /// Free qubits, ascending.
    pub fn free_qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        (0..self.assignment.len())
            .map(QubitId::from)
            .filter(|&q| self.is_qubit_free(q))
    }

    /// Free nodes, ascending.
    pub fn free_nodes(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.node_taken.len() as u32).filter(|&node| self.is_node_free(node))
    }

    /// Number of qubits still to bind.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Finish the layout. Every qubit must be bound.
    pub fn finish(self) -> CompileResult<Layout> {
        let nodes = self
            .assignment
            .into_iter()
            .enumerate()
            .map(|(q, node)| {
                node.ok_or_else(|| {
                    CompileError::InvalidConfiguration(format!("qubit q{q} left unmapped"))
                })
            })
            .collect::<CompileResult<Vec<_>>>()?;
        Layout::from_physical(nodes)
    }
}
