//! Majority initial mapping.
//!
//! Qubits are placed in order of interaction degree, each on the free node
//! with the most neighbors. Ties on either side go to the smallest id, so
//! ancillas (degree zero, highest ids) are placed last.

use std::cmp::Reverse;

use tracing::trace;

use crate::error::CompileResult;
use crate::interaction::InteractionModel;
use crate::layout::{Layout, LayoutBuilder};
use crate::topology::Topology;

/// Bind the busiest free qubit to the best-connected free node until every
/// qubit is placed.
///
/// Both pools are re-scanned on every step; `n` is small next to circuit
/// length, so a heap buys nothing here.
pub fn majority_layout(
    interactions: &InteractionModel,
    topology: &Topology,
) -> CompileResult<Layout> {
    let mut builder = LayoutBuilder::new(topology.num_nodes());

    while builder.remaining() > 0 {
        let node = builder
            .free_nodes()
            .max_by_key(|&node| (topology.degree(node), Reverse(node)));
        let qubit = builder
            .free_qubits()
            .max_by_key(|&q| (interactions.degree(q), Reverse(q)));
        let (Some(node), Some(qubit)) = (node, qubit) else {
            break;
        };

        trace!("Mapping {qubit} to node {node}");
        builder.bind(qubit, node);
    }

    builder.finish()
}
