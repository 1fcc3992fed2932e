//! Logical and physical operations.
//!
//! A [`Circuit`](crate::Circuit) is a list of [`Operation`]s over logical
//! qubits. Routing turns it into a list of [`PhysicalOperation`]s over the
//! node indices of a device topology, with explicit SWAPs inserted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::qubit::QubitId;

/// An operation over logical qubits.
///
/// The payload of a single-qubit operation is opaque to routing: it is
/// carried through to the output unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation<P> {
    /// A single-qubit operation.
    Single {
        /// The qubit acted on.
        qubit: QubitId,
        /// Gate description, forwarded as-is.
        payload: P,
    },
    /// A two-qubit operation. Direction is preserved in the output, only
    /// adjacency is required.
    TwoQubit {
        /// Control qubit.
        control: QubitId,
        /// Target qubit.
        target: QubitId,
    },
}

impl<P> Operation<P> {
    /// Create a single-qubit operation.
    pub fn single(qubit: impl Into<QubitId>, payload: P) -> Self {
        Operation::Single {
            qubit: qubit.into(),
            payload,
        }
    }

    /// Create a two-qubit operation.
    pub fn two_qubit(control: impl Into<QubitId>, target: impl Into<QubitId>) -> Self {
        Operation::TwoQubit {
            control: control.into(),
            target: target.into(),
        }
    }

    /// Check if this is a two-qubit operation.
    #[inline]
    pub fn is_two_qubit(&self) -> bool {
        matches!(self, Operation::TwoQubit { .. })
    }

    /// The `(control, target)` pair of a two-qubit operation.
    #[inline]
    pub fn as_pair(&self) -> Option<(QubitId, QubitId)> {
        match *self {
            Operation::TwoQubit { control, target } => Some((control, target)),
            Operation::Single { .. } => None,
        }
    }

    /// Check whether the operation acts on `qubit`.
    pub fn touches(&self, qubit: QubitId) -> bool {
        match *self {
            Operation::Single { qubit: q, .. } => q == qubit,
            Operation::TwoQubit { control, target } => control == qubit || target == qubit,
        }
    }
}

/// An operation over physical topology nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalOperation<P> {
    /// A single-qubit operation placed on `node`.
    Single {
        /// Physical node.
        node: u32,
        /// Gate description copied from the input.
        payload: P,
    },
    /// A two-qubit operation on adjacent nodes.
    TwoQubit {
        /// Node holding the control qubit.
        control: u32,
        /// Node holding the target qubit.
        target: u32,
    },
    /// Exchange of the qubits held by two adjacent nodes.
    Swap {
        /// First node.
        a: u32,
        /// Second node.
        b: u32,
    },
}

impl<P> PhysicalOperation<P> {
    /// Check if this is an inserted SWAP.
    #[inline]
    pub fn is_swap(&self) -> bool {
        matches!(self, PhysicalOperation::Swap { .. })
    }

    /// The node pair of a two-node operation (two-qubit gate or SWAP).
    pub fn node_pair(&self) -> Option<(u32, u32)> {
        match *self {
            PhysicalOperation::TwoQubit { control, target } => Some((control, target)),
            PhysicalOperation::Swap { a, b } => Some((a, b)),
            PhysicalOperation::Single { .. } => None,
        }
    }
}

impl<P: fmt::Debug> fmt::Display for PhysicalOperation<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalOperation::Single { node, payload } => write!(f, "{payload:?} n{node}"),
            PhysicalOperation::TwoQubit { control, target } => {
                write!(f, "cx n{control}, n{target}")
            }
            PhysicalOperation::Swap { a, b } => write!(f, "swap n{a}, n{b}"),
        }
    }
}
