//! Interaction weights between logical qubits.

use qroute_ir::{Circuit, QubitId};

/// Symmetric count of two-qubit operations between every pair of logical
/// qubits, derived in a single pass over the circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionModel {
    num_qubits: u32,
    weights: Vec<Vec<u32>>,
    degrees: Vec<u32>,
}

impl InteractionModel {
    /// Count interactions in `circuit`, sized for `num_qubits` qubits.
    ///
    /// `num_qubits` may exceed the circuit's own qubit count; the extra
    /// (ancilla) qubits get zero weight to everything.
    pub fn from_circuit<P>(circuit: &Circuit<P>, num_qubits: u32) -> Self {
        let n = num_qubits.max(circuit.num_qubits()) as usize;
        let mut weights = vec![vec![0_u32; n]; n];
        let mut degrees = vec![0_u32; n];

        for (control, target) in circuit.two_qubit_pairs() {
            let (c, t) = (control.index(), target.index());
            weights[c][t] += 1;
            weights[t][c] += 1;
            degrees[c] += 1;
            degrees[t] += 1;
        }

        Self {
            num_qubits: n as u32,
            weights,
            degrees,
        }
    }

    /// Number of qubits covered by the model.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of two-qubit operations between `a` and `b`.
    #[inline]
    pub fn weight(&self, a: QubitId, b: QubitId) -> u32 {
        self.weights[a.index()][b.index()]
    }

    /// Sum of the weights from `qubit` to every other qubit.
    #[inline]
    pub fn degree(&self, qubit: QubitId) -> u32 {
        self.degrees[qubit.index()]
    }

    /// Qubits interacting with `qubit`, by weight descending then id
    /// ascending. Zero-weight qubits are omitted.
    pub fn ranked_partners(&self, qubit: QubitId) -> Vec<(QubitId, u32)> {
        let mut ranked: Vec<_> = self.weights[qubit.index()]
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0)
            .map(|(q, &w)| (QubitId::from(q), w))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}
