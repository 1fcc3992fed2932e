//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building or validating a circuit.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum IrError {
    /// An operation references a qubit outside `0..num_qubits`.
    #[error("Qubit {qubit} out of range for a circuit with {num_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Number of qubits declared by the circuit.
        num_qubits: u32,
    },

    /// A two-qubit operation uses the same qubit as control and target.
    #[error("Duplicate qubit {qubit} in two-qubit operation")]
    DuplicateQubit {
        /// The duplicated qubit.
        qubit: QubitId,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
