//! Error types for the compilation crate.

use thiserror::Error;

/// Errors that can occur during mapping and routing.
///
/// All variants are fatal: compilation is a pure function of its inputs, so
/// retrying without changing the circuit, topology or configuration yields
/// the same error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] qroute_ir::IrError),

    /// The connectivity graph is empty, disconnected or self-contradictory.
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// The circuit needs more qubits than the topology has nodes.
    #[error("Circuit requires {required} qubits but topology only has {available} nodes")]
    InfeasibleMapping { required: u32, available: u32 },

    /// Unrecognized mapping strategy selector.
    #[error("Unknown mapping strategy '{0}' (expected random, majority or max_pairs)")]
    UnknownStrategy(String),

    /// Invalid compiler configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
