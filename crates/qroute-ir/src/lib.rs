//! qroute Circuit Representation
//!
//! The types the qroute mapper and router operate on. A circuit is an
//! ordered list of single- and two-qubit operations over logical qubits;
//! the routed result is an ordered list of operations over physical
//! topology nodes, with SWAPs made explicit.
//!
//! # Example
//!
//! ```rust
//! use qroute_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new(3);
//! circuit.single(0_u32, "h").unwrap();
//! circuit.two_qubit(0_u32, 1_u32).unwrap();
//! circuit.two_qubit(1_u32, 2_u32).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 3);
//! assert_eq!(circuit.num_two_qubit_ops(), 2);
//! assert!(circuit.operations()[1].touches(QubitId(1)));
//! ```
//!
//! Single-qubit payloads are generic: routing never inspects them, it only
//! moves them to whichever physical node holds their qubit at that point in
//! the program.

pub mod circuit;
pub mod error;
pub mod operation;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use operation::{Operation, PhysicalOperation};
pub use qubit::QubitId;
