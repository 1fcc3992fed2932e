//! qroute Mapping and Routing
//!
//! Compiles circuits onto devices with fixed, undirected qubit connectivity.
//! Two-qubit operations may only act on adjacent physical nodes, so the
//! compiler first chooses an initial placement of logical qubits on nodes
//! and then inserts SWAPs wherever an operation's qubits have drifted apart.
//!
//! # Overview
//!
//! ```text
//! Circuit<P> + Topology
//!       │
//!       ▼
//! MappingStrategy ──► φ₀ ──► route first k ops ──► φ₁
//!       │                                          │
//!       ├──────── route full circuit from φ₀ ◄─────┤
//!       └──────── route full circuit from φ₁ ◄─────┘
//!       │
//!       ▼
//! CompiledCircuit<P> (fewer SWAPs wins, φ₀ on ties)
//! ```
//!
//! - [`Topology`]: connectivity graph with all-pairs shortest paths
//! - [`InteractionModel`]: how often each pair of qubits interacts
//! - [`MappingStrategy`]: `random`, `majority` or `max_pairs` initial layouts
//! - [`Router`]: SWAP insertion guided by a [`LookaheadHeuristic`]
//! - [`Compiler`]: the driver, configured by a [`CompileConfig`]
//!
//! # Example
//!
//! ```rust
//! use qroute_compile::{CompileConfig, Compiler, MappingStrategy, Topology};
//! use qroute_ir::Circuit;
//!
//! let mut circuit = Circuit::new(3);
//! circuit.single(0_u32, "h").unwrap();
//! circuit.two_qubit(0_u32, 2_u32).unwrap();
//! circuit.two_qubit(1_u32, 2_u32).unwrap();
//!
//! let topology = Topology::linear(5).unwrap();
//! let config = CompileConfig::default()
//!     .with_strategy(MappingStrategy::MaxPairs)
//!     .with_seed(42);
//!
//! let compiled = Compiler::new(config).compile(&circuit, &topology).unwrap();
//! assert_eq!(compiled.num_qubits, 5);
//! for op in &compiled.operations {
//!     if let Some((a, b)) = op.node_pair() {
//!         assert!(topology.is_adjacent(a, b));
//!     }
//! }
//! ```

pub mod compiler;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod mapping;
pub mod routing;
pub mod topology;

pub use compiler::{
    CompileConfig, CompiledCircuit, Compiler, compile, default_simulation_depth,
};
pub use error::{CompileError, CompileResult};
pub use interaction::InteractionModel;
pub use layout::{Layout, LayoutBuilder};
pub use mapping::{MappingOptions, MappingStrategy};
pub use routing::{LookaheadHeuristic, Movement, Router, RoutingOutcome, ScheduledSwap};
pub use topology::{Topology, TopologyDescription};
