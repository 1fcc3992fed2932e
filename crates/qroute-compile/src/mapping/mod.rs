//! Initial mapping strategies.
//!
//! Each strategy produces a complete [`Layout`] over all `n` topology nodes,
//! padding the circuit with ancilla qubits when it has fewer than `n`
//! qubits. Strategies are plain functions dispatched through the
//! [`MappingStrategy`] enum:
//!
//! - [`MappingStrategy::Random`]: uniformly random permutation
//! - [`MappingStrategy::Majority`]: busiest qubits onto best-connected nodes
//! - [`MappingStrategy::MaxPairs`]: cluster strongly interacting qubits onto
//!   dense neighborhoods
//!
//! # Example
//!
//! ```
//! use qroute_compile::{MappingOptions, MappingStrategy, Topology};
//! use qroute_ir::Circuit;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut circuit: Circuit<&str> = Circuit::new(3);
//! circuit.two_qubit(0_u32, 1_u32).unwrap();
//!
//! let strategy: MappingStrategy = "majority".parse().unwrap();
//! let topology = Topology::star(4).unwrap();
//! let mut rng = StdRng::seed_from_u64(0);
//! let layout = strategy
//!     .compute_mapping(&circuit, &topology, &MappingOptions::default(), &mut rng)
//!     .unwrap();
//!
//! // Padded with one ancilla so every node is covered.
//! assert_eq!(layout.len(), 4);
//! ```

pub mod majority;
pub mod max_pairs;
pub mod random;

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use qroute_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::interaction::InteractionModel;
use crate::layout::Layout;
use crate::topology::Topology;

/// Default fan-out of the max-interacting-pairs strategy.
pub const DEFAULT_FAN_OUT: usize = 4;

/// Selects how the initial layout is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum MappingStrategy {
    /// Uniformly random permutation; ignores connectivity and interactions.
    Random,
    /// Highest interaction degree onto highest topology degree.
    Majority,
    /// Max-interacting-pairs clustering.
    MaxPairs,
}

/// Tunables shared by the mapping strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingOptions {
    /// How many partners of a seed qubit the max-pairs strategy tries to
    /// place around it.
    pub fan_out: usize,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            fan_out: DEFAULT_FAN_OUT,
        }
    }
}

impl MappingStrategy {
    /// All strategies, in selector order.
    pub const ALL: [MappingStrategy; 3] = [
        MappingStrategy::Random,
        MappingStrategy::Majority,
        MappingStrategy::MaxPairs,
    ];

    /// The selector string of this strategy.
    pub fn as_str(self) -> &'static str {
        match self {
            MappingStrategy::Random => "random",
            MappingStrategy::Majority => "majority",
            MappingStrategy::MaxPairs => "max_pairs",
        }
    }

    /// Compute an initial layout of `circuit` onto `topology`.
    ///
    /// The result covers all `topology.num_nodes()` qubits, ancillas
    /// included. Fails with [`CompileError::InfeasibleMapping`] if the circuit
    /// has more qubits than the topology has nodes. Only
    /// [`MappingStrategy::Random`] draws from `rng`.
    #[instrument(skip_all, fields(strategy = self.as_str()))]
    pub fn compute_mapping<P, R: Rng + ?Sized>(
        &self,
        circuit: &Circuit<P>,
        topology: &Topology,
        options: &MappingOptions,
        rng: &mut R,
    ) -> CompileResult<Layout> {
        let n = topology.num_nodes();
        if circuit.num_qubits() > n {
            return Err(CompileError::InfeasibleMapping {
                required: circuit.num_qubits(),
                available: n,
            });
        }

        let layout = match self {
            MappingStrategy::Random => random::random_layout(n, rng)?,
            MappingStrategy::Majority => {
                let interactions = InteractionModel::from_circuit(circuit, n);
                majority::majority_layout(&interactions, topology)?
            }
            MappingStrategy::MaxPairs => {
                let interactions = InteractionModel::from_circuit(circuit, n);
                max_pairs::max_pairs_layout(&interactions, topology, options.fan_out)?
            }
        };

        debug_assert!(layout.is_bijective());
        debug!("Initial layout: {:?}", layout.logical_to_physical());

        Ok(layout)
    }
}

impl FromStr for MappingStrategy {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(MappingStrategy::Random),
            "majority" => Ok(MappingStrategy::Majority),
            "max_pairs" => Ok(MappingStrategy::MaxPairs),
            _ => Err(CompileError::UnknownStrategy(s.to_string())),
        }
    }
}

impl TryFrom<String> for MappingStrategy {
    type Error = CompileError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for MappingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
