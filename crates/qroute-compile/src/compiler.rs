//! Compilation driver.
//!
//! Ties the pieces together: compute an initial layout, evolve a second
//! candidate layout by routing a short prefix of the circuit, route the full
//! circuit from both, and keep whichever needed fewer SWAPs.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use qroute_ir::{Circuit, PhysicalOperation};

use crate::error::{CompileError, CompileResult};
use crate::layout::Layout;
use crate::mapping::{DEFAULT_FAN_OUT, MappingOptions, MappingStrategy};
use crate::routing::{LookaheadHeuristic, Router, RoutingOutcome, ScheduledSwap};
use crate::topology::Topology;

/// Configuration of a [`Compiler`].
///
/// Every field has a default, so a JSON file only needs to name what it
/// overrides:
///
/// ```
/// use qroute_compile::{CompileConfig, MappingStrategy};
///
/// let config = CompileConfig::from_json(r#"{ "strategy": "max_pairs", "seed": 7 }"#).unwrap();
/// assert_eq!(config.strategy, MappingStrategy::MaxPairs);
/// assert_eq!(config.lookahead, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    /// Initial mapping strategy.
    pub strategy: MappingStrategy,
    /// Number of upcoming two-qubit operations the routing heuristic looks at.
    pub lookahead: usize,
    /// Length of the two-qubit prefix routed to evolve the alternative
    /// layout. `None` uses `floor(log2(#two-qubit ops))`.
    pub simulation_depth: Option<usize>,
    /// Seed of the driver's random generator.
    pub seed: u64,
    /// Fan-out of the max-pairs strategy.
    pub fan_out: usize,
    /// Reuse counts below this are not significant.
    pub significance: usize,
    /// Margin by which one endpoint's reuse must exceed the other's.
    pub margin: usize,
}

impl Default for CompileConfig {
    fn default() -> Self {
        let heuristic = LookaheadHeuristic::default();
        Self {
            strategy: MappingStrategy::Random,
            lookahead: heuristic.window,
            simulation_depth: None,
            seed: 0,
            fan_out: DEFAULT_FAN_OUT,
            significance: heuristic.significance,
            margin: heuristic.margin,
        }
    }
}

impl CompileConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> CompileResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CompileError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values that have no meaningful interpretation.
    pub fn validate(&self) -> CompileResult<()> {
        if self.fan_out == 0 {
            return Err(CompileError::InvalidConfiguration(
                "fan_out must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Set the mapping strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: MappingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the mapping strategy from its selector string.
    pub fn with_strategy_name(self, name: &str) -> CompileResult<Self> {
        Ok(self.with_strategy(name.parse()?))
    }

    /// Set the lookahead window.
    #[must_use]
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Fix the simulated prefix length instead of deriving it.
    #[must_use]
    pub fn with_simulation_depth(mut self, depth: usize) -> Self {
        self.simulation_depth = Some(depth);
        self
    }

    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the max-pairs fan-out.
    #[must_use]
    pub fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = fan_out;
        self
    }

    /// Set the significance threshold of the heuristic.
    #[must_use]
    pub fn with_significance(mut self, significance: usize) -> Self {
        self.significance = significance;
        self
    }

    /// Set the dominance margin of the heuristic.
    #[must_use]
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    /// The routing heuristic described by this configuration.
    pub fn heuristic(&self) -> LookaheadHeuristic {
        LookaheadHeuristic {
            window: self.lookahead,
            significance: self.significance,
            margin: self.margin,
        }
    }

    /// The mapping options described by this configuration.
    pub fn mapping_options(&self) -> MappingOptions {
        MappingOptions {
            fan_out: self.fan_out,
        }
    }
}

/// Default simulated prefix length: `floor(log2(two_qubit_ops))`, zero when
/// there are fewer than two.
pub fn default_simulation_depth(two_qubit_ops: usize) -> usize {
    two_qubit_ops.checked_ilog2().unwrap_or(0) as usize
}

/// A routed circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledCircuit<P> {
    /// Physical operations, SWAPs included.
    pub operations: Vec<PhysicalOperation<P>>,
    /// Number of qubits after ancilla padding; equals the node count.
    pub num_qubits: u32,
    /// Number of inserted SWAPs.
    pub swap_count: usize,
    /// Layout the kept run started from.
    pub initial_layout: Layout,
    /// Layout after the last operation.
    pub final_layout: Layout,
    /// Every inserted SWAP with the input position that required it.
    pub swap_schedule: Vec<ScheduledSwap>,
}

/// Maps and routes circuits according to a [`CompileConfig`].
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompileConfig,
}

impl Compiler {
    /// Create a compiler.
    pub fn new(config: CompileConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Map and route `circuit` onto `topology`.
    ///
    /// Circuits with fewer qubits than the topology has nodes are padded
    /// with idle ancillas; the output always has `topology.num_nodes()`
    /// qubits. The result is fully determined by the inputs and the seed.
    #[instrument(skip_all, fields(strategy = %self.config.strategy, nodes = topology.num_nodes()))]
    pub fn compile<P: Clone>(
        &self,
        circuit: &Circuit<P>,
        topology: &Topology,
    ) -> CompileResult<CompiledCircuit<P>> {
        self.config.validate()?;
        circuit.validate()?;

        let n = topology.num_nodes();
        if circuit.num_qubits() > n {
            return Err(CompileError::InfeasibleMapping {
                required: circuit.num_qubits(),
                available: n,
            });
        }
        info!(
            "Compiling {} operations on {} qubits, padded to {n}",
            circuit.len(),
            circuit.num_qubits()
        );

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let initial = self.config.strategy.compute_mapping(
            circuit,
            topology,
            &self.config.mapping_options(),
            &mut rng,
        )?;

        let router = Router::new(topology, self.config.heuristic());
        let depth = self
            .config
            .simulation_depth
            .unwrap_or_else(|| default_simulation_depth(circuit.num_two_qubit_ops()));
        let mut evolved = initial.clone();
        let prefix_swaps = router.route_prefix(circuit, &mut evolved, depth, &mut rng)?;
        debug!("Simulated {depth} two-qubit operations with {prefix_swaps} swaps");

        let mut from_initial = StdRng::seed_from_u64(rng.next_u64());
        let mut from_evolved = StdRng::seed_from_u64(rng.next_u64());
        let (initial_run, initial_final) = run(&router, circuit, &initial, &mut from_initial)?;
        let (evolved_run, evolved_final) = run(&router, circuit, &evolved, &mut from_evolved)?;

        info!(
            "Full routing needs {} swaps from the initial layout, {} from the simulated one",
            initial_run.swap_count(),
            evolved_run.swap_count()
        );

        let (start, outcome, end) = if evolved_run.swap_count() < initial_run.swap_count() {
            (evolved, evolved_run, evolved_final)
        } else {
            (initial, initial_run, initial_final)
        };

        Ok(CompiledCircuit {
            swap_count: outcome.swap_count(),
            operations: outcome.operations,
            num_qubits: n,
            initial_layout: start,
            final_layout: end,
            swap_schedule: outcome.schedule,
        })
    }
}

fn run<P: Clone>(
    router: &Router<'_>,
    circuit: &Circuit<P>,
    start: &Layout,
    rng: &mut StdRng,
) -> CompileResult<(RoutingOutcome<P>, Layout)> {
    let mut layout = start.clone();
    let outcome = router.route(circuit, &mut layout, rng)?;
    Ok((outcome, layout))
}

/// Compile with a strategy selector string and an explicit prefix length.
///
/// Returns the physical operations and the padded qubit count. Uses the
/// default seed and heuristic thresholds; see [`Compiler`] for full control.
pub fn compile<P: Clone>(
    circuit: &Circuit<P>,
    topology: &Topology,
    strategy_name: &str,
    lookahead: usize,
    simulate_k: usize,
) -> CompileResult<(Vec<PhysicalOperation<P>>, u32)> {
    let config = CompileConfig::default()
        .with_strategy_name(strategy_name)?
        .with_lookahead(lookahead)
        .with_simulation_depth(simulate_k);
    let compiled = Compiler::new(config).compile(circuit, topology)?;
    Ok((compiled.operations, compiled.num_qubits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qroute_ir::QubitId;

    #[test]
    fn test_default_simulation_depth() {
        assert_eq!(default_simulation_depth(0), 0);
        assert_eq!(default_simulation_depth(1), 0);
        assert_eq!(default_simulation_depth(2), 1);
        assert_eq!(default_simulation_depth(7), 2);
        assert_eq!(default_simulation_depth(8), 3);
        assert_eq!(default_simulation_depth(1000), 9);
    }

    #[test]
    fn test_config_json_defaults() {
        let config = CompileConfig::from_json("{}").unwrap();
        assert_eq!(config, CompileConfig::default());

        let config = CompileConfig::from_json(
            r#"{ "strategy": "Majority", "lookahead": 3, "simulation_depth": 2, "margin": 1 }"#,
        )
        .unwrap();
        assert_eq!(config.strategy, MappingStrategy::Majority);
        assert_eq!(config.heuristic().window, 3);
        assert_eq!(config.heuristic().margin, 1);
        assert_eq!(config.simulation_depth, Some(2));
    }

    #[test]
    fn test_config_json_errors() {
        assert!(matches!(
            CompileConfig::from_json(r#"{ "strategy": "greedy" }"#),
            Err(CompileError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            CompileConfig::from_json(r#"{ "lookahed": 3 }"#),
            Err(CompileError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            CompileConfig::from_json(r#"{ "fan_out": 0 }"#),
            Err(CompileError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_unknown_strategy_name() {
        let err = CompileConfig::default()
            .with_strategy_name("sabre")
            .unwrap_err();
        assert!(matches!(err, CompileError::UnknownStrategy(name) if name == "sabre"));

        let circuit: Circuit<&str> = Circuit::new(2);
        let topology = Topology::linear(2).unwrap();
        assert!(matches!(
            compile(&circuit, &topology, "sabre", 10, 0),
            Err(CompileError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_adjacent_pair_needs_no_swaps() {
        let topology = Topology::linear(4).unwrap();
        let mut circuit: Circuit<&str> = Circuit::new(2);
        circuit.two_qubit(0_u32, 1_u32).unwrap();

        // Majority places q0 and q1 on the two inner nodes, which are adjacent.
        let config = CompileConfig::default().with_strategy(MappingStrategy::Majority);
        let compiled = Compiler::new(config).compile(&circuit, &topology).unwrap();

        assert_eq!(compiled.swap_count, 0);
        assert_eq!(compiled.num_qubits, 4);
        assert_eq!(compiled.operations.len(), 1);
        let (a, b) = compiled.operations[0].node_pair().unwrap();
        assert!(topology.is_adjacent(a, b));
        assert_eq!(compiled.initial_layout, compiled.final_layout);
    }

    #[test]
    fn test_infeasible_circuit() {
        let topology = Topology::ring(3).unwrap();
        let circuit: Circuit<&str> = Circuit::new(5);
        let err = Compiler::default().compile(&circuit, &topology).unwrap_err();
        assert!(matches!(
            err,
            CompileError::InfeasibleMapping {
                required: 5,
                available: 3
            }
        ));
    }

    #[test]
    fn test_schedule_and_layouts_agree() {
        let topology = Topology::linear(6).unwrap();
        let mut circuit = Circuit::new(6);
        for (c, t) in [(0_u32, 5_u32), (1, 4), (2, 5), (0, 3), (5, 1)] {
            circuit.single(c, "h").unwrap();
            circuit.two_qubit(c, t).unwrap();
        }

        for strategy in MappingStrategy::ALL {
            let config = CompileConfig::default().with_strategy(strategy).with_seed(3);
            let compiled = Compiler::new(config).compile(&circuit, &topology).unwrap();

            assert_eq!(compiled.swap_count, compiled.swap_schedule.len());
            let mut replay = compiled.initial_layout.clone();
            for swap in &compiled.swap_schedule {
                replay.swap_nodes(swap.node_a, swap.node_b);
            }
            assert_eq!(replay, compiled.final_layout, "{strategy}");
            assert!(compiled.final_layout.is_bijective());
            // Ancilla-free circuit: every qubit is still placed somewhere.
            assert!(compiled.final_layout.physical(QubitId(5)) < 6);
        }
    }

    #[test]
    fn test_free_function_matches_compiler() {
        let topology = Topology::grid(2, 3).unwrap();
        let mut circuit: Circuit<&str> = Circuit::new(5);
        for (c, t) in [(0_u32, 4_u32), (1, 3), (4, 2), (0, 1)] {
            circuit.two_qubit(c, t).unwrap();
        }

        let (ops, n) = compile(&circuit, &topology, "max_pairs", 4, 1).unwrap();
        let config = CompileConfig::default()
            .with_strategy(MappingStrategy::MaxPairs)
            .with_lookahead(4)
            .with_simulation_depth(1);
        let compiled = Compiler::new(config).compile(&circuit, &topology).unwrap();

        assert_eq!(n, 6);
        assert_eq!(ops, compiled.operations);
    }
}
