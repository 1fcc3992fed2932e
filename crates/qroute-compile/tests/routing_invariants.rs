//! End-to-end checks of compiled circuits.
//!
//! Every compiled circuit is replayed from its initial layout: SWAPs must be
//! between adjacent nodes, each original operation must appear on the nodes
//! holding its qubits at that point, and the replay must finish in the
//! reported final layout.

use qroute_compile::{
    CompileConfig, CompileError, CompiledCircuit, Compiler, LookaheadHeuristic, MappingStrategy,
    Router, Topology, TopologyDescription, compile,
};
use qroute_ir::{Circuit, Operation, PhysicalOperation, QubitId};

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Replay `compiled` against `circuit` and panic on the first violation.
fn assert_faithful(circuit: &Circuit<usize>, topology: &Topology, compiled: &CompiledCircuit<usize>) {
    let mut layout = compiled.initial_layout.clone();
    let mut originals = circuit.operations().iter().enumerate();
    let mut swaps = compiled.swap_schedule.iter();
    let mut pending_swaps = Vec::new();

    for op in &compiled.operations {
        match *op {
            PhysicalOperation::Swap { a, b } => {
                assert!(topology.is_adjacent(a, b), "swap n{a}, n{b} is not an edge");
                layout.swap_nodes(a, b);
                assert!(layout.is_bijective());
                pending_swaps.push((a, b));
            }
            PhysicalOperation::Single { node, payload } => {
                let (position, original) = originals.next().expect("extra operation in output");
                assert!(pending_swaps.is_empty(), "swaps before a single-qubit op");
                let Operation::Single { qubit, payload: p } = original else {
                    panic!("operation {position} changed kind");
                };
                assert_eq!(payload, *p);
                assert_eq!(layout.logical(node), *qubit);
            }
            PhysicalOperation::TwoQubit { control, target } => {
                let (position, original) = originals.next().expect("extra operation in output");
                let Operation::TwoQubit { control: c, target: t } = *original else {
                    panic!("operation {position} changed kind");
                };
                assert!(topology.is_adjacent(control, target));
                assert_eq!(layout.logical(control), c);
                assert_eq!(layout.logical(target), t);
                for (a, b) in pending_swaps.drain(..) {
                    let scheduled = swaps.next().expect("swap missing from schedule");
                    assert_eq!((scheduled.node_a, scheduled.node_b), (a, b));
                    assert_eq!(scheduled.position, position);
                }
            }
        }
    }

    assert!(originals.next().is_none(), "operations dropped");
    assert!(pending_swaps.is_empty(), "trailing swaps");
    assert!(swaps.next().is_none());
    assert_eq!(layout, compiled.final_layout);
    assert_eq!(compiled.swap_count, compiled.swap_schedule.len());
}

/// A circuit whose single-qubit payloads are their own input positions.
fn circuit_from(num_qubits: u32, ops: &[(u32, Option<u32>)]) -> Circuit<usize> {
    let mut circuit = Circuit::new(num_qubits);
    for (i, &(a, b)) in ops.iter().enumerate() {
        match b {
            Some(b) => circuit.two_qubit(a, b).unwrap(),
            None => circuit.single(a, i).unwrap(),
        };
    }
    circuit
}

fn qft_like(num_qubits: u32) -> Circuit<usize> {
    let mut ops = Vec::new();
    for i in 0..num_qubits {
        ops.push((i, None));
        for j in (i + 1)..num_qubits {
            ops.push((j, Some(i)));
        }
    }
    circuit_from(num_qubits, &ops)
}

#[test]
fn test_every_strategy_on_every_family() {
    let topologies = [
        Topology::linear(7).unwrap(),
        Topology::ring(7).unwrap(),
        Topology::star(7).unwrap(),
        Topology::grid(2, 4).unwrap(),
        Topology::full(5).unwrap(),
    ];
    let circuit = qft_like(5);

    for topology in &topologies {
        for strategy in MappingStrategy::ALL {
            let config = CompileConfig::default().with_strategy(strategy).with_seed(9);
            let compiled = Compiler::new(config).compile(&circuit, topology).unwrap();
            assert_eq!(compiled.num_qubits, topology.num_nodes());
            assert_faithful(&circuit, topology, &compiled);
        }
    }
}

#[test]
fn test_full_topology_needs_no_swaps() {
    let topology = Topology::full(6).unwrap();
    let circuit = qft_like(6);
    for strategy in MappingStrategy::ALL {
        let config = CompileConfig::default().with_strategy(strategy);
        let compiled = Compiler::new(config).compile(&circuit, &topology).unwrap();
        assert_eq!(compiled.swap_count, 0, "{strategy}");
    }
}

#[test]
fn test_deterministic_under_seed() {
    let topology = Topology::grid(3, 3).unwrap();
    let circuit = qft_like(7);
    for strategy in MappingStrategy::ALL {
        let config = CompileConfig::default().with_strategy(strategy).with_seed(1234);
        let first = Compiler::new(config.clone()).compile(&circuit, &topology).unwrap();
        let second = Compiler::new(config).compile(&circuit, &topology).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_padding_leaves_ancillas_idle() {
    let topology = Topology::linear(8).unwrap();
    let circuit = circuit_from(3, &[(0, Some(2)), (1, None), (2, Some(1)), (0, Some(1))]);

    let compiled = Compiler::new(CompileConfig::default().with_strategy(MappingStrategy::MaxPairs))
        .compile(&circuit, &topology)
        .unwrap();
    assert_eq!(compiled.num_qubits, 8);
    assert_faithful(&circuit, &topology, &compiled);

    // Only SWAPs may touch nodes that host ancillas.
    let mut layout = compiled.initial_layout.clone();
    for op in &compiled.operations {
        match *op {
            PhysicalOperation::Swap { a, b } => layout.swap_nodes(a, b),
            PhysicalOperation::Single { node, .. } => assert!(layout.logical(node).0 < 3),
            PhysicalOperation::TwoQubit { control, target } => {
                assert!(layout.logical(control).0 < 3);
                assert!(layout.logical(target).0 < 3);
            }
        }
    }
}

#[test]
fn test_feasibility_rejection() {
    let circuit = qft_like(4);
    let topology = Topology::star(3).unwrap();
    assert!(matches!(
        Compiler::default().compile(&circuit, &topology),
        Err(CompileError::InfeasibleMapping {
            required: 4,
            available: 3
        })
    ));

    let disconnected: TopologyDescription =
        serde_json::from_str(r#"{"num_nodes": 4, "edges": [[0, 1], [2, 3]]}"#).unwrap();
    assert!(matches!(
        disconnected.build(),
        Err(CompileError::InvalidTopology(_))
    ));

    let asymmetric: TopologyDescription =
        serde_json::from_str(r#"{"adjacency": {"0": [1], "1": []}}"#).unwrap();
    assert!(matches!(
        asymmetric.build(),
        Err(CompileError::InvalidTopology(_))
    ));
}

#[test]
fn test_invalid_circuit_rejected() {
    // Deserialized circuits bypass the builder checks.
    let circuit: Circuit<usize> = serde_json::from_str(
        r#"{"num_qubits": 2, "operations": [{"two_qubit": {"control": 0, "target": 2}}]}"#,
    )
    .unwrap();
    let topology = Topology::linear(3).unwrap();
    assert!(matches!(
        Compiler::default().compile(&circuit, &topology),
        Err(CompileError::Ir(_))
    ));
}

#[test]
fn test_single_qubit_only_circuit_is_unchanged() {
    let topology = Topology::ring(4).unwrap();
    let circuit = circuit_from(4, &[(0, None), (3, None), (1, None), (0, None)]);
    let compiled = Compiler::new(CompileConfig::default().with_seed(77))
        .compile(&circuit, &topology)
        .unwrap();

    assert_eq!(compiled.swap_count, 0);
    assert_eq!(compiled.initial_layout, compiled.final_layout);
    assert_eq!(compiled.operations.len(), circuit.len());
    assert_faithful(&circuit, &topology, &compiled);
}

#[test]
fn test_distant_pair_on_path() {
    // q0 -> n0, q1 -> n3: moving the target costs exactly two swaps.
    let topology = Topology::linear(4).unwrap();
    let circuit = circuit_from(2, &[(0, Some(1))]);
    let mut layout = qroute_compile::Layout::from_physical(vec![0, 3, 1, 2]).unwrap();

    // The window sees nothing, so the movement is a seeded random pick; every
    // pick needs two swaps on a distance-3 pair.
    let router = Router::new(&topology, LookaheadHeuristic::default());
    let outcome = router
        .route(&circuit, &mut layout, &mut StdRng::seed_from_u64(5))
        .unwrap();
    assert_eq!(outcome.swap_count(), 2);
    assert!(outcome.operations[..2].iter().all(PhysicalOperation::is_swap));
    let (a, b) = outcome.operations[2].node_pair().unwrap();
    assert!(topology.is_adjacent(a, b));
    assert_eq!(layout.logical(a), QubitId(0));
    assert_eq!(layout.logical(b), QubitId(1));
}

#[test]
fn test_free_function_returns_padded_width() {
    let topology = Topology::grid(2, 2).unwrap();
    let circuit = circuit_from(2, &[(0, Some(1)), (1, None)]);
    let (ops, n) = compile(&circuit, &topology, "Random", 10, 0).unwrap();
    assert_eq!(n, 4);
    assert_eq!(ops.iter().filter(|op| !op.is_swap()).count(), 2);
}
