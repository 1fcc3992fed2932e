//! Compile command implementation.

use std::fs;

use anyhow::{Context, Result};
use console::style;

use qroute_compile::Compiler;

use super::common::{ConfigOverrides, describe, load_circuit, load_config, load_topology};

/// Execute the compile command.
pub fn execute(
    circuit_path: &str,
    topology_spec: &str,
    config_path: Option<&str>,
    overrides: &ConfigOverrides,
    output: Option<&str>,
) -> Result<()> {
    println!(
        "{} Compiling {} onto {}",
        style("→").cyan().bold(),
        style(circuit_path).green(),
        style(topology_spec).yellow()
    );

    let circuit = load_circuit(circuit_path)?;
    println!(
        "  Loaded: {} qubits, {} operations ({} two-qubit)",
        circuit.num_qubits(),
        circuit.len(),
        circuit.num_two_qubit_ops()
    );

    let topology = load_topology(topology_spec)?;
    println!(
        "  Topology: {} nodes, {} edges, diameter {}",
        topology.num_nodes(),
        topology.edges().len(),
        topology.diameter()
    );

    let config = overrides.apply(load_config(config_path)?)?;
    println!(
        "  Strategy: {}, lookahead {}, seed {}",
        config.strategy, config.lookahead, config.seed
    );

    let compiled = Compiler::new(config)
        .compile(&circuit, &topology)
        .context("Compilation failed")?;

    println!("{} Compilation complete", style("✓").green().bold());
    println!(
        "  Result: {} qubits, {} operations, {} swaps",
        compiled.num_qubits,
        compiled.operations.len(),
        style(compiled.swap_count).yellow()
    );

    match output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&compiled)?;
            fs::write(path, json).with_context(|| format!("Failed to write file: {path}"))?;
            println!("  Output: {}", style(path).green());
        }
        None => {
            for op in &compiled.operations {
                println!("  {}", describe(op));
            }
        }
    }

    Ok(())
}
