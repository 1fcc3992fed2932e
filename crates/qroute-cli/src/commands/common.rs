//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tracing::debug;

use qroute_compile::{CompileConfig, Topology, TopologyDescription};
use qroute_ir::{Circuit, PhysicalOperation};

/// Compiler settings that can be given on the command line.
#[derive(Debug, Default, Args)]
pub struct ConfigOverrides {
    /// Initial mapping strategy (random, majority, max_pairs)
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Number of upcoming two-qubit operations the router looks at
    #[arg(short, long)]
    pub lookahead: Option<usize>,

    /// Two-qubit operations routed to evolve the alternative layout
    /// [default: floor(log2(two-qubit operations))]
    #[arg(long)]
    pub simulate: Option<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fan-out of the max_pairs strategy
    #[arg(long)]
    pub fan_out: Option<usize>,
}

impl ConfigOverrides {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, mut config: CompileConfig) -> Result<CompileConfig> {
        if let Some(name) = &self.strategy {
            config = config.with_strategy_name(name)?;
        }
        if let Some(lookahead) = self.lookahead {
            config = config.with_lookahead(lookahead);
        }
        if let Some(depth) = self.simulate {
            config = config.with_simulation_depth(depth);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(fan_out) = self.fan_out {
            config = config.with_fan_out(fan_out);
        }
        config.validate()?;
        Ok(config)
    }
}

fn read_file(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
}

/// Load a circuit from a JSON file. Single-qubit payloads may be any JSON
/// value.
pub fn load_circuit(path: &str) -> Result<Circuit<Value>> {
    let source = read_file(path)?;
    let circuit: Circuit<Value> = serde_json::from_str(&source)
        .with_context(|| format!("Invalid circuit JSON in {path}"))?;
    circuit
        .validate()
        .with_context(|| format!("Invalid circuit in {path}"))?;
    debug!(
        "Loaded circuit with {} operations from {path}",
        circuit.len()
    );
    Ok(circuit)
}

/// Load a compiler configuration file, or the defaults if none is given.
pub fn load_config(path: Option<&str>) -> Result<CompileConfig> {
    let Some(path) = path else {
        return Ok(CompileConfig::default());
    };
    let source = read_file(path)?;
    CompileConfig::from_json(&source).with_context(|| format!("Invalid configuration in {path}"))
}

/// Build a topology from a `kind:size` spec or a JSON file.
pub fn load_topology(spec: &str) -> Result<Topology> {
    if Path::new(spec).is_file() {
        let source = read_file(spec)?;
        let description: TopologyDescription = serde_json::from_str(&source)
            .with_context(|| format!("Invalid topology JSON in {spec}"))?;
        return description
            .build()
            .with_context(|| format!("Invalid topology in {spec}"));
    }

    let (kind, size) = spec.split_once(':').ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown topology: '{spec}'. Expected linear:N, ring:N, star:N, full:N, grid:RxC or a JSON file"
        )
    })?;

    let topology = match kind.to_lowercase().as_str() {
        "linear" | "line" => Topology::linear(parse_size(size)?),
        "ring" => Topology::ring(parse_size(size)?),
        "star" => Topology::star(parse_size(size)?),
        "full" => Topology::full(parse_size(size)?),
        "grid" => {
            let (rows, cols) = size
                .split_once(['x', 'X'])
                .ok_or_else(|| anyhow::anyhow!("Grid size must be RxC, got '{size}'"))?;
            Topology::grid(parse_size(rows)?, parse_size(cols)?)
        }
        other => {
            anyhow::bail!(
                "Unknown topology kind: '{other}'. Available: linear, ring, star, full, grid"
            );
        }
    };

    topology.with_context(|| format!("Invalid topology: {spec}"))
}

fn parse_size(size: &str) -> Result<u32> {
    size.trim()
        .parse()
        .with_context(|| format!("Invalid topology size: '{size}'"))
}

/// One-line rendering of a routed operation.
pub fn describe(op: &PhysicalOperation<Value>) -> String {
    match op {
        PhysicalOperation::Single { node, payload } => match payload.as_str() {
            Some(name) => format!("{name} n{node}"),
            None => format!("{payload} n{node}"),
        },
        PhysicalOperation::TwoQubit { control, target } => format!("cx n{control}, n{target}"),
        PhysicalOperation::Swap { a, b } => format!("swap n{a}, n{b}"),
    }
}
