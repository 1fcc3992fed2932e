//! Topology command implementation.

use anyhow::Result;
use console::style;

use qroute_compile::TopologyDescription;

use super::common::load_topology;

/// Execute the topology command.
pub fn execute(spec: &str, json: bool) -> Result<()> {
    let topology = load_topology(spec)?;

    if json {
        let description = TopologyDescription::from(&topology);
        println!("{}", serde_json::to_string_pretty(&description)?);
        return Ok(());
    }

    println!(
        "{} {}: {} nodes, {} edges, diameter {}",
        style("Topology").cyan().bold(),
        style(spec).yellow(),
        topology.num_nodes(),
        topology.edges().len(),
        topology.diameter()
    );
    for node in 0..topology.num_nodes() {
        let neighbors: Vec<String> = topology
            .neighbors(node)
            .iter()
            .map(|n| format!("n{n}"))
            .collect();
        println!(
            "  {}: {}",
            style(format!("n{node}")).green(),
            neighbors.join(", ")
        );
    }

    Ok(())
}
