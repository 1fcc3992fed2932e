//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - qubit mapping and SWAP routing",
        style("qroute").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qroute-ir       Circuit representation");
    println!("  qroute-compile  Mapping strategies, router and compilation driver");
    println!("  qroute-cli      Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
