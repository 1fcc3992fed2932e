//! qroute Command-Line Interface
//!
//! Maps and routes JSON circuits onto fixed-connectivity topologies.
//!
//! ```text
//! qroute compile -c circuit.json -t grid:3x3 -s max_pairs -o routed.json
//! qroute topology ring:8
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::ConfigOverrides;
use commands::{compile, topology, version};

/// qroute - qubit mapping and SWAP routing for fixed-connectivity devices
#[derive(Parser)]
#[command(name = "qroute")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map and route a circuit onto a topology
    Compile {
        /// Circuit file (JSON)
        #[arg(short, long)]
        circuit: String,

        /// Topology: linear:N, ring:N, star:N, full:N, grid:RxC or a JSON file
        #[arg(short, long)]
        topology: String,

        /// Compiler configuration file (JSON); flags override its values
        #[arg(long)]
        config: Option<String>,

        #[command(flatten)]
        overrides: ConfigOverrides,

        /// Output file (JSON); prints the routed operations if omitted
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Describe a topology
    Topology {
        /// Topology: linear:N, ring:N, star:N, full:N, grid:RxC or a JSON file
        spec: String,

        /// Print the topology as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Compile {
            circuit,
            topology,
            config,
            overrides,
            output,
        } => compile::execute(
            &circuit,
            &topology,
            config.as_deref(),
            &overrides,
            output.as_deref(),
        ),

        Commands::Topology { spec, json } => topology::execute(&spec, json),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
