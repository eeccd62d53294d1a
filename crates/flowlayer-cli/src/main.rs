//! Flowlayer CLI - lay out process-flow graphs from JSON

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Logging is initialised inside run() from flags and environment
    let mut app = cli::FlowlayerApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
