//! mmd2svg CLI - Convert Mermaid diagram files to SVG

mod cli;
mod report;

use clap::Parser;
use mmd2svg::core::logging::init_logging;

fn main() {
    let cli_args = cli::Cli::parse();

    // Explicit flags win; otherwise MMD2SVG_LOG_LEVEL / RUST_LOG apply
    let log_level = cli_args.effective_log_level();
    let log_format = cli_args.log_format.map(|format| format.as_str());
    if let Err(e) = init_logging(log_level, log_format) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let app = cli::Mmd2svgApp::new();

    match app.run(cli_args) {
        Ok(true) => {}
        // Item failures were already reported on stdout
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
