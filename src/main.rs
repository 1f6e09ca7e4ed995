#![forbid(unsafe_code)]

//! jobwatch CLI entry point.

use clap::Parser;
use colored::Colorize;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        eprintln!("{} {e}", "jobwatch:".red().bold());
        std::process::exit(e.exit_code());
    }
}
