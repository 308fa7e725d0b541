//! Evaluar CLI
//!
//! Single-command evaluation entry point for the evaluar library.
//!
//! # Usage
//!
//! ```bash
//! # Run the whole pipeline from a settings file
//! evaluar run settings.json
//!
//! # Run against explicit dataset/model directories
//! evaluar run settings.json --data-dir data/ --model-dir model/
//!
//! # Validate and display a settings file
//! evaluar info settings.json
//! ```

use clap::Parser;
use evaluar::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
