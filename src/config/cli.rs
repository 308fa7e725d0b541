//! CLI argument types.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Evaluar: question-answering LLM evaluation pipeline
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "evaluar")]
#[command(version)]
#[command(about = "Downloads a QA dataset, runs a causal LM, and scores answers with BLEU/ROUGE")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the full pipeline: import, preprocess, infer, evaluate
    Run(RunArgs),

    /// Validate a settings file and display the parsed configuration
    Info(InfoArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// Path to settings.json
    #[arg(value_name = "SETTINGS")]
    pub settings: PathBuf,

    /// Directory holding the dataset's test split (default: user cache)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Model checkpoint directory (default: user cache)
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Override batch size
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Override maximum sequence length
    #[arg(short, long)]
    pub max_length: Option<usize>,

    /// Override the number of samples inferred
    #[arg(short, long)]
    pub num_samples: Option<usize>,

    /// Predictions output file (default: dist/predictions.csv)
    #[arg(short = 'o', long)]
    pub predictions: Option<PathBuf>,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to settings.json
    #[arg(value_name = "SETTINGS")]
    pub settings: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from([
            "evaluar",
            "run",
            "settings.json",
            "--batch-size",
            "4",
            "-o",
            "out.csv",
        ])
        .unwrap();

        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.settings, PathBuf::from("settings.json"));
                assert_eq!(args.batch_size, Some(4));
                assert_eq!(args.predictions, Some(PathBuf::from("out.csv")));
                assert_eq!(args.model_dir, None);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_info_with_flags() {
        let cli = Cli::try_parse_from(["evaluar", "info", "settings.json", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(matches!(cli.command, Command::Info(_)));
    }

    #[test]
    fn test_cli_requires_settings_path() {
        assert!(Cli::try_parse_from(["evaluar", "run"]).is_err());
    }
}
