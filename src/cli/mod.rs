//! CLI module for iris-serve
//!
//! Provides subcommands:
//! - `serve`: HTTP API + prediction form
//! - `train`: offline training to an artifact file
//! - `trigger`: replay an upload event against the retrain endpoint

pub mod serve;
pub mod train;
pub mod trigger;

use clap::{Parser, Subcommand};

/// iris-serve - Iris classifier training and serving
#[derive(Parser)]
#[command(name = "iris-serve")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Train a model offline and save its artifact
    Train(train::TrainArgs),

    /// Request a retrain for an object-store upload event
    Trigger(trigger::TriggerArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_train_args() {
        let cli = Cli::try_parse_from([
            "iris-serve",
            "train",
            "--model-type",
            "svm",
            "--data",
            "iris.csv",
        ])
        .unwrap();

        match cli.command {
            Command::Train(args) => {
                assert_eq!(args.model_type, "svm");
                assert_eq!(args.data.as_deref(), Some(std::path::Path::new("iris.csv")));
                assert!(args.output.is_none());
            }
            _ => panic!("expected train command"),
        }
    }

    #[test]
    fn test_parse_trigger_args() {
        let cli = Cli::try_parse_from(["iris-serve", "trigger", "--event", "-"]).unwrap();
        assert!(matches!(cli.command, Command::Trigger(args) if args.event == "-"));
    }
}
