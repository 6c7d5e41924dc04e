//! ID3 Tree - Main Entry Point
//!
//! Builds decision trees and feature-gain rankings from the command line.

use clap::Parser;
use id3_tree::cli::{cmd_analyze, cmd_gains, cmd_info, cmd_predict, cmd_tree, Cli, Commands, DataArgs};

fn main() -> anyhow::Result<()> {
    // Initialize logging; stderr keeps JSON output on stdout clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "id3_tree=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Tree { input, max_depth, json, rules, output }) => {
            cmd_tree(&input, max_depth, json, rules, output.as_deref())?;
        }
        Some(Commands::Gains { input, order, json }) => {
            cmd_gains(&input, order.as_deref(), json)?;
        }
        Some(Commands::Analyze { input }) => {
            cmd_analyze(&input)?;
        }
        Some(Commands::Predict { tree, data, output }) => {
            cmd_predict(&tree, &data, output.as_deref())?;
        }
        Some(Commands::Info { data }) => {
            cmd_info(&data)?;
        }
        None => {
            // Default: analyze the built-in weather data
            cmd_analyze(&DataArgs::default())?;
        }
    }

    Ok(())
}
