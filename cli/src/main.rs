#![deny(missing_docs)]

//! # CMS OpenAPI CLI
//!
//! Command Line Interface for generating OpenAPI documents from CMS configurations.
//!
//! Supported Commands:
//! - `generate`: Host config -> OpenAPI document (JSON or YAML).

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "CMS OpenAPI generator")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an OpenAPI document from a host configuration file.
    Generate(generate::GenerateArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> CliResult<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate(args) => generate::execute(args).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::parse_from([
            "cms-openapi",
            "generate",
            "--config",
            "cms.yaml",
            "--format",
            "yaml",
            "--scope",
            "read",
            "--scope",
            "write",
        ]);
        let Commands::Generate(args) = cli.command;
        assert_eq!(args.config.to_str(), Some("cms.yaml"));
        assert_eq!(args.format, generate::OutputFormat::Yaml);
        assert_eq!(args.scopes, vec!["read", "write"]);
    }
}
