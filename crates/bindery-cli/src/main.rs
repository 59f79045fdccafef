//! `bindery` developer CLI: compile a manifest, check it, or dump what the
//! analysis resolved.

mod command;
mod logging;

use bindery::config::MANIFEST_FILE;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::ExitCode};

#[derive(Debug, Parser)]
#[command(name = "bindery")]
#[command(about = "Build-time binding metadata compiler")]
#[command(version)]
struct Cli {
    /// Manifest to compile
    #[arg(
        short,
        long,
        global = true,
        env = "BINDERY_MANIFEST",
        default_value = MANIFEST_FILE,
        value_name = "PATH"
    )]
    manifest: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write generated units and namespace indexes into a directory
    Generate {
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,
    },

    /// Report diagnostics; exits non-zero when any is an error
    Check,

    /// Print resolved type descriptors, event types and enums as JSON
    Inspect {
        /// Only this type (full name, e.g. `game::Player`)
        #[arg(long = "type", value_name = "NAME")]
        type_name: Option<String>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    logging::init();

    let cli = Cli::parse();
    tracing::debug!(manifest = %cli.manifest.display(), "bindery cli");

    match cli.command {
        Command::Generate { out } => command::generate(&cli.manifest, &out),
        Command::Check => command::check(&cli.manifest),
        Command::Inspect { type_name } => command::inspect(&cli.manifest, type_name.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn manifest_defaults_and_is_global() {
        let cli = Cli::try_parse_from(["bindery", "check"]).expect("parse");
        assert_eq!(cli.manifest, PathBuf::from(MANIFEST_FILE));

        let cli = Cli::try_parse_from(["bindery", "inspect", "-m", "ui.toml", "--type", "game::Player"])
            .expect("parse");
        assert_eq!(cli.manifest, PathBuf::from("ui.toml"));
        assert!(matches!(
            cli.command,
            Command::Inspect { type_name: Some(ref name) } if name == "game::Player"
        ));
    }

    #[test]
    fn generate_requires_out() {
        assert!(Cli::try_parse_from(["bindery", "generate"]).is_err());
    }
}
