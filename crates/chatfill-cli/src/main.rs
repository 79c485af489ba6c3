use anyhow::Result;
use chatfill_core::config::TargetPositions;
use chatfill_core::session::EntityRef;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "chatfill")]
#[command(about = "Copy selected messages of a chat into a fresh chat", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding session files (overrides the configuration)
    #[arg(long, global = true)]
    sessions_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the configured messages of a chat into a new chat for the same entity
    Duplicate {
        #[command(flatten)]
        entity: EntityArgs,

        /// ID of the source chat
        #[arg(long)]
        session: String,

        /// Comma separated positions overriding the configuration (e.g. "1,3,7")
        #[arg(long, value_parser = parse_positions)]
        positions: Option<TargetPositions>,
    },
    /// List the stored chats of a character or group
    List {
        #[command(flatten)]
        entity: EntityArgs,
    },
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the path of the configuration file
    Path,
    /// Print the effective configuration
    Show,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct EntityArgs {
    /// Character ID
    #[arg(long)]
    character: Option<String>,

    /// Group ID
    #[arg(long)]
    group: Option<String>,
}

impl EntityArgs {
    fn into_entity(self) -> Option<EntityRef> {
        match (self.character, self.group) {
            (Some(id), _) => Some(EntityRef::Character(id)),
            (None, Some(id)) => Some(EntityRef::Group(id)),
            (None, None) => None,
        }
    }
}

fn parse_positions(input: &str) -> Result<TargetPositions, String> {
    TargetPositions::parse_list(input).map_err(|e| format!("invalid position list: {}", e))
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "chatfill=debug" } else { "chatfill=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = commands::Context::new(cli.config, cli.sessions_dir)?;

    match cli.command {
        Commands::Duplicate {
            entity,
            session,
            positions,
        } => {
            let entity = entity
                .into_entity()
                .ok_or_else(|| anyhow::anyhow!("--character or --group is required"))?;
            commands::duplicate::run(&ctx, entity, &session, positions).await
        }
        Commands::List { entity } => {
            let entity = entity
                .into_entity()
                .ok_or_else(|| anyhow::anyhow!("--character or --group is required"))?;
            commands::list::run(&ctx, &entity)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Path => commands::config::path(&ctx),
                ConfigAction::Show => commands::config::show(&ctx)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_duplicate_args_parse() {
        let cli = Cli::try_parse_from([
            "chatfill",
            "duplicate",
            "--group",
            "party",
            "--session",
            "abc",
            "--positions",
            "3,1",
        ])
        .unwrap();

        match cli.command {
            Commands::Duplicate {
                entity,
                session,
                positions,
            } => {
                assert_eq!(entity.into_entity(), Some(EntityRef::Group("party".to_string())));
                assert_eq!(session, "abc");
                assert_eq!(positions.unwrap().as_slice(), &[3, 1]);
            }
            _ => panic!("expected duplicate command"),
        }
    }

    #[test]
    fn test_entity_flags_are_exclusive_and_required() {
        assert!(
            Cli::try_parse_from([
                "chatfill",
                "list",
                "--character",
                "1",
                "--group",
                "g"
            ])
            .is_err()
        );
        assert!(Cli::try_parse_from(["chatfill", "list"]).is_err());
    }
}
