//! CLI command definitions and dispatch for the `livesession` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod key;
pub mod models;
pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Persist, inspect, and restore live voice sessions.
#[derive(Parser)]
#[command(name = "livesession", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "LIVESESSION_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        /// Address to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Manage API keys.
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },

    /// List a user's sessions, newest first.
    Sessions {
        /// Owner of the sessions.
        user: String,

        /// Maximum number of sessions to show.
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },

    /// Print a session's transcript.
    Transcript {
        /// Session to print.
        session_id: String,

        /// Owner of the session.
        #[arg(long)]
        user: String,

        /// Maximum number of entries to show.
        #[arg(long, default_value_t = 100)]
        limit: i64,
    },

    /// Print the restoration prompt for a session.
    Context {
        /// Session to restore.
        session_id: String,

        /// Owner of the session.
        #[arg(long)]
        user: String,

        /// Number of recent transcript entries to include.
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },

    /// List models available to the configured Gemini key.
    Models,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Mint a new API key (shown once).
    Create {
        /// User id the key authenticates as.
        #[arg(long)]
        user: String,

        /// Allow the key to read and change the Gemini configuration.
        #[arg(long)]
        admin: bool,

        /// Label stored with the key.
        #[arg(long, default_value = "default")]
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_key_create() {
        let cli = Cli::parse_from(["livesession", "key", "create", "--user", "alice", "--admin"]);
        match cli.command {
            Commands::Key {
                action: KeyCommand::Create { user, admin, name },
            } => {
                assert_eq!(user, "alice");
                assert!(admin);
                assert_eq!(name, "default");
            }
            _ => panic!("expected key create"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["livesession", "sessions", "alice", "--json", "-vv"]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Sessions { limit: 50, .. }));
    }
}
