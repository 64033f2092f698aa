//! CLI command definitions for the `meetingmind` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Meeting memory: intake, commitments, search and pre-meeting briefings.
#[derive(Parser)]
#[command(name = "meetingmind", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config.toml (defaults to ~/.meetingmind/config.toml).
    #[arg(long, global = true, env = "MEETINGMIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Bind address (overrides server.host).
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides server.port).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Submit the demo meetings to a running server.
    Seed {
        /// Base URL of the server.
        #[arg(long, default_value = "http://localhost:8000")]
        url: String,

        /// Seconds to wait for processing before reading results back.
        #[arg(long, default_value_t = 5)]
        wait_secs: u64,
    },

    /// Print the effective configuration with secrets redacted.
    CheckConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["meetingmind", "-v", "serve", "--port", "9000"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_seed_defaults() {
        let cli = Cli::parse_from(["meetingmind", "seed"]);
        match cli.command {
            Commands::Seed { url, wait_secs } => {
                assert_eq!(url, "http://localhost:8000");
                assert_eq!(wait_secs, 5);
            }
            _ => panic!("expected seed"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["meetingmind", "check-config", "--config", "/tmp/mm.toml", "-q"]);
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/mm.toml")));
        assert!(matches!(cli.command, Commands::CheckConfig));
    }
}
