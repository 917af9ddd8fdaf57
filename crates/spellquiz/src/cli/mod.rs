//! Command-line interface for spellquiz.
//!
//! This module provides the CLI structure for the `spellquiz` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AttemptsCommand, ConfigCommand, OutputFormat, ServeCommand, StatsCommand, WordsCommand,
};

/// spellquiz - Test your knowledge of regional English spellings
///
/// Serves a quiz that shows US spellings and asks for the Canadian, British,
/// Australian and New Zealand ones, and keeps a record of every attempt.
#[derive(Debug, Parser)]
#[command(name = "spellquiz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the quiz web server
    Serve(ServeCommand),

    /// Show aggregate statistics over all attempts
    Stats(StatsCommand),

    /// List recent attempts
    Attempts(AttemptsCommand),

    /// Print the active word bank
    Words(WordsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn stats_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Stats(StatsCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "spellquiz");
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(stats_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(stats_cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(stats_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(stats_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(stats_cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["spellquiz", "serve"]).unwrap();
        let Command::Serve(serve) = cli.command else {
            panic!("expected serve");
        };
        assert!(serve.host.is_none());
        assert!(serve.port.is_none());
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli =
            Cli::try_parse_from(["spellquiz", "serve", "--host", "127.0.0.1", "--port", "8080"])
                .unwrap();
        let Command::Serve(serve) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(serve.host, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
        assert_eq!(serve.port, Some(8080));
    }

    #[test]
    fn test_parse_serve_rejects_bad_host() {
        assert!(Cli::try_parse_from(["spellquiz", "serve", "--host", "localhost"]).is_err());
    }

    #[test]
    fn test_parse_attempts() {
        let cli = Cli::try_parse_from([
            "spellquiz",
            "attempts",
            "--last",
            "3",
            "--answers",
            "--format",
            "json",
        ])
        .unwrap();
        let Command::Attempts(attempts) = cli.command else {
            panic!("expected attempts");
        };
        assert_eq!(attempts.last, 3);
        assert!(attempts.answers);
        assert_eq!(attempts.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_attempts_defaults() {
        let cli = Cli::try_parse_from(["spellquiz", "attempts"]).unwrap();
        let Command::Attempts(attempts) = cli.command else {
            panic!("expected attempts");
        };
        assert_eq!(attempts.last, 10);
        assert!(!attempts.answers);
        assert_eq!(attempts.format, OutputFormat::Plain);
    }

    #[test]
    fn test_parse_words_level() {
        let cli = Cli::try_parse_from(["spellquiz", "words", "--level", "2"]).unwrap();
        let Command::Words(words) = cli.command else {
            panic!("expected words");
        };
        assert_eq!(words.level, Some(2));
        assert!(!words.json);
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["spellquiz", "config", "validate", "--file", "/tmp/x.toml"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli =
            Cli::try_parse_from(["spellquiz", "-c", "/custom/config.toml", "stats"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["spellquiz", "stats", "-vv", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Stats(StatsCommand { json: true })));
    }

    #[test]
    fn test_parse_with_quiet() {
        let cli = Cli::try_parse_from(["spellquiz", "-q", "stats"]).unwrap();
        assert!(cli.quiet);
    }
}
