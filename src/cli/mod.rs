//! Command-line interface.

use clap::{Parser, Subcommand};

/// Monitorias - academic monitoring administration API
#[derive(Parser, Debug)]
#[command(name = "monitorias")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Insert the demo user accounts
    Seed,

    /// Write a default config.toml if none exists
    Init,
}

impl Cli {
    /// Subcommand to run; `serve` when none was given.
    #[must_use]
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::parse_from(["monitorias"]);
        assert_eq!(cli.command(), &Commands::Serve);
    }

    #[test]
    fn test_parses_subcommands() {
        assert_eq!(
            Cli::parse_from(["monitorias", "seed"]).command(),
            &Commands::Seed
        );
        assert_eq!(
            Cli::parse_from(["monitorias", "migrate"]).command(),
            &Commands::Migrate
        );
    }

    #[test]
    fn test_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["monitorias", "frobnicate"]).is_err());
    }
}
