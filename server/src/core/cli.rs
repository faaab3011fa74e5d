use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_ANALYTICS_DEFAULT_PERIOD, ENV_CONFIG, ENV_DATABASE_MAX_CONNECTIONS, ENV_DATABASE_PATH,
    ENV_DEBUG, ENV_HOST, ENV_PORT,
};

#[derive(Parser)]
#[command(name = "shopdesk")]
#[command(version, about = "E-commerce admin backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug mode (verbose request logging)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// SQLite database file (defaults to the data directory)
    #[arg(long, global = true, env = ENV_DATABASE_PATH)]
    pub database_path: Option<PathBuf>,

    /// Maximum database connections
    #[arg(long, global = true, env = ENV_DATABASE_MAX_CONNECTIONS)]
    pub database_max_connections: Option<u32>,

    /// Analytics period used when a request gives neither dates nor a period
    /// (today, yesterday, this_week, last_week, this_month, last_month, all_time)
    #[arg(long, global = true, env = ENV_ANALYTICS_DEFAULT_PERIOD)]
    pub default_period: Option<String>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// System maintenance commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum SystemCommands {
    /// Delete local data directory (database included). Requires confirmation.
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub database_max_connections: Option<u32>,
    pub default_period: Option<String>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            debug: cli.debug,
            config: cli.config,
            database_path: cli.database_path,
            database_max_connections: cli.database_max_connections,
            default_period: cli.default_period,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (cli.into(), command)
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
    fn test_parse_start_with_flags() {
        let cli = Cli::try_parse_from([
            "shopdesk",
            "start",
            "--port",
            "9000",
            "--default-period",
            "this_month",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Start)));
        let config = CliConfig::from(cli);
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.default_period.as_deref(), Some("this_month"));
    }

    #[test]
    fn test_parse_prune() {
        let cli = Cli::try_parse_from(["shopdesk", "system", "prune", "--yes"]).unwrap();
        match cli.command {
            Some(Commands::System {
                command: SystemCommands::Prune { yes },
            }) => assert!(yes),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["shopdesk"]).unwrap();
        assert!(cli.command.is_none());
    }
}
