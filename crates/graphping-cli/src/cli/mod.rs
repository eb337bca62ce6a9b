//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use graphping_core::config::Config;
use graphping_core::core::interrupt;

mod commands;

#[derive(Parser)]
#[command(name = "graphping")]
#[command(version)]
#[command(about = "Interactive connectivity probe for graph database endpoints")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    connection: ConnectionArgs,
}

/// Connection overrides shared by the interactive probe and `check`.
#[derive(clap::Args, Debug, Clone, Default)]
struct ConnectionArgs {
    /// Endpoint to dial (overrides config)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Username for basic auth (overrides config)
    #[arg(long, global = true)]
    username: Option<String>,

    /// Password for basic auth (overrides config)
    #[arg(long, global = true)]
    password: Option<String>,

    /// Database name for the transaction endpoint (overrides config)
    #[arg(long, global = true)]
    database: Option<String>,

    /// Read-only query reissued on every tick (overrides config)
    #[arg(long, global = true)]
    query: Option<String>,
}

impl ConnectionArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(username) = &self.username {
            config.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if let Some(query) = &self.query {
            config.query = query.clone();
        }
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Dial the endpoint, run the query once, and exit
    Check,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("load config")?;
    cli.connection.apply(&mut config);

    // default to the interactive probe
    let Some(command) = cli.command else {
        interrupt::init();
        return commands::watch::run(config).await;
    };

    match command {
        Commands::Check => commands::check::run(&config).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
