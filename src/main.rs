//! Contract toolchain CLI
//!
//! A command-line interface for the build pipeline's tasks and hooks.

use clap::{Parser, Subcommand};
use contract_toolchain::cli::{self, AppState};
use contract_toolchain::config::EnvVars;

#[derive(Parser)]
#[command(name = "toolchain")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Compiler selection and lifecycle hooks for a smart-contract pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints the list of accounts
    Accounts {
        /// Network whose signers are listed (defaults to the default network)
        #[arg(short, long)]
        network: Option<String>,
    },

    /// Compiler operations
    Solc {
        #[command(subcommand)]
        action: SolcCommands,
    },

    /// Print the resolved configuration
    Config,

    /// List network profiles
    Networks,

    /// List registered tasks
    Tasks,

    /// Start the local dev server
    Node {
        /// Port to listen on (defaults to RPC_PORT or 8545)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum SolcCommands {
    /// Resolve the compiler build of a version
    Resolve {
        /// Solidity compiler version, e.g. 0.8.0
        version: String,
    },

    /// List cached compiler versions
    Cached,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let state = AppState::new(&EnvVars::from_process())?;

    match cli.command {
        Commands::Accounts { network } => {
            cli::cmd_accounts(&state, network.as_deref())?;
        }

        Commands::Solc { action } => match action {
            SolcCommands::Resolve { version } => {
                cli::cmd_solc(&state, &version)?;
            }
            SolcCommands::Cached => {
                cli::cmd_solc_cached(&state)?;
            }
        },

        Commands::Config => {
            cli::cmd_config(&state)?;
        }

        Commands::Networks => {
            cli::cmd_networks(&state)?;
        }

        Commands::Tasks => {
            cli::cmd_tasks(&state)?;
        }

        Commands::Node { port } => {
            let port = port.unwrap_or(state.config.rpc_port);
            cli::cmd_node(state, port)?;
        }
    }

    Ok(())
}
