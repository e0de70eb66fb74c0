//! CLI commands for the toolchain
//!
//! Implements all command handlers for the CLI interface.

use std::io::{self, Write};
use std::sync::Arc;

use crate::compiler::{CompilerCache, SolcBuildRequest};
use crate::config::{EnvVars, PipelineConfig};
use crate::plugin::{hooks, Registry, TaskContext};
use crate::server::{DevServer, ServerHandle};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub config: PipelineConfig,
    pub registry: Registry,
}

impl AppState {
    /// Load the configuration and install the built-in hooks
    pub fn new(env: &EnvVars) -> CliResult<Self> {
        let config = PipelineConfig::from_env(env)?;
        let mut registry = Registry::new(CompilerCache::new(&config.compiler_cache_dir));
        hooks::install(&mut registry, &config);

        Ok(Self { config, registry })
    }

    /// Run a registered task, writing to stdout
    pub fn run_task(&self, name: &str, network: Option<&str>) -> CliResult<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let mut ctx = TaskContext {
            config: &self.config,
            network,
            out: &mut out,
        };
        self.registry.run_task(name, &mut ctx)?;
        Ok(())
    }
}

/// Print the accounts of a network
pub fn cmd_accounts(state: &AppState, network: Option<&str>) -> CliResult<()> {
    state.run_task(hooks::TASK_ACCOUNTS, network)
}

/// Resolve the compiler build of a version and print it as JSON
pub fn cmd_solc(state: &AppState, version: &str) -> CliResult<()> {
    let build = state
        .registry
        .get_solc_build(&SolcBuildRequest::new(version))?;
    println!("{}", serde_json::to_string_pretty(&build)?);
    Ok(())
}

/// List cached compiler versions
pub fn cmd_solc_cached(state: &AppState) -> CliResult<()> {
    let cache = CompilerCache::new(&state.config.compiler_cache_dir);
    let versions = cache.versions()?;

    if versions.is_empty() {
        println!("No compilers cached in {:?}", cache.dir());
    } else {
        println!("Cached compilers in {:?}:", cache.dir());
        for version in versions {
            println!("   {}", version);
        }
    }
    Ok(())
}

/// Print the resolved configuration as JSON
pub fn cmd_config(state: &AppState) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&state.config)?);
    Ok(())
}

/// List network profiles
pub fn cmd_networks(state: &AppState) -> CliResult<()> {
    let networks = &state.config.networks;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (name, profile) in networks.iter() {
        let marker = if name == networks.default_network { "*" } else { " " };
        writeln!(
            out,
            "{} {:<10} {}",
            marker,
            name,
            profile.url.as_deref().unwrap_or("(in-process)")
        )?;
        if let Some(gas_price) = profile.gas_price {
            writeln!(out, "     gas price: {} wei", gas_price)?;
        }
        if let Some(gas) = profile.gas {
            writeln!(out, "     gas cap: {}", gas)?;
        }
        if let Some(timeout) = profile.timeout {
            writeln!(out, "     timeout: {}ms", timeout.as_millis())?;
        }
    }
    Ok(())
}

/// List registered tasks
pub fn cmd_tasks(state: &AppState) -> CliResult<()> {
    for (name, description) in state.registry.tasks() {
        println!("   {:<12} {}", name, description);
    }
    Ok(())
}

/// Create the local dev server, run the server-created hooks and serve
pub fn cmd_node(state: AppState, port: u16) -> CliResult<()> {
    let AppState { config, registry } = state;

    let mut server = DevServer::new(port, Arc::new(config));
    registry.server_created(&mut server);

    println!(
        "Starting dev server on http://localhost:{} (keep-alive {}s)",
        server.port(),
        server.keep_alive_timeout().as_secs()
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            println!("\nShutting down dev server...");
            std::process::exit(0);
        });

        server.serve().await
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_installs_builtins() {
        let state = AppState::new(&EnvVars::default()).unwrap();
        let tasks: Vec<&str> = state.registry.tasks().map(|(name, _)| name).collect();
        assert_eq!(tasks, vec![hooks::TASK_ACCOUNTS]);
    }

    #[test]
    fn test_app_state_rejects_bad_env() {
        let env = EnvVars::from_pairs([("RPC_PORT", "not-a-port")]);
        assert!(AppState::new(&env).is_err());
    }
}
