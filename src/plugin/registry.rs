//! Extension point registry
//!
//! The task framework exposes three kinds of extension points:
//!
//! - the overridable `get-solc-build` point, where each handler receives a
//!   continuation to the handler registered before it and, at the bottom of
//!   the chain, to the default [`CompilerCache`] lookup,
//! - the `server-created` notification, fired once per local server,
//! - named tasks runnable from the command line.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use thiserror::Error;

use crate::accounts::SignerError;
use crate::compiler::{CompilerCache, CompilerError, SolcBuild, SolcBuildRequest};
use crate::config::{ConfigError, PipelineConfig};
use crate::server::ServerHandle;

/// Task errors
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Unknown task: {0}")]
    UnknownTask(String),
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Signer error: {0}")]
    SignerError(#[from] SignerError),
    #[error("Compiler error: {0}")]
    CompilerError(#[from] CompilerError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The named extension points of the task framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionPoint {
    GetSolcBuild,
    ServerCreated,
    Task(String),
}

impl ExtensionPoint {
    pub fn name(&self) -> &str {
        match self {
            Self::GetSolcBuild => "compile:solidity:get-solc-build",
            Self::ServerCreated => "node:server-created",
            Self::Task(name) => name.as_str(),
        }
    }
}

/// Continuation into the rest of the `get-solc-build` chain
pub type SolcBuildNext<'a> = &'a dyn Fn() -> Result<SolcBuild, CompilerError>;

/// Handler of the `get-solc-build` point
pub type SolcBuildHandler = Arc<
    dyn Fn(&SolcBuildRequest, SolcBuildNext<'_>) -> Result<SolcBuild, CompilerError>
        + Send
        + Sync,
>;

/// Handler of the `server-created` point
pub type ServerCreatedHandler = Arc<dyn Fn(&mut dyn ServerHandle) + Send + Sync>;

/// What a task sees when it runs
pub struct TaskContext<'a> {
    pub config: &'a PipelineConfig,
    /// Network selected on the command line, if any
    pub network: Option<&'a str>,
    pub out: &'a mut dyn Write,
}

/// Handler of a named task
pub type TaskHandler = Arc<dyn Fn(&mut TaskContext<'_>) -> Result<(), TaskError> + Send + Sync>;

struct TaskDefinition {
    description: String,
    handler: TaskHandler,
}

/// Registry of extension point handlers
pub struct Registry {
    cache: CompilerCache,
    solc_build_handlers: Vec<SolcBuildHandler>,
    server_created_handlers: Vec<ServerCreatedHandler>,
    tasks: BTreeMap<String, TaskDefinition>,
}

impl Registry {
    /// Create a registry whose `get-solc-build` chain ends at `cache`
    pub fn new(cache: CompilerCache) -> Self {
        Self {
            cache,
            solc_build_handlers: Vec::new(),
            server_created_handlers: Vec::new(),
            tasks: BTreeMap::new(),
        }
    }

    /// Override `get-solc-build`. The handler runs before every handler
    /// registered earlier.
    pub fn override_solc_build<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&SolcBuildRequest, SolcBuildNext<'_>) -> Result<SolcBuild, CompilerError>
            + Send
            + Sync
            + 'static,
    {
        self.solc_build_handlers.push(Arc::new(handler));
        self
    }

    /// Subscribe to `server-created`
    pub fn on_server_created<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut dyn ServerHandle) + Send + Sync + 'static,
    {
        self.server_created_handlers.push(Arc::new(handler));
        self
    }

    /// Define or replace a named task
    pub fn task<F>(&mut self, name: &str, description: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut TaskContext<'_>) -> Result<(), TaskError> + Send + Sync + 'static,
    {
        if self.tasks.contains_key(name) {
            log::debug!("Replacing task {}", name);
        }
        self.tasks.insert(
            name.to_string(),
            TaskDefinition {
                description: description.to_string(),
                handler: Arc::new(handler),
            },
        );
        self
    }

    /// Number of handlers attached to an extension point
    pub fn handler_count(&self, point: &ExtensionPoint) -> usize {
        match point {
            ExtensionPoint::GetSolcBuild => self.solc_build_handlers.len(),
            ExtensionPoint::ServerCreated => self.server_created_handlers.len(),
            ExtensionPoint::Task(name) => usize::from(self.tasks.contains_key(name)),
        }
    }

    /// Resolve the compiler build of one version through the handler chain
    pub fn get_solc_build(&self, request: &SolcBuildRequest) -> Result<SolcBuild, CompilerError> {
        log::debug!(
            "Running {} for solc {}",
            ExtensionPoint::GetSolcBuild.name(),
            request.version
        );
        self.run_solc_build(request, self.solc_build_handlers.len())
    }

    fn run_solc_build(
        &self,
        request: &SolcBuildRequest,
        depth: usize,
    ) -> Result<SolcBuild, CompilerError> {
        match depth.checked_sub(1) {
            None => self.cache.get_solc_build(&request.version),
            Some(below) => {
                let next = || self.run_solc_build(request, below);
                (self.solc_build_handlers[below])(request, &next)
            }
        }
    }

    /// Notify subscribers that a local server was created
    pub fn server_created(&self, server: &mut dyn ServerHandle) {
        log::debug!(
            "Running {} ({} handlers)",
            ExtensionPoint::ServerCreated.name(),
            self.server_created_handlers.len()
        );
        for handler in &self.server_created_handlers {
            handler(&mut *server);
        }
    }

    /// Run a named task
    pub fn run_task(&self, name: &str, ctx: &mut TaskContext<'_>) -> Result<(), TaskError> {
        let task = self
            .tasks
            .get(name)
            .ok_or_else(|| TaskError::UnknownTask(name.to_string()))?;
        (task.handler)(ctx)
    }

    /// Task names with their descriptions, sorted by name
    pub fn tasks(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tasks
            .iter()
            .map(|(name, task)| (name.as_str(), task.description.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvVars;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn build(path: &str, version: &str) -> SolcBuild {
        SolcBuild {
            compiler_path: PathBuf::from(path),
            is_solc_js: false,
            version: version.to_string(),
            long_version: version.to_string(),
        }
    }

    fn empty_registry() -> Registry {
        Registry::new(CompilerCache::new("/nonexistent/compilers"))
    }

    #[test]
    fn test_chain_falls_through_to_cache() {
        let registry = empty_registry();
        let err = registry
            .get_solc_build(&SolcBuildRequest::new("0.8.0"))
            .unwrap_err();
        assert!(matches!(err, CompilerError::NotCached { .. }));
    }

    #[test]
    fn test_latest_override_runs_first() {
        let mut registry = empty_registry();
        registry
            .override_solc_build(|req, _next| Ok(build("/first", &req.version)))
            .override_solc_build(|req, next| {
                if req.version == "0.8.0" {
                    Ok(build("/second", &req.version))
                } else {
                    next()
                }
            });

        let hit = registry
            .get_solc_build(&SolcBuildRequest::new("0.8.0"))
            .unwrap();
        assert_eq!(hit.compiler_path, PathBuf::from("/second"));

        let passed_down = registry
            .get_solc_build(&SolcBuildRequest::new("0.7.6"))
            .unwrap();
        assert_eq!(passed_down.compiler_path, PathBuf::from("/first"));
        assert_eq!(registry.handler_count(&ExtensionPoint::GetSolcBuild), 2);
    }

    struct FakeServer(Duration);

    impl ServerHandle for FakeServer {
        fn keep_alive_timeout(&self) -> Duration {
            self.0
        }

        fn set_keep_alive_timeout(&mut self, timeout: Duration) {
            self.0 = timeout;
        }
    }

    #[test]
    fn test_server_created_runs_every_handler_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut registry = empty_registry();
        registry
            .on_server_created(|server| server.set_keep_alive_timeout(Duration::from_secs(1)))
            .on_server_created(move |server| {
                counter.fetch_add(1, Ordering::SeqCst);
                let doubled = server.keep_alive_timeout() * 2;
                server.set_keep_alive_timeout(doubled);
            });

        let mut server = FakeServer(Duration::from_secs(5));
        registry.server_created(&mut server);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(server.0, Duration::from_secs(2));
    }

    #[test]
    fn test_run_task() {
        let mut registry = empty_registry();
        registry.task("hello", "Prints a greeting", |ctx| {
            writeln!(ctx.out, "hello {}", ctx.network.unwrap_or("default"))?;
            Ok(())
        });

        let config = PipelineConfig::from_env(&EnvVars::default()).unwrap();
        let mut out = Vec::new();
        let mut ctx = TaskContext {
            config: &config,
            network: Some("goerli"),
            out: &mut out,
        };
        registry.run_task("hello", &mut ctx).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello goerli\n");

        let tasks: Vec<_> = registry.tasks().collect();
        assert_eq!(tasks, vec![("hello", "Prints a greeting")]);
    }

    #[test]
    fn test_unknown_task() {
        let registry = empty_registry();
        let config = PipelineConfig::from_env(&EnvVars::default()).unwrap();
        let mut out = Vec::new();
        let mut ctx = TaskContext {
            config: &config,
            network: None,
            out: &mut out,
        };
        assert!(matches!(
            registry.run_task("deploy", &mut ctx),
            Err(TaskError::UnknownTask(_))
        ));
    }
}
