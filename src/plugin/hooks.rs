//! Built-in extensions of the task framework

use std::time::Duration;

use super::registry::{Registry, SolcBuildNext, TaskContext, TaskError};
use crate::accounts::{list_accounts, provider_for};
use crate::compiler::{resolve, CompilerError, NativeCompiler, SolcBuild, SolcBuildRequest};
use crate::config::PipelineConfig;
use crate::server::ServerHandle;

/// Name of the account listing task
pub const TASK_ACCOUNTS: &str = "accounts";

/// Keep-alive timeout of local servers; tests with long pauses outlive the
/// 5 second default
pub const KEEP_ALIVE_TIMEOUT: Duration = Duration::from_millis(5 * 60 * 1000);

/// Print the addresses of the selected network's signers
pub fn accounts_task(ctx: &mut TaskContext<'_>) -> Result<(), TaskError> {
    let (name, profile) = ctx.config.networks.resolve(ctx.network)?;
    log::debug!("Listing accounts of network {}", name);

    let provider = provider_for(&profile.accounts);
    list_accounts(provider.as_ref(), &mut *ctx.out)?;
    Ok(())
}

/// Set the keep-alive timeout of a freshly created server
pub fn raise_keep_alive(server: &mut dyn ServerHandle) {
    server.set_keep_alive_timeout(KEEP_ALIVE_TIMEOUT);
}

/// `get-solc-build` override serving the native compiler
pub fn native_solc_override(
    native: NativeCompiler,
) -> impl Fn(&SolcBuildRequest, SolcBuildNext<'_>) -> Result<SolcBuild, CompilerError> + Send + Sync
{
    move |request, next| resolve(request, &native, next).map(|resolved| resolved.into_build())
}

/// Register the built-in tasks and hooks
pub fn install(registry: &mut Registry, config: &PipelineConfig) {
    registry
        .task(TASK_ACCOUNTS, "Prints the list of accounts", accounts_task)
        .on_server_created(raise_keep_alive)
        .override_solc_build(native_solc_override(config.native_compiler.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::CompilerCache;
    use crate::config::EnvVars;
    use crate::server::{DevServer, DEFAULT_KEEP_ALIVE};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;

    const PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn installed(env: &EnvVars, cache_dir: &std::path::Path) -> (PipelineConfig, Registry) {
        let config = PipelineConfig::from_env(env).unwrap();
        let mut registry = Registry::new(CompilerCache::new(cache_dir));
        install(&mut registry, &config);
        (config, registry)
    }

    #[test]
    fn test_native_version_skips_cache() {
        let temp_dir = tempfile::tempdir().unwrap();
        let env = EnvVars::from_pairs([("SOLC_VERSION", "0.8.0"), ("SOLC_PATH", "/usr/bin/solc")]);
        let (_, registry) = installed(&env, temp_dir.path());

        let build = registry
            .get_solc_build(&SolcBuildRequest::new("0.8.0"))
            .unwrap();
        assert_eq!(build, SolcBuild::native(PathBuf::from("/usr/bin/solc"), "0.8.0"));
    }

    #[test]
    fn test_other_versions_come_from_cache() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("0.8.19")).unwrap();
        fs::write(temp_dir.path().join("0.8.19/soljson.js"), "").unwrap();

        let env = EnvVars::from_pairs([("SOLC_VERSION", "0.8.0")]);
        let (_, registry) = installed(&env, temp_dir.path());

        let build = registry
            .get_solc_build(&SolcBuildRequest::new("0.8.19"))
            .unwrap();
        assert!(build.is_solc_js);
        assert_eq!(build.version, "0.8.19");

        let missing = registry.get_solc_build(&SolcBuildRequest::new("0.6.12"));
        assert!(matches!(missing, Err(CompilerError::NotCached { .. })));
    }

    #[test]
    fn test_server_hook_sets_five_minutes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (config, registry) = installed(&EnvVars::default(), temp_dir.path());

        let mut server = DevServer::new(0, Arc::new(config));
        assert_eq!(server.keep_alive_timeout(), DEFAULT_KEEP_ALIVE);

        registry.server_created(&mut server);
        assert_eq!(server.keep_alive_timeout().as_millis(), 300_000);
    }

    #[test]
    fn test_keep_alive_is_a_plain_assignment() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (config, _) = installed(&EnvVars::default(), temp_dir.path());

        let mut server = DevServer::new(0, Arc::new(config));
        server.set_keep_alive_timeout(Duration::from_secs(900));
        raise_keep_alive(&mut server);
        assert_eq!(server.keep_alive_timeout(), KEEP_ALIVE_TIMEOUT);
    }

    #[test]
    fn test_accounts_task_lists_network_signers() {
        let temp_dir = tempfile::tempdir().unwrap();
        let env = EnvVars::from_pairs([("TEST_MNEMONIC", PHRASE)]);
        let (config, registry) = installed(&env, temp_dir.path());

        let mut out = Vec::new();
        let mut ctx = TaskContext {
            config: &config,
            network: Some("hardhat"),
            out: &mut out,
        };
        registry.run_task(TASK_ACCOUNTS, &mut ctx).unwrap();

        let printed = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines.len(), 20);
        assert_eq!(
            lines[0],
            crate::crypto::KeyPair::derive(PHRASE, 0).unwrap().address()
        );
    }

    #[test]
    fn test_in_process_network_has_default_accounts() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (config, registry) = installed(&EnvVars::default(), temp_dir.path());

        let mut out = Vec::new();
        let mut ctx = TaskContext {
            config: &config,
            network: Some("hardhat"),
            out: &mut out,
        };
        registry.run_task(TASK_ACCOUNTS, &mut ctx).unwrap();

        let printed = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines.len(), 20);
        assert_eq!(lines[0], "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(lines[1], "0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
    }

    #[test]
    fn test_accounts_task_unknown_network() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (config, registry) = installed(&EnvVars::default(), temp_dir.path());

        let mut out = Vec::new();
        let mut ctx = TaskContext {
            config: &config,
            network: Some("mainnet"),
            out: &mut out,
        };
        assert!(matches!(
            registry.run_task(TASK_ACCOUNTS, &mut ctx),
            Err(TaskError::ConfigError(_))
        ));
    }
}
