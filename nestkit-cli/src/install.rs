//! Database driver installation
//!
//! Installs the npm package for the chosen database kind. A failed install is
//! retried once with `--legacy-peer-deps`, which gets past most peer
//! dependency conflicts in older projects.

use console::style;
use tracing::{info, warn};

use crate::answers::DatabaseKind;
use crate::config::NestkitConfig;
use crate::error::{NestkitError, Result};
use crate::process::{CommandRunner, Invocation};

/// Flag appended on the retry
pub const LEGACY_PEER_DEPS: &str = "--legacy-peer-deps";

/// Installs driver packages with the configured package manager
pub struct DriverInstaller<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a NestkitConfig,
}

impl<'a> DriverInstaller<'a> {
    /// Create an installer
    #[must_use]
    pub const fn new(runner: &'a dyn CommandRunner, config: &'a NestkitConfig) -> Self {
        Self { runner, config }
    }

    /// Build the install command for `package`
    #[must_use]
    pub fn invocation(&self, package: &str, relaxed: bool) -> Invocation {
        let commands = &self.config.commands;
        let mut invocation = Invocation::new(&commands.package_manager)
            .args(["install", package, "--save"])
            .working_dir(&self.config.project.root)
            .timeout(commands.install_timeout());
        if relaxed {
            invocation = invocation.args([LEGACY_PEER_DEPS]);
        }
        invocation
    }

    /// Install the driver for `db`
    ///
    /// Returns the package installed, or `None` when no driver is configured
    /// for this kind.
    ///
    /// # Errors
    ///
    /// Returns [`NestkitError::InstallFailed`] if the relaxed retry fails too.
    pub async fn install(&self, db: DatabaseKind) -> Result<Option<String>> {
        let Some(package) = self.config.drivers.package_for(db) else {
            info!(%db, "No driver configured, skipping install");
            return Ok(None);
        };

        info!(%db, package, "Installing database driver");
        if let Err(e) = self.runner.run(&self.invocation(package, false)).await {
            warn!(package, error = %e, "Driver install failed, retrying with --legacy-peer-deps");
            eprintln!(
                "{}",
                style(format!(
                    "Initial installation failed. Retrying with {LEGACY_PEER_DEPS}..."
                ))
                .yellow()
            );

            self.runner
                .run(&self.invocation(package, true))
                .await
                .map_err(|source| NestkitError::InstallFailed {
                    package: package.to_string(),
                    source: Box::new(source),
                })?;
        }

        info!(package, "Driver installed");
        Ok(Some(package.to_string()))
    }
}
