//! Nest CLI scaffolding
//!
//! Runs `nest generate <schematic> <name>` for the module, controller and
//! service schematics, in that order. The generator creates the service
//! directory and adds its own entry to the root module; the renderer then
//! overwrites the generated files.

use tracing::info;

use crate::config::NestkitConfig;
use crate::error::{NestkitError, Result};
use crate::process::{CommandRunner, Invocation};

/// Schematics generated for every service, in run order
pub const SCHEMATICS: [&str; 3] = ["module", "controller", "service"];

/// Invokes the framework generator
pub struct ScaffoldInvoker<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a NestkitConfig,
}

impl<'a> ScaffoldInvoker<'a> {
    /// Create an invoker
    #[must_use]
    pub const fn new(runner: &'a dyn CommandRunner, config: &'a NestkitConfig) -> Self {
        Self { runner, config }
    }

    /// Build the generate command for one schematic
    #[must_use]
    pub fn invocation(&self, schematic: &str, name: &str) -> Invocation {
        Invocation::new(&self.config.commands.generator)
            .args(["generate", schematic, name])
            .working_dir(&self.config.project.root)
            .timeout(self.config.commands.scaffold_timeout())
    }

    /// Generate the module, controller and service scaffolds for `name`
    ///
    /// Stops at the first failure. Anything the generator already created
    /// stays on disk.
    ///
    /// # Errors
    ///
    /// Returns [`NestkitError::ScaffoldFailed`] naming the schematic that
    /// failed.
    pub async fn generate(&self, name: &str) -> Result<()> {
        for schematic in SCHEMATICS {
            info!(schematic, name, "Generating scaffold");
            self.runner
                .run(&self.invocation(schematic, name))
                .await
                .map_err(|source| NestkitError::ScaffoldFailed {
                    schematic,
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessFailure;
    use crate::process::MockCommandRunner;
    use mockall::Sequence;

    #[tokio::test]
    async fn test_schematics_run_in_order() {
        let config = NestkitConfig::default();
        let mut runner = MockCommandRunner::new();
        let mut seq = Sequence::new();
        for schematic in SCHEMATICS {
            runner
                .expect_run()
                .withf(move |inv: &Invocation| {
                    inv.program == "nest" && inv.args == ["generate", schematic, "widget"]
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }

        ScaffoldInvoker::new(&runner, &config)
            .generate("widget")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let config = NestkitConfig::default();
        let mut runner = MockCommandRunner::new();
        let mut seq = Sequence::new();
        runner
            .expect_run()
            .withf(|inv: &Invocation| inv.has_arg("module"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        runner
            .expect_run()
            .withf(|inv: &Invocation| inv.has_arg("controller"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|inv| {
                Err(NestkitError::Process {
                    program: inv.to_string(),
                    failure: ProcessFailure::Cancelled,
                })
            });
        runner
            .expect_run()
            .withf(|inv: &Invocation| inv.has_arg("service"))
            .never();

        let err = ScaffoldInvoker::new(&runner, &config)
            .generate("widget")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NestkitError::ScaffoldFailed {
                schematic: "controller",
                ..
            }
        ));
    }

    #[test]
    fn test_invocation_uses_scaffold_timeout() {
        let mut config = NestkitConfig::default();
        config.commands.generator = "npx".to_string();
        config.commands.scaffold_timeout_secs = 7;
        let runner = MockCommandRunner::new();

        let invocation = ScaffoldInvoker::new(&runner, &config).invocation("service", "order");
        assert_eq!(invocation.to_string(), "npx generate service order");
        assert_eq!(invocation.timeout, Some(std::time::Duration::from_secs(7)));
    }
}
