//! Interactive service generation command
//!
//! ```bash
//! cd my-nest-app
//! nestkit generate-service
//! ```

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::answers::Answers;
use crate::config::NestkitConfig;
use crate::pipeline::{Pipeline, PipelineReport};
use crate::process::SystemRunner;
use crate::prompt::TerminalPrompter;
use crate::registrar::RegistrationOutcome;

/// Generate a NestJS service with its own database connection
pub struct GenerateServiceCommand {
    config: NestkitConfig,
}

impl GenerateServiceCommand {
    /// Create a command using `config`
    #[must_use]
    pub const fn new(config: NestkitConfig) -> Self {
        Self { config }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The terminal cannot be read
    /// - The driver install fails after the relaxed retry
    /// - `nest generate` fails, times out or is interrupted
    /// - A file cannot be written or the root module cannot be read
    pub async fn execute(&self) -> Result<()> {
        let registration_path = self.config.project.registration_path();
        if !registration_path.is_file() {
            anyhow::bail!(
                "Root module not found at {}. Run this command from the root of a NestJS project.",
                registration_path.display()
            );
        }

        println!("\n{}", style("Generating NestJS service").cyan().bold());
        println!();

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Failed to set progress style")?,
        );

        let runner = SystemRunner;
        let mut pipeline = Pipeline::new(&runner, &self.config).with_progress(spinner);

        let answers = pipeline
            .collect(&TerminalPrompter::new())
            .context("Failed to collect answers")?;
        println!();

        let report = pipeline.execute(&answers).await.with_context(|| {
            format!(
                "Failed to generate service '{}' (last completed stage: {})",
                answers.service,
                pipeline
                    .history()
                    .iter()
                    .rev()
                    .nth(1)
                    .map_or_else(|| "idle".to_string(), ToString::to_string)
            )
        })?;

        self.print_success(&answers, &report);

        Ok(())
    }

    fn print_success(&self, answers: &Answers, report: &PipelineReport) {
        let source_dir = self.config.project.source_path();

        println!();
        if let Some(driver) = &report.driver {
            println!("{} Installed {}", style("✓").green(), style(driver).cyan());
        }
        println!(
            "{} Generated {} scaffold",
            style("✓").green(),
            style(answers.service.lower()).cyan()
        );
        for file in &report.files {
            println!(
                "  {} {} {}",
                style("✓").green(),
                style(source_dir.join(&file.path).display()).cyan(),
                style(format!("({})", file.description)).dim()
            );
        }

        let registration_path = self.config.project.registration_path();
        match report.registration {
            RegistrationOutcome::Registered => println!(
                "{} Registered {}Module in {}",
                style("✓").green(),
                answers.service.pascal(),
                registration_path.display()
            ),
            RegistrationOutcome::AlreadyRegistered => println!(
                "{} {}Module already registered in {}",
                style("✓").green(),
                answers.service.pascal(),
                registration_path.display()
            ),
            RegistrationOutcome::ImportOnly => println!(
                "{} No @Module decorator in {}. Added the import only; add {}Module to the imports array by hand.",
                style("⚠").yellow(),
                registration_path.display(),
                answers.service.pascal()
            ),
        }

        println!();
        println!("{}", style("✓ Service generated successfully!").green().bold());
        println!();
        println!("{}", style("Next steps:").bold());
        println!();
        println!("  {} Start the application:", style("1.").cyan());
        println!("     {} {}", style("$").dim(), style("npm run start:dev").cyan());
        println!();
        println!("  {} Try the new endpoint:", style("2.").cyan());
        println!(
            "     {} {}",
            style("$").dim(),
            style(format!("curl http://localhost:3000/{}", answers.service.lower())).cyan()
        );
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_refuses_to_run_outside_a_project() {
        let dir = tempdir().unwrap();
        let mut config = NestkitConfig::default();
        config.project.root = dir.path().to_path_buf();

        let err = GenerateServiceCommand::new(config).execute().await.unwrap_err();
        assert!(err.to_string().contains("Root module not found"));
    }
}
