//! Service generation pipeline
//!
//! Strictly sequential: prompts, driver install, framework scaffold, file
//! rendering, root module registration. The first failure aborts the run;
//! later stages never start and nothing already done is rolled back.

use console::style;
use indicatif::ProgressBar;
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

use crate::answers::Answers;
use crate::config::NestkitConfig;
use crate::error::Result;
use crate::install::DriverInstaller;
use crate::nest::ScaffoldInvoker;
use crate::process::CommandRunner;
use crate::prompt::{collect_answers, Prompter};
use crate::registrar::{self, ModuleRegistration, RegistrationOutcome};
use crate::scaffold::{GeneratedFile, ServiceGenerator};

/// Pipeline progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet
    Idle,
    /// Answers collected
    PromptsCollected,
    /// Driver package installed (or none needed)
    DriverInstalled,
    /// Framework scaffold generated
    ScaffoldCreated,
    /// Service files written
    FilesRendered,
    /// Root module updated
    Registered,
    /// Finished
    Done,
    /// Stopped by a failure
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::PromptsCollected => "prompts-collected",
            Self::DriverInstalled => "driver-installed",
            Self::ScaffoldCreated => "scaffold-created",
            Self::FilesRendered => "files-rendered",
            Self::Registered => "registered",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// What a finished run produced
#[derive(Debug)]
pub struct PipelineReport {
    /// Driver package installed, if any
    pub driver: Option<String>,
    /// Files written, relative to the source directory
    pub files: Vec<GeneratedFile>,
    /// Root module registration result
    pub registration: RegistrationOutcome,
}

/// Drives one service generation
pub struct Pipeline<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a NestkitConfig,
    history: Vec<Stage>,
    progress: ProgressBar,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline in the `Idle` stage
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner, config: &'a NestkitConfig) -> Self {
        Self {
            runner,
            config,
            history: vec![Stage::Idle],
            progress: ProgressBar::hidden(),
        }
    }

    /// Report progress on `spinner` instead of staying silent
    ///
    /// The spinner only ticks while files are rendered and registered; install
    /// and scaffold output goes straight to the terminal.
    #[must_use]
    pub fn with_progress(mut self, spinner: ProgressBar) -> Self {
        self.progress = spinner;
        self
    }

    /// Current stage
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.history.last().copied().unwrap_or(Stage::Idle)
    }

    /// Every stage entered so far, in order
    #[must_use]
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    /// Ask the user for everything the run needs
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read; the pipeline is then
    /// aborted.
    pub fn collect(&mut self, prompter: &dyn Prompter) -> Result<Answers> {
        let answers = collect_answers(prompter);
        let answers = self.checkpoint(answers, Stage::PromptsCollected)?;
        info!(service = %answers.service, db = %answers.db, "Collected answers");
        Ok(answers)
    }

    /// Run the remaining stages for `answers`
    ///
    /// # Errors
    ///
    /// Returns the first stage failure; the pipeline is then aborted.
    pub async fn execute(&mut self, answers: &Answers) -> Result<PipelineReport> {
        self.step(&format!("{} driver", answers.db));
        let installed = DriverInstaller::new(self.runner, self.config)
            .install(answers.db)
            .await;
        let driver = self.checkpoint(installed, Stage::DriverInstalled)?;

        self.step(&format!("{} scaffold", answers.service.lower()));
        let scaffolded = ScaffoldInvoker::new(self.runner, self.config)
            .generate(&answers.service.lower())
            .await;
        self.checkpoint(scaffolded, Stage::ScaffoldCreated)?;

        self.progress.enable_steady_tick(Duration::from_millis(100));
        self.progress.set_message("Rendering service files...");
        let source_dir = self.config.project.source_path();
        let rendered = ServiceGenerator::new(answers)
            .and_then(|generator| Ok((generator.write_all(&source_dir)?, generator)));
        let (files, generator) = self.checkpoint(rendered, Stage::FilesRendered)?;

        self.progress.set_message("Registering module...");
        let registration = ModuleRegistration::from(generator.context());
        let registered =
            registrar::register(&self.config.project.registration_path(), &registration);
        let registration = self.checkpoint(registered, Stage::Registered)?;

        self.progress.finish_and_clear();
        self.advance(Stage::Done);
        Ok(PipelineReport {
            driver,
            files,
            registration,
        })
    }

    fn checkpoint<T>(&mut self, result: Result<T>, next: Stage) -> Result<T> {
        match result {
            Ok(value) => {
                self.advance(next);
                Ok(value)
            }
            Err(e) => {
                error!(stage = %self.stage(), error = %e, "Pipeline aborted");
                self.progress.finish_and_clear();
                self.advance(Stage::Aborted);
                Err(e)
            }
        }
    }

    fn step(&self, what: &str) {
        if !self.progress.is_hidden() {
            println!("{} {}", style("Generating").green().bold(), style(what).bold());
        }
    }

    fn advance(&mut self, next: Stage) {
        info!(from = %self.stage(), to = %next, "Stage transition");
        self.history.push(next);
    }
}
