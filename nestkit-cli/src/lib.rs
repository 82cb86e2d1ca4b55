//! nestkit: interactive service generator for NestJS projects
//!
//! One command, `nestkit generate-service`, asks for a service name and a
//! database, then:
//!
//! 1. installs the database driver package (`npm install <pkg> --save`)
//! 2. runs `nest generate module|controller|service <name>`
//! 3. renders the schema or entity, DTO, service, controller and module files
//!    with a per-service database connection
//! 4. registers the new module in `src/app.module.ts`
//!
//! # Example
//!
//! ```rust,no_run
//! use nestkit::{GenerateServiceCommand, NestkitConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = NestkitConfig::load()?;
//!     GenerateServiceCommand::new(config).execute().await
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub mod answers;
pub mod commands;
pub mod config;
pub mod error;
pub mod install;
pub mod nest;
pub mod observability;
pub mod pipeline;
pub mod process;
pub mod prompt;
pub mod registrar;
pub mod scaffold;
pub mod templates;

pub use answers::{Answers, Connection, DatabaseKind, ServiceName};
pub use commands::GenerateServiceCommand;
pub use config::NestkitConfig;
pub use error::{NestkitError, ProcessFailure, Result};
pub use pipeline::{Pipeline, PipelineReport, Stage};
pub use process::{CommandRunner, Invocation, SystemRunner};
pub use registrar::{ModuleRegistration, RegistrationOutcome};
pub use scaffold::{GeneratedFile, ServiceGenerator, TemplateContext};
