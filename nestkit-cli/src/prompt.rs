//! Interactive answer collection

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use tracing::debug;

use crate::answers::{Answers, Connection, DatabaseKind, ServiceName};
use crate::error::{NestkitError, Result};

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_USERNAME: &str = "root";
const DEFAULT_PASSWORD: &str = "password";
const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";

/// Source of answers to the generator's questions
pub trait Prompter {
    /// Ask for free text; an empty reply yields `default` when one is given
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Ask for a masked secret; may return an empty string
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn password(&self, prompt: &str) -> Result<String>;

    /// Ask the user to pick one of `items`, returning its index
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;

    /// Tell the user a reply was rejected
    fn warn(&self, message: &str);
}

/// Prompts on the controlling terminal
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    /// Create a prompter with the colorful theme
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn password(&self, prompt: &str) -> Result<String> {
        Ok(Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?)
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?)
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", style("!").yellow().bold(), style(message).yellow());
    }
}

/// Ask every question for one run
///
/// Host, port, username and password are only asked for server databases,
/// the URI only for `MongoDB`. The database name is always asked and defaults
/// to `<service>_db`.
///
/// # Errors
///
/// Returns an error if the prompter fails or picks a choice that does not exist.
pub fn collect_answers(prompter: &dyn Prompter) -> Result<Answers> {
    let service = ask_service_name(prompter)?;
    let db = ask_database(prompter)?;

    let connection = if db.uses_server_credentials() {
        let host = prompter.input("Database host", Some(DEFAULT_HOST))?;
        let port = ask_port(prompter, db)?;
        let username = prompter.input("Database username", Some(DEFAULT_USERNAME))?;
        let password = match prompter.password("Database password")? {
            password if password.is_empty() => DEFAULT_PASSWORD.to_string(),
            password => password,
        };
        Connection::Server {
            host,
            port,
            username,
            password,
        }
    } else if db.uses_uri() {
        Connection::Document {
            uri: prompter.input("MongoDB connection URI", Some(DEFAULT_MONGO_URI))?,
        }
    } else {
        Connection::File
    };

    let db_name = prompter.input("Database name", Some(&service.default_db_name()))?;

    debug!(service = %service, db = %db, "Answers collected");
    Ok(Answers {
        service,
        db,
        connection,
        db_name,
    })
}

fn ask_service_name(prompter: &dyn Prompter) -> Result<ServiceName> {
    loop {
        let raw = prompter.input("Service name", None)?;
        match ServiceName::parse(&raw) {
            Ok(name) => return Ok(name),
            Err(e) => prompter.warn(&e.to_string()),
        }
    }
}

fn ask_database(prompter: &dyn Prompter) -> Result<DatabaseKind> {
    let labels: Vec<&str> = DatabaseKind::ALL.iter().map(|kind| kind.as_str()).collect();
    let default = DatabaseKind::ALL
        .iter()
        .position(|kind| *kind == DatabaseKind::Mysql)
        .unwrap_or_default();

    let index = prompter.select("Database type", &labels, default)?;
    DatabaseKind::ALL
        .get(index)
        .copied()
        .ok_or_else(|| NestkitError::UnknownDatabase(index.to_string()))
}

fn ask_port(prompter: &dyn Prompter, db: DatabaseKind) -> Result<u16> {
    let default = db.default_port().map(|port| port.to_string());
    loop {
        let raw = prompter.input("Database port", default.as_deref())?;
        match raw.trim().parse::<u16>() {
            Ok(port) => return Ok(port),
            Err(_) => prompter.warn(&format!("'{raw}' is not a valid port number")),
        }
    }
}
