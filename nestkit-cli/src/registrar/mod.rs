//! Root module registration
//!
//! Adds the generated feature module to the project's root module file: one
//! import statement and one entry in the `@Module` decorator's `imports`
//! array. Registration is idempotent. When the exact import line is already
//! present the file is left untouched.

pub mod module_file;

use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{NestkitError, Result};
use crate::scaffold::TemplateContext;
use module_file::ModuleFile;

/// The module to register
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRegistration {
    class_name: String,
    file_stem: String,
}

impl ModuleRegistration {
    /// Registration for `<class_name>Module` living at `./<stem>/<stem>.module`
    #[must_use]
    pub fn new(class_name: impl Into<String>, file_stem: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            file_stem: file_stem.into(),
        }
    }

    /// Module class identifier, e.g. `WidgetModule`
    #[must_use]
    pub fn module_ident(&self) -> String {
        format!("{}Module", self.class_name)
    }

    /// The import statement added to the root module file
    #[must_use]
    pub fn import_line(&self) -> String {
        format!(
            "import {{ {}Module }} from './{stem}/{stem}.module';",
            self.class_name,
            stem = self.file_stem
        )
    }
}

impl From<&TemplateContext> for ModuleRegistration {
    fn from(context: &TemplateContext) -> Self {
        Self::new(&context.class_name, &context.file_stem)
    }
}

/// What registration did to the root module file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The import line was already present; nothing written
    AlreadyRegistered,
    /// Import statement and `imports` entry are in place
    Registered,
    /// No `@Module` decorator found; only the import statement was added
    ImportOnly,
}

/// Compute the patched root module text
///
/// Returns `None` for the text when nothing needs to change.
#[must_use]
pub fn patch(source: &str, registration: &ModuleRegistration) -> (Option<String>, RegistrationOutcome) {
    let import_line = registration.import_line();
    if source.contains(&import_line) {
        return (None, RegistrationOutcome::AlreadyRegistered);
    }

    let file = ModuleFile::parse(source);
    let (text, has_decorator) = file.with_registration(&import_line, &registration.module_ident());
    let outcome = if has_decorator {
        RegistrationOutcome::Registered
    } else {
        RegistrationOutcome::ImportOnly
    };

    (Some(text), outcome)
}

/// Register a module in the root module file at `path`
///
/// The file is rewritten only if its content changes.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written.
pub fn register(path: &Path, registration: &ModuleRegistration) -> Result<RegistrationOutcome> {
    let source = fs::read_to_string(path).map_err(|e| NestkitError::io(path, e))?;

    let (patched, outcome) = patch(&source, registration);
    match &patched {
        Some(text) if *text != source => {
            fs::write(path, text).map_err(|e| NestkitError::io(path, e))?;
            debug!(path = %path.display(), "Rewrote root module");
        }
        _ => {}
    }

    match outcome {
        RegistrationOutcome::AlreadyRegistered => {
            info!(module = %registration.module_ident(), "Module already registered");
        }
        RegistrationOutcome::Registered => {
            info!(module = %registration.module_ident(), "Registered module");
        }
        RegistrationOutcome::ImportOnly => {
            warn!(
                module = %registration.module_ident(),
                path = %path.display(),
                "No @Module decorator found, added import statement only"
            );
        }
    }

    Ok(outcome)
}
