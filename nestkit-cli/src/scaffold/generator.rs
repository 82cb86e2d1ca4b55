//! Service file generator
//!
//! Renders the five source files of a service from one [`TemplateContext`]
//! and writes them below the project's source directory:
//!
//! - `<service>/entities/<service>.{entity|schema}.ts`
//! - `<service>/dto/create-<service>.dto.ts`
//! - `<service>/<service>.service.ts`
//! - `<service>/<service>.controller.ts`
//! - `<service>/<service>.module.ts`

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::context::TemplateContext;
use crate::answers::Answers;
use crate::error::{NestkitError, Result};
use crate::templates::{all_templates, FileRole, ServiceTemplate, TemplateGroup};

/// Renders and writes the files for one service
pub struct ServiceGenerator {
    context: TemplateContext,
    group: TemplateGroup,
    env: Environment<'static>,
}

impl ServiceGenerator {
    /// Create a generator for the given answers
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to parse.
    pub fn new(answers: &Answers) -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        for template in all_templates() {
            env.add_template(template.name, template.source)
                .map_err(|source| NestkitError::Render {
                    template: template.name,
                    source,
                })?;
        }

        Ok(Self {
            context: TemplateContext::from(answers),
            group: TemplateGroup::for_database(answers.db),
            env,
        })
    }

    /// Context shared by every file in the batch
    #[must_use]
    pub const fn context(&self) -> &TemplateContext {
        &self.context
    }

    /// Selected template group
    #[must_use]
    pub const fn group(&self) -> TemplateGroup {
        self.group
    }

    /// Service directory relative to the source directory
    #[must_use]
    pub fn service_dir(&self) -> PathBuf {
        PathBuf::from(&self.context.file_stem)
    }

    /// Render all five files
    ///
    /// # Errors
    ///
    /// Returns an error if any template references a variable the context
    /// does not supply, or fails to render.
    pub fn generate(&self) -> Result<Vec<GeneratedFile>> {
        self.group
            .templates()
            .iter()
            .map(|template| self.render(template))
            .collect()
    }

    /// Render then write all files below `source_dir`
    ///
    /// Existing files are overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or a directory or file cannot be
    /// written.
    pub fn write_all(&self, source_dir: &Path) -> Result<Vec<GeneratedFile>> {
        let files = self.generate()?;

        let base = source_dir.join(self.service_dir());
        for dir in [base.join("entities"), base.join("dto")] {
            fs::create_dir_all(&dir).map_err(|e| NestkitError::io(&dir, e))?;
        }

        for file in &files {
            let full_path = source_dir.join(&file.path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).map_err(|e| NestkitError::io(parent, e))?;
            }
            fs::write(&full_path, &file.content).map_err(|e| NestkitError::io(&full_path, e))?;
            debug!(path = %full_path.display(), "Wrote file");
        }

        Ok(files)
    }

    fn render(&self, template: &ServiceTemplate) -> Result<GeneratedFile> {
        let render_error = |source| NestkitError::Render {
            template: template.name,
            source,
        };
        let content = self
            .env
            .get_template(template.name)
            .and_then(|t| t.render(&self.context))
            .map_err(render_error)?;

        Ok(GeneratedFile {
            path: self.output_path(template.role),
            content,
            description: self.describe(template.role),
        })
    }

    fn output_path(&self, role: FileRole) -> PathBuf {
        let stem = &self.context.file_stem;
        let dir = self.service_dir();
        match role {
            FileRole::Definition => dir
                .join("entities")
                .join(format!("{stem}.{}.ts", self.group.definition_suffix())),
            FileRole::Dto => dir.join("dto").join(format!("create-{stem}.dto.ts")),
            FileRole::Service => dir.join(format!("{stem}.service.ts")),
            FileRole::Controller => dir.join(format!("{stem}.controller.ts")),
            FileRole::Module => dir.join(format!("{stem}.module.ts")),
        }
    }

    fn describe(&self, role: FileRole) -> String {
        let class_name = &self.context.class_name;
        match (role, self.group) {
            (FileRole::Definition, TemplateGroup::Document) => {
                format!("Mongoose schema for {class_name}")
            }
            (FileRole::Definition, TemplateGroup::Relational) => {
                format!("TypeORM entity for {class_name}")
            }
            (FileRole::Dto, _) => format!("Create DTO for {class_name}"),
            (FileRole::Service, _) => format!("{class_name}Service"),
            (FileRole::Controller, _) => format!("{class_name}Controller"),
            (FileRole::Module, _) => format!("{class_name}Module wired to {}", self.context.db),
        }
    }
}

/// Represents a generated file
#[derive(Debug)]
pub struct GeneratedFile {
    /// Path relative to the source directory
    pub path: PathBuf,
    /// File content
    pub content: String,
    /// File description for user feedback
    pub description: String,
}
