//! Service template selection
//!
//! Two groups exist. The document group (`MongoDB`) defines its model as a
//! Mongoose schema, the relational group (`MySQL`, `PostgreSQL`, `SQLite`) as a
//! `TypeORM` entity. Both share the DTO, service, controller and module
//! templates, which branch on `db` internally.

use crate::answers::DatabaseKind;

pub mod files;
pub use files::*;

/// What a rendered file is for; decides where it lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    /// Schema or entity definition under `entities/`
    Definition,
    /// Create DTO under `dto/`
    Dto,
    /// Injectable service
    Service,
    /// REST controller
    Controller,
    /// Feature module
    Module,
}

/// A named template source
#[derive(Debug, Clone, Copy)]
pub struct ServiceTemplate {
    /// Name registered with the template engine
    pub name: &'static str,
    /// Template text
    pub source: &'static str,
    /// What the output is for
    pub role: FileRole,
}

const SCHEMA: ServiceTemplate = ServiceTemplate {
    name: "schema.ts",
    source: SCHEMA_TS,
    role: FileRole::Definition,
};

const ENTITY: ServiceTemplate = ServiceTemplate {
    name: "entity.ts",
    source: ENTITY_TS,
    role: FileRole::Definition,
};

/// Templates every group renders after its definition
const SHARED: [ServiceTemplate; 4] = [
    ServiceTemplate {
        name: "dto.ts",
        source: DTO_TS,
        role: FileRole::Dto,
    },
    ServiceTemplate {
        name: "service.ts",
        source: SERVICE_TS,
        role: FileRole::Service,
    },
    ServiceTemplate {
        name: "controller.ts",
        source: CONTROLLER_TS,
        role: FileRole::Controller,
    },
    ServiceTemplate {
        name: "module.ts",
        source: MODULE_TS,
        role: FileRole::Module,
    },
];

/// Template group selected by database kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateGroup {
    /// Document store: Mongoose schema
    Document,
    /// Relational or embedded file database: `TypeORM` entity
    Relational,
}

impl TemplateGroup {
    /// Group for a database kind
    #[must_use]
    pub const fn for_database(db: DatabaseKind) -> Self {
        match db {
            DatabaseKind::Mongodb => Self::Document,
            DatabaseKind::Sqlite | DatabaseKind::Mysql | DatabaseKind::Postgres => {
                Self::Relational
            }
        }
    }

    /// File name suffix of the definition file (`schema` or `entity`)
    #[must_use]
    pub const fn definition_suffix(self) -> &'static str {
        match self {
            Self::Document => "schema",
            Self::Relational => "entity",
        }
    }

    /// The definition template followed by the shared ones
    #[must_use]
    pub const fn templates(self) -> [ServiceTemplate; 5] {
        let definition = match self {
            Self::Document => SCHEMA,
            Self::Relational => ENTITY,
        };
        [definition, SHARED[0], SHARED[1], SHARED[2], SHARED[3]]
    }
}

/// Every template source, for engine registration
#[must_use]
pub fn all_templates() -> Vec<ServiceTemplate> {
    let mut templates = vec![SCHEMA, ENTITY];
    templates.extend(SHARED);
    templates
}
