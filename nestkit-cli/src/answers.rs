//! User answers for one generation run
//!
//! The prompt collector produces an [`Answers`] record. Every later stage reads
//! from it, nothing writes back. Connection parameters are modelled as a
//! [`Connection`] whose variant is fixed by the chosen [`DatabaseKind`], so a
//! sqlite run can never carry a host or a mongodb run a password.

use convert_case::{Case, Casing};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{NestkitError, Result};

/// Supported database backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    /// `SQLite` file database via `TypeORM`
    Sqlite,
    /// `MySQL` via `TypeORM`
    Mysql,
    /// `PostgreSQL` via `TypeORM`
    Postgres,
    /// `MongoDB` via Mongoose
    Mongodb,
}

impl DatabaseKind {
    /// All kinds in the order they are offered to the user
    pub const ALL: [Self; 4] = [Self::Sqlite, Self::Mysql, Self::Postgres, Self::Mongodb];

    /// Lowercase identifier, also the `TypeORM` connection `type`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
            Self::Mongodb => "mongodb",
        }
    }

    /// Default server port offered in the prompt
    ///
    /// `None` for the file database, which has no server to connect to.
    #[must_use]
    pub const fn default_port(self) -> Option<u16> {
        match self {
            Self::Mysql => Some(3306),
            Self::Postgres => Some(5432),
            Self::Mongodb => Some(27017),
            Self::Sqlite => None,
        }
    }

    /// Whether the user is asked for host, port and credentials
    #[must_use]
    pub const fn uses_server_credentials(self) -> bool {
        matches!(self, Self::Mysql | Self::Postgres)
    }

    /// Whether the user is asked for a connection URI
    #[must_use]
    pub const fn uses_uri(self) -> bool {
        matches!(self, Self::Mongodb)
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseKind {
    type Err = NestkitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NestkitError::UnknownDatabase(s.to_string()))
    }
}

/// Validated service name
///
/// Must be an ASCII letter followed by ASCII letters or digits, after trimming
/// surrounding whitespace. Anything else would end up in class names and
/// directory paths, so it is rejected rather than sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceName {
    raw: String,
}

impl ServiceName {
    /// Validate user input
    ///
    /// # Errors
    ///
    /// Returns [`NestkitError::InvalidServiceName`] if the name is empty, does
    /// not start with a letter, or contains anything but letters and digits.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = |reason| NestkitError::InvalidServiceName {
            name: input.to_string(),
            reason,
        };

        let first = trimmed.chars().next().ok_or_else(|| invalid("name is empty"))?;
        if !first.is_ascii_alphabetic() {
            return Err(invalid("must start with a letter"));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid("only letters and digits are allowed"));
        }

        Ok(Self {
            raw: trimmed.to_string(),
        })
    }

    /// Name as typed (trimmed)
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Class prefix, e.g. `widget` → `Widget`, `userProfile` → `Userprofile`
    ///
    /// Derived from [`lower`](Self::lower), the name handed to `nest generate`,
    /// so it matches the class the Nest CLI declares and registers.
    #[must_use]
    pub fn pascal(&self) -> String {
        self.lower().from_case(Case::Flat).to_case(Case::Pascal)
    }

    /// File and directory stem, e.g. `userProfile` → `userprofile`
    #[must_use]
    pub fn lower(&self) -> String {
        self.raw.to_lowercase()
    }

    /// Default database name offered in the prompt
    #[must_use]
    pub fn default_db_name(&self) -> String {
        format!("{}_db", self.raw)
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Connection parameters, shaped by the database kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    /// Embedded file database; only the database name is needed
    File,
    /// Network server with credentials
    Server {
        /// Host name
        host: String,
        /// TCP port
        port: u16,
        /// User name
        username: String,
        /// Password
        password: String,
    },
    /// Document store reached through a connection URI
    Document {
        /// Base URI without database name, e.g. `mongodb://localhost:27017`
        uri: String,
    },
}

/// Everything collected from the user for one run
#[derive(Debug, Clone)]
pub struct Answers {
    /// Service to generate
    pub service: ServiceName,
    /// Chosen backend
    pub db: DatabaseKind,
    /// Connection parameters matching `db`
    pub connection: Connection,
    /// Database name
    pub db_name: String,
}
