//! Template context for one service

use serde::Serialize;

use crate::answers::{Answers, Connection, DatabaseKind};

/// Substitution values shared by every template in a batch
///
/// Serialized field names are the template variable names. Connection fields
/// that do not apply to the chosen database are left out entirely, so a
/// template touching them on the wrong branch fails under strict rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateContext {
    /// `PascalCase` class prefix
    #[serde(rename = "ServiceName")]
    pub class_name: String,

    /// Lowercase file and directory stem
    #[serde(rename = "serviceName")]
    pub file_stem: String,

    /// Database kind
    pub db: DatabaseKind,

    /// Server host
    #[serde(rename = "dbHost", skip_serializing_if = "Option::is_none")]
    pub db_host: Option<String>,

    /// Server port
    #[serde(rename = "dbPort", skip_serializing_if = "Option::is_none")]
    pub db_port: Option<u16>,

    /// Server user
    #[serde(rename = "dbUsername", skip_serializing_if = "Option::is_none")]
    pub db_username: Option<String>,

    /// Server password
    #[serde(rename = "dbPassword", skip_serializing_if = "Option::is_none")]
    pub db_password: Option<String>,

    /// Document store URI
    #[serde(rename = "dbUri", skip_serializing_if = "Option::is_none")]
    pub db_uri: Option<String>,

    /// Database name
    #[serde(rename = "dbName")]
    pub db_name: String,
}

impl TemplateContext {
    /// Every variable name a template may reference
    pub const VARIABLES: [&'static str; 9] = [
        "ServiceName",
        "serviceName",
        "db",
        "dbHost",
        "dbPort",
        "dbUsername",
        "dbPassword",
        "dbUri",
        "dbName",
    ];
}

impl From<&Answers> for TemplateContext {
    fn from(answers: &Answers) -> Self {
        let mut context = Self {
            class_name: answers.service.pascal(),
            file_stem: answers.service.lower(),
            db: answers.db,
            db_host: None,
            db_port: None,
            db_username: None,
            db_password: None,
            db_uri: None,
            db_name: answers.db_name.clone(),
        };

        match &answers.connection {
            Connection::File => {}
            Connection::Server {
                host,
                port,
                username,
                password,
            } => {
                context.db_host = Some(host.clone());
                context.db_port = Some(*port);
                context.db_username = Some(username.clone());
                context.db_password = Some(password.clone());
            }
            Connection::Document { uri } => {
                context.db_uri = Some(uri.trim_end_matches('/').to_string());
            }
        }

        context
    }
}
