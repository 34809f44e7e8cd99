use std::path::PathBuf;

use thiserror::Error;

use super::params::SemanticType;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Cannot open database connection to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Cannot create database directory {}: {source}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{value} is not a valid {field}: {reason}")]
    Binding {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cannot map {kind} column '{column}' of {entity} row: {reason}")]
    Extraction {
        entity: &'static str,
        column: &'static str,
        kind: SemanticType,
        reason: String,
    },

    #[error("Statement failed: {0}")]
    Statement(#[from] rusqlite::Error),

    /// A unit of work failed and its transaction was rolled back.
    #[error("{operation} failed and was rolled back: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: Box<DbError>,
    },
}

impl DbError {
    /// The innermost error, looking through any `Storage` wrapper.
    pub fn root_cause(&self) -> &DbError {
        match self {
            Self::Storage { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the failure came from user-supplied values rather than storage.
    pub fn is_validation(&self) -> bool {
        matches!(self.root_cause(), Self::Binding { .. })
    }
}
