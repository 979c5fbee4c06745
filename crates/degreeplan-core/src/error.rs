//! Error types for the degree planner library.
//!
//! Errors are grouped the way the write queue needs to classify them:
//! benign not-found failures are dropped, store failures are retried, and
//! resolution failures (unknown display ids, malformed semester ids) are
//! rejected outright because retrying cannot repair them.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all planner operations.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// A targeted row does not exist in the store
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
    /// A course card has no numeric course id registered
    #[error("No course id registered for display id '{display_id}'")]
    UnresolvedCourse { display_id: String },
    /// A semester id that is not `SEASONYYYY`
    #[error("Invalid semester id '{0}'")]
    InvalidSemesterId(String),
    /// A semester name that is neither "Season YYYY" nor "Se YYYY"
    #[error("Invalid semester name '{0}': expected \"Season YYYY\" or abbreviated \"Se YYYY\"")]
    InvalidSemesterName(String),
    /// A semester or card referenced by a board mutation is not on the board
    #[error("{entity} '{id}' is not on the board")]
    NotOnBoard { entity: &'static str, id: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> PlanError {
        PlanError::Database {
            message: self.message,
            source,
        }
    }
}

impl PlanError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a new database error with additional context.
    pub fn database_error(message: &str, source: rusqlite::Error) -> Self {
        Self::database(message).with_source(source)
    }

    /// Creates an input validation error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a not-found error for the given entity.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Whether the error means the target is already in the desired state.
    ///
    /// Covers explicit not-found results and the store's "no rows" signature.
    pub fn is_benign(&self) -> bool {
        match self {
            PlanError::NotFound { .. } => true,
            PlanError::Database { source, .. } => {
                matches!(source, rusqlite::Error::QueryReturnedNoRows)
            }
            _ => false,
        }
    }

    /// Whether running the same operation again could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            PlanError::Database { .. } => !self.is_benign(),
            PlanError::FileSystem { .. } | PlanError::Configuration { .. } => true,
            _ => false,
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PlanError::database(message).with_source(e))
    }
}

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlanError>;
