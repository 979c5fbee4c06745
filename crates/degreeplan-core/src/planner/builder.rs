//! Resolves where the plan database lives and prepares it before a
//! [`Planner`] is handed out.

use std::path::{Path, PathBuf};

use tokio::task;

use super::Planner;
use crate::{
    db::Database,
    error::{PlanError, Result},
};

/// Chooses the plan database file for a [`Planner`].
#[derive(Debug, Clone)]
pub struct PlannerBuilder {
    database_path: Option<PathBuf>,
}

impl PlannerBuilder {
    /// Starts with no database file chosen.
    pub fn new() -> Self {
        Self {
            database_path: None,
        }
    }

    /// Stores plans and the catalog in `path` instead of the per-user data
    /// directory (`$XDG_DATA_HOME/degreeplan/degreeplan.db`). `None` keeps
    /// the default, which is how the CLI passes an absent `--database-file`.
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Opens the plan database once so its tables exist before any session
    /// queues a write, then returns a planner bound to that file.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::FileSystem` if the database directory cannot be
    /// created, `PlanError::XdgDirectory` if no default path can be
    /// determined, and `PlanError::Database` if schema initialization fails.
    pub async fn build(self) -> Result<Planner> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PlanError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            Database::new(&db_path_clone)?;
            Ok::<(), PlanError>(())
        })
        .await
        .map_err(|e| PlanError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        log::debug!("Planner database at {}", db_path.display());
        Ok(Planner::new(db_path))
    }

    /// `degreeplan.db` under the user's data directory, created on demand.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("degreeplan")
            .place_data_file("degreeplan.db")
            .map_err(|e| PlanError::XdgDirectory(e.to_string()))
    }
}

impl Default for PlannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
