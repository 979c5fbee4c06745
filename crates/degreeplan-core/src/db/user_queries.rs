//! User resolution.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::timestamp_column;
use crate::{
    error::{DatabaseResultExt, Result},
    models::User,
};

const SELECT_USER_SQL: &str = "SELECT id, external_id, created_at FROM users WHERE external_id = ?1";
const INSERT_USER_SQL: &str =
    "INSERT INTO users (external_id, created_at) VALUES (?1, ?2) ON CONFLICT(external_id) DO NOTHING";

impl super::Database {
    fn build_user_from_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get::<_, i64>(0)? as u64,
            external_id: row.get(1)?,
            created_at: timestamp_column(row, 2)?,
        })
    }

    /// Looks up a user by the identity provider's opaque id.
    pub fn find_user(&self, external_id: &str) -> Result<Option<User>> {
        self.connection
            .query_row(SELECT_USER_SQL, params![external_id], Self::build_user_from_row)
            .optional()
            .db_context("Failed to query user")
    }

    /// Returns the user for `external_id`, inserting it on first sight.
    pub fn get_or_create_user(&self, external_id: &str) -> Result<User> {
        let now = Timestamp::now().to_string();
        self.connection
            .execute(INSERT_USER_SQL, params![external_id, &now])
            .db_context("Failed to insert user")?;

        self.connection
            .query_row(SELECT_USER_SQL, params![external_id], Self::build_user_from_row)
            .db_context("Failed to query user")
    }
}
