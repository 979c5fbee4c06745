//! Academic term rows.

use rusqlite::{params, Connection, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{Season, SemesterId},
};

const SELECT_TERM_ID_SQL: &str = "SELECT id FROM terms WHERE year = ?1 AND season = ?2";
const INSERT_TERM_SQL: &str = "INSERT INTO terms (year, season, combined) VALUES (?1, ?2, ?3) ON CONFLICT(year, season) DO NOTHING";

/// Term id for `semester`, inserting the row if needed. Usable inside a
/// transaction.
pub(crate) fn ensure_term(conn: &Connection, semester: SemesterId) -> Result<u64> {
    conn.execute(
        INSERT_TERM_SQL,
        params![semester.year, semester.season.code(), semester.to_string()],
    )
    .db_context("Failed to insert term")?;

    conn.query_row(
        SELECT_TERM_ID_SQL,
        params![semester.year, semester.season.code()],
        |row| row.get::<_, i64>(0),
    )
    .map(|id| id as u64)
    .db_context("Failed to query term")
}

/// Reads a `(year, season)` column pair back into a semester id.
pub(crate) fn semester_columns(
    row: &rusqlite::Row,
    year_idx: usize,
    season_idx: usize,
) -> rusqlite::Result<SemesterId> {
    let year: u16 = row.get(year_idx)?;
    let code: String = row.get(season_idx)?;
    let season = Season::from_code(&code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            season_idx,
            rusqlite::types::Type::Text,
            format!("Invalid season code: {code}").into(),
        )
    })?;
    Ok(SemesterId::new(season, year))
}

impl super::Database {
    /// Returns the id of the term row for `semester`, if one exists.
    pub fn find_term_id(&self, semester: SemesterId) -> Result<Option<u64>> {
        self.connection
            .query_row(
                SELECT_TERM_ID_SQL,
                params![semester.year, semester.season.code()],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .map(|id| id.map(|id| id as u64))
            .db_context("Failed to query term")
    }

    /// Returns the id of the term row for `semester`, creating the row if
    /// needed. `combined` holds the canonical id, e.g. `FALL2024`.
    pub fn get_or_create_term(&self, semester: SemesterId) -> Result<u64> {
        ensure_term(&self.connection, semester)
    }
}
