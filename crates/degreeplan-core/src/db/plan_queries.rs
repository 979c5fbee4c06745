//! Semester plans and their course associations.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::{is_unique_violation, term_queries::ensure_term, term_queries::semester_columns, timestamp_column};
use crate::{
    error::{DatabaseResultExt, PlanError, Result},
    models::{PlannedCourse, SemesterId, SemesterPlanRecord},
};

const PLAN_COLUMNS: &str =
    "sp.id, sp.user_id, sp.term_id, t.year, t.season, sp.plan_name, sp.complete, sp.created_at, sp.updated_at";
const INSERT_PLAN_SQL: &str = "INSERT INTO semester_plans (user_id, term_id, plan_name, complete, created_at, updated_at) VALUES (?1, ?2, ?3, 0, ?4, ?5)";
const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM semester_plans WHERE id = ?1)";
const CHECK_COURSE_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM courses WHERE id = ?1)";
const SELECT_ASSOCIATION_SQL: &str =
    "SELECT id FROM semester_plan_courses WHERE semester_plan_id = ?1 AND course_id = ?2 ORDER BY id LIMIT 1";
const INSERT_ASSOCIATION_SQL: &str = "INSERT INTO semester_plan_courses (semester_plan_id, course_id, position, created_at, updated_at) \
     VALUES (?1, ?2, (SELECT COALESCE(MAX(position), 0) + 1 FROM semester_plan_courses WHERE semester_plan_id = ?1), ?3, ?4)";
const DELETE_ASSOCIATION_SQL: &str =
    "DELETE FROM semester_plan_courses WHERE semester_plan_id = ?1 AND course_id = ?2";
const MOVE_ASSOCIATION_SQL: &str = "UPDATE semester_plan_courses SET semester_plan_id = ?1, updated_at = ?2, \
     position = (SELECT COALESCE(MAX(position), 0) + 1 FROM semester_plan_courses WHERE semester_plan_id = ?1) \
     WHERE id = (SELECT id FROM semester_plan_courses WHERE semester_plan_id = ?3 AND course_id = ?4 ORDER BY id LIMIT 1)";
const SELECT_PLAN_COURSES_SQL: &str =
    "SELECT id, course_id FROM semester_plan_courses WHERE semester_plan_id = ?1 ORDER BY position, id";
const DELETE_PLAN_COURSES_SQL: &str = "DELETE FROM semester_plan_courses WHERE semester_plan_id = ?1";
const DELETE_PLAN_SQL: &str = "DELETE FROM semester_plans WHERE id = ?1";
const UPDATE_PLAN_TIMESTAMP_SQL: &str = "UPDATE semester_plans SET updated_at = ?1 WHERE id = ?2";

impl super::Database {
    /// Helper function to construct a plan record from a row selected with
    /// `PLAN_COLUMNS`.
    fn build_plan_from_row(row: &rusqlite::Row) -> rusqlite::Result<SemesterPlanRecord> {
        Ok(SemesterPlanRecord {
            id: row.get::<_, i64>(0)? as u64,
            user_id: row.get::<_, i64>(1)? as u64,
            term_id: row.get::<_, i64>(2)? as u64,
            semester: semester_columns(row, 3, 4)?,
            plan_name: row.get(5)?,
            complete: row.get(6)?,
            created_at: timestamp_column(row, 7)?,
            updated_at: timestamp_column(row, 8)?,
        })
    }

    /// Finds the user's plan for `semester` without creating anything.
    pub fn find_semester_plan(
        &self,
        user_id: u64,
        semester: SemesterId,
    ) -> Result<Option<SemesterPlanRecord>> {
        let query = format!(
            "SELECT {PLAN_COLUMNS} FROM semester_plans sp JOIN terms t ON t.id = sp.term_id \
             WHERE sp.user_id = ?1 AND t.year = ?2 AND t.season = ?3"
        );
        self.connection
            .query_row(
                &query,
                params![user_id as i64, semester.year, semester.season.code()],
                Self::build_plan_from_row,
            )
            .optional()
            .db_context("Failed to query semester plan")
    }

    /// Returns the user's plan for `semester`, creating it (and its term row)
    /// on first use.
    ///
    /// A concurrent writer may create the same `(user, term)` row between the
    /// lookup and the insert; the unique violation is answered by re-fetching.
    pub fn get_or_create_semester_plan(
        &self,
        user_id: u64,
        semester: SemesterId,
    ) -> Result<SemesterPlanRecord> {
        if let Some(plan) = self.find_semester_plan(user_id, semester)? {
            return Ok(plan);
        }

        let term_id = ensure_term(&self.connection, semester)?;
        let now = Timestamp::now().to_string();
        match self.connection.execute(
            INSERT_PLAN_SQL,
            params![user_id as i64, term_id as i64, semester.long_name(), &now, &now],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                log::debug!("Semester plan {semester} for user {user_id} created concurrently");
            }
            Err(e) => return Err(PlanError::database_error("Failed to insert semester plan", e)),
        }

        self.find_semester_plan(user_id, semester)?
            .ok_or_else(|| PlanError::not_found("Semester plan", semester))
    }

    /// Lists every plan the user owns, oldest term first.
    pub fn list_semester_plans(&self, user_id: u64) -> Result<Vec<SemesterPlanRecord>> {
        let query = format!(
            "SELECT {PLAN_COLUMNS} FROM semester_plans sp JOIN terms t ON t.id = sp.term_id WHERE sp.user_id = ?1"
        );
        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare semester plan query")?;
        let mut plans = stmt
            .query_map(params![user_id as i64], Self::build_plan_from_row)
            .db_context("Failed to query semester plans")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch semester plans")?;

        // Season codes do not sort chronologically in SQL.
        plans.sort_by_key(|plan| plan.semester);
        Ok(plans)
    }

    /// Numeric course ids in the plan, in position order.
    pub fn plan_course_ids(&self, plan_id: u64) -> Result<Vec<u64>> {
        Ok(self
            .plan_associations(plan_id)?
            .into_iter()
            .map(|(_, course_id)| course_id)
            .collect())
    }

    /// The plan's courses joined with their catalog records, in insertion
    /// order.
    pub fn plan_courses(&self, plan_id: u64) -> Result<Vec<PlannedCourse>> {
        let mut courses = Vec::new();
        for (association_id, course_id) in self.plan_associations(plan_id)? {
            let course = self
                .get_course(course_id)?
                .ok_or_else(|| PlanError::not_found("Course", course_id))?;
            courses.push(PlannedCourse {
                association_id,
                course,
            });
        }
        Ok(courses)
    }

    fn plan_associations(&self, plan_id: u64) -> Result<Vec<(u64, u64)>> {
        let mut stmt = self
            .connection
            .prepare_cached(SELECT_PLAN_COURSES_SQL)
            .db_context("Failed to prepare plan course query")?;
        let rows = stmt
            .query_map(params![plan_id as i64], |row| {
                Ok((row.get::<_, i64>(0)? as u64, row.get::<_, i64>(1)? as u64))
            })
            .db_context("Failed to query plan courses")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch plan courses")?;
        Ok(rows)
    }

    /// Associates a course with a plan and returns the association id.
    ///
    /// Adding a course the plan already holds returns the existing
    /// association.
    pub fn add_course_to_plan(&mut self, plan_id: u64, course_id: u64) -> Result<u64> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let plan_exists: bool = tx
            .query_row(CHECK_PLAN_EXISTS_SQL, params![plan_id as i64], |row| row.get(0))
            .db_context("Failed to check plan existence")?;
        if !plan_exists {
            return Err(PlanError::not_found("Semester plan", plan_id));
        }
        let course_exists: bool = tx
            .query_row(CHECK_COURSE_EXISTS_SQL, params![course_id as i64], |row| row.get(0))
            .db_context("Failed to check course existence")?;
        if !course_exists {
            return Err(PlanError::not_found("Course", course_id));
        }

        let existing: Option<i64> = tx
            .query_row(
                SELECT_ASSOCIATION_SQL,
                params![plan_id as i64, course_id as i64],
                |row| row.get(0),
            )
            .optional()
            .db_context("Failed to query course association")?;

        let association_id = match existing {
            Some(id) => id as u64,
            None => {
                let now = Timestamp::now().to_string();
                tx.execute(
                    INSERT_ASSOCIATION_SQL,
                    params![plan_id as i64, course_id as i64, &now, &now],
                )
                .db_context("Failed to insert course association")?;
                let id = tx.last_insert_rowid() as u64;
                tx.execute(UPDATE_PLAN_TIMESTAMP_SQL, params![&now, plan_id as i64])
                    .db_context("Failed to update plan timestamp")?;
                id
            }
        };

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(association_id)
    }

    /// Removes a course from a plan.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::NotFound` when the plan does not hold the course.
    pub fn remove_course_from_plan(&mut self, plan_id: u64, course_id: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let rows_affected = tx
            .execute(DELETE_ASSOCIATION_SQL, params![plan_id as i64, course_id as i64])
            .db_context("Failed to delete course association")?;
        if rows_affected == 0 {
            return Err(PlanError::not_found(
                "Course association",
                format!("plan {plan_id} / course {course_id}"),
            ));
        }

        let now = Timestamp::now().to_string();
        tx.execute(UPDATE_PLAN_TIMESTAMP_SQL, params![&now, plan_id as i64])
            .db_context("Failed to update plan timestamp")?;

        tx.commit().db_context("Failed to commit transaction")
    }

    /// Re-points one course association from `source_plan` to
    /// `destination_plan` with a single update.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::NotFound` when the source plan does not hold the
    /// course.
    pub fn move_course_between_plans(
        &mut self,
        source_plan: u64,
        destination_plan: u64,
        course_id: u64,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now().to_string();
        let rows_affected = tx
            .execute(
                MOVE_ASSOCIATION_SQL,
                params![destination_plan as i64, &now, source_plan as i64, course_id as i64],
            )
            .db_context("Failed to move course association")?;
        if rows_affected == 0 {
            return Err(PlanError::not_found(
                "Course association",
                format!("plan {source_plan} / course {course_id}"),
            ));
        }

        for plan_id in [source_plan, destination_plan] {
            tx.execute(UPDATE_PLAN_TIMESTAMP_SQL, params![&now, plan_id as i64])
                .db_context("Failed to update plan timestamp")?;
        }

        tx.commit().db_context("Failed to commit transaction")
    }

    /// Deletes a plan's course associations and then the plan itself.
    pub fn delete_semester_plan(&mut self, plan_id: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_PLAN_EXISTS_SQL, params![plan_id as i64], |row| row.get(0))
            .db_context("Failed to check plan existence")?;
        if !exists {
            return Err(PlanError::not_found("Semester plan", plan_id));
        }

        tx.execute(DELETE_PLAN_COURSES_SQL, params![plan_id as i64])
            .db_context("Failed to delete plan courses")?;
        tx.execute(DELETE_PLAN_SQL, params![plan_id as i64])
            .db_context("Failed to delete semester plan")?;

        tx.commit().db_context("Failed to commit transaction")
    }
}
