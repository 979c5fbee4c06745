//! Course catalog: course rows, prerequisite logic and offering history.

use std::collections::HashMap;

use rusqlite::{params, types::Type, OptionalExtension};

use super::term_queries::{ensure_term, semester_columns};
use crate::{
    error::{DatabaseResultExt, PlanError, Result},
    models::{CourseRecord, NewCourse, PrereqTree, TermGrades},
};

const COURSE_COLUMNS: &str =
    "c.id, c.subject, c.number, c.title, c.description, c.credit_hours, c.degree_attributes, p.prereq_logic";
const UPSERT_COURSE_SQL: &str = "INSERT INTO courses (subject, number, title, description, credit_hours, degree_attributes) VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
     ON CONFLICT(subject, number) DO UPDATE SET title = excluded.title, description = excluded.description, \
     credit_hours = excluded.credit_hours, degree_attributes = excluded.degree_attributes";
const SELECT_COURSE_ID_SQL: &str = "SELECT id FROM courses WHERE subject = ?1 AND number = ?2";
const UPSERT_PREREQ_SQL: &str = "INSERT INTO course_prereqs (course_id, prereq_logic) VALUES (?1, ?2) \
     ON CONFLICT(course_id) DO UPDATE SET prereq_logic = excluded.prereq_logic";
const DELETE_PREREQ_SQL: &str = "DELETE FROM course_prereqs WHERE course_id = ?1";
const INSERT_OFFERING_SQL: &str =
    "INSERT INTO course_offerings (course_id, term_id) VALUES (?1, ?2) ON CONFLICT(course_id, term_id) DO NOTHING";
const SELECT_OFFERINGS_SQL: &str = "SELECT t.year, t.season FROM course_offerings o JOIN terms t ON t.id = o.term_id \
     WHERE o.course_id = ?1 ORDER BY t.year, t.season";
const DELETE_GENEDS_SQL: &str = "DELETE FROM course_geneds WHERE course_id = ?1";
const INSERT_GENED_SQL: &str =
    "INSERT INTO course_geneds (course_id, code) VALUES (?1, ?2) ON CONFLICT(course_id, code) DO NOTHING";
const SELECT_GENEDS_SQL: &str = "SELECT code FROM course_geneds WHERE course_id = ?1 ORDER BY code";
const GRADE_COLUMNS: &str =
    "a_plus, a, a_minus, b_plus, b, b_minus, c_plus, c, c_minus, d_plus, d, d_minus, f";
const SELECT_ALL_PREREQS_SQL: &str = "SELECT course_id, prereq_logic FROM course_prereqs";

/// Catalog keys are stored uppercase and trimmed so "cs 225" finds "CS 225".
pub(crate) fn normalize_key(subject: &str, number: &str) -> (String, String) {
    (subject.trim().to_uppercase(), number.trim().to_uppercase())
}

fn prereq_from_json(idx: usize, json: Option<String>) -> rusqlite::Result<Option<PrereqTree>> {
    json.map(|text| {
        serde_json::from_str(&text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

impl super::Database {
    /// Helper function to construct a course from a catalog row. Offerings
    /// are loaded separately.
    fn build_course_from_row(row: &rusqlite::Row) -> rusqlite::Result<CourseRecord> {
        Ok(CourseRecord {
            id: row.get::<_, i64>(0)? as u64,
            subject: row.get(1)?,
            number: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            credit_hours: row.get(5)?,
            degree_attributes: row.get(6)?,
            prerequisites: prereq_from_json(7, row.get(7)?)?,
            offered: Vec::new(),
            gen_eds: Vec::new(),
            grades: Vec::new(),
        })
    }

    /// Loads offerings, gen-eds and grade distributions for a course row.
    fn load_course_details(&self, course: &mut CourseRecord) -> Result<()> {
        self.load_offerings(course)?;

        let mut stmt = self
            .connection
            .prepare_cached(SELECT_GENEDS_SQL)
            .db_context("Failed to prepare gen-ed query")?;
        course.gen_eds = stmt
            .query_map(params![course.id as i64], |row| row.get(0))
            .db_context("Failed to query gen-eds")?
            .collect::<std::result::Result<Vec<String>, _>>()
            .db_context("Failed to fetch gen-eds")?;

        let query = format!(
            "SELECT t.year, t.season, {GRADE_COLUMNS} FROM course_gpas g JOIN terms t ON t.id = g.term_id \
             WHERE g.course_id = ?1 ORDER BY t.year, t.season"
        );
        let mut stmt = self
            .connection
            .prepare_cached(&query)
            .db_context("Failed to prepare grade query")?;
        let mut grades = stmt
            .query_map(params![course.id as i64], |row| {
                let semester = semester_columns(row, 0, 1)?;
                let mut counts = [0u32; 13];
                for (i, count) in counts.iter_mut().enumerate() {
                    *count = row.get(i + 2)?;
                }
                Ok(TermGrades::from_counts(semester, counts))
            })
            .db_context("Failed to query grades")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch grades")?;
        grades.sort_by_key(|g| g.semester);
        course.grades = grades;
        Ok(())
    }

    fn load_offerings(&self, course: &mut CourseRecord) -> Result<()> {
        let mut stmt = self
            .connection
            .prepare_cached(SELECT_OFFERINGS_SQL)
            .db_context("Failed to prepare offerings query")?;
        let offered = stmt
            .query_map(params![course.id as i64], |row| semester_columns(row, 0, 1))
            .db_context("Failed to query offerings")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch offerings")?;
        course.offered = offered;
        course.offered.sort();
        Ok(())
    }

    fn query_course(&self, condition: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Option<CourseRecord>> {
        let query = format!(
            "SELECT {COURSE_COLUMNS} FROM courses c LEFT JOIN course_prereqs p ON p.course_id = c.id WHERE {condition}"
        );
        let course = self
            .connection
            .query_row(&query, params, Self::build_course_from_row)
            .optional()
            .db_context("Failed to query course")?;

        match course {
            Some(mut course) => {
                self.load_course_details(&mut course)?;
                Ok(Some(course))
            }
            None => Ok(None),
        }
    }

    /// Inserts a catalog course or refreshes an existing one with the same
    /// subject and number. Prerequisite logic and gen-eds are replaced;
    /// offerings are merged and grade distributions are replaced per term.
    pub fn upsert_course(&mut self, course: &NewCourse) -> Result<CourseRecord> {
        let (subject, number) = normalize_key(&course.subject, &course.number);
        if subject.is_empty() || number.is_empty() {
            return Err(PlanError::invalid_input(
                "course",
                "subject and number must not be empty",
            ));
        }
        let prereq_json = course
            .prerequisites
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            UPSERT_COURSE_SQL,
            params![
                &subject,
                &number,
                course.title.as_deref(),
                course.description.as_deref(),
                course.credit_hours.as_deref(),
                course.degree_attributes.as_deref()
            ],
        )
        .db_context("Failed to upsert course")?;

        let id: i64 = tx
            .query_row(SELECT_COURSE_ID_SQL, params![&subject, &number], |row| row.get(0))
            .db_context("Failed to query course id")?;

        let stored = match prereq_json {
            Some(json) => tx.execute(UPSERT_PREREQ_SQL, params![id, json]),
            None => tx.execute(DELETE_PREREQ_SQL, params![id]),
        };
        stored.db_context("Failed to store prerequisites")?;

        for semester in &course.offered {
            let term_id = ensure_term(&tx, *semester)?;
            tx.execute(INSERT_OFFERING_SQL, params![id, term_id as i64])
                .db_context("Failed to insert offering")?;
        }

        tx.execute(DELETE_GENEDS_SQL, params![id])
            .db_context("Failed to clear gen-eds")?;
        for code in &course.gen_eds {
            let code = code.trim().to_uppercase();
            if code.is_empty() {
                continue;
            }
            tx.execute(INSERT_GENED_SQL, params![id, code])
                .db_context("Failed to insert gen-ed")?;
        }

        let upsert_grades = format!(
            "INSERT INTO course_gpas (course_id, term_id, {GRADE_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15) \
             ON CONFLICT(course_id, term_id) DO UPDATE SET a_plus = excluded.a_plus, a = excluded.a, \
             a_minus = excluded.a_minus, b_plus = excluded.b_plus, b = excluded.b, b_minus = excluded.b_minus, \
             c_plus = excluded.c_plus, c = excluded.c, c_minus = excluded.c_minus, d_plus = excluded.d_plus, \
             d = excluded.d, d_minus = excluded.d_minus, f = excluded.f"
        );
        for grades in &course.grades {
            let term_id = ensure_term(&tx, grades.semester)? as i64;
            let [a_plus, a, a_minus, b_plus, b, b_minus, c_plus, c, c_minus, d_plus, d, d_minus, f] =
                grades.counts();
            tx.execute(
                &upsert_grades,
                params![
                    id, term_id, a_plus, a, a_minus, b_plus, b, b_minus, c_plus, c, c_minus, d_plus,
                    d, d_minus, f
                ],
            )
            .db_context("Failed to store grades")?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_course(id as u64)?
            .ok_or_else(|| PlanError::not_found("Course", id))
    }

    /// Retrieves a catalog course by numeric id.
    pub fn get_course(&self, id: u64) -> Result<Option<CourseRecord>> {
        self.query_course("c.id = ?1", &[&(id as i64)])
    }

    /// Retrieves a catalog course by subject and number, case-insensitively.
    pub fn get_course_by_code(&self, subject: &str, number: &str) -> Result<Option<CourseRecord>> {
        let (subject, number) = normalize_key(subject, number);
        self.query_course("c.subject = ?1 AND c.number = ?2", &[&subject, &number])
    }

    /// Lists the whole catalog ordered by subject and number.
    pub fn list_courses(&self) -> Result<Vec<CourseRecord>> {
        let query = format!(
            "SELECT {COURSE_COLUMNS} FROM courses c LEFT JOIN course_prereqs p ON p.course_id = c.id ORDER BY c.subject, c.number"
        );
        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare catalog query")?;
        let mut courses = stmt
            .query_map([], Self::build_course_from_row)
            .db_context("Failed to query catalog")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch catalog")?;
        drop(stmt);

        for course in &mut courses {
            self.load_course_details(course)?;
        }
        Ok(courses)
    }

    /// Prerequisite logic for every course that has any, keyed by course id.
    pub fn prerequisite_trees(&self) -> Result<HashMap<u64, PrereqTree>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ALL_PREREQS_SQL)
            .db_context("Failed to prepare prerequisite query")?;
        let rows = stmt
            .query_map([], |row| {
                let id = row.get::<_, i64>(0)? as u64;
                let tree = prereq_from_json(1, Some(row.get(1)?))?;
                Ok((id, tree))
            })
            .db_context("Failed to query prerequisites")?;

        let mut trees = HashMap::new();
        for row in rows {
            let (id, tree) = row.db_context("Failed to fetch prerequisites")?;
            if let Some(tree) = tree {
                trees.insert(id, tree);
            }
        }
        Ok(trees)
    }
}
