//! Catalog operations for the Planner.

use std::collections::HashMap;

use super::Planner;
use crate::{
    error::Result,
    models::{CourseRecord, NewCourse, PrereqTree},
};

impl Planner {
    /// Inserts or refreshes one catalog course.
    pub async fn upsert_course(&self, course: NewCourse) -> Result<CourseRecord> {
        self.with_db(move |db| db.upsert_course(&course)).await
    }

    /// Loads a batch of catalog courses, stopping at the first failure.
    pub async fn load_catalog(&self, courses: Vec<NewCourse>) -> Result<Vec<CourseRecord>> {
        self.with_db(move |db| {
            let records = courses
                .iter()
                .map(|course| db.upsert_course(course))
                .collect::<Result<Vec<_>>>()?;
            log::info!("Loaded {} catalog course(s)", records.len());
            Ok(records)
        })
        .await
    }

    /// Looks a course up by subject and number.
    pub async fn course_by_code(&self, subject: &str, number: &str) -> Result<Option<CourseRecord>> {
        let subject = subject.to_string();
        let number = number.to_string();
        self.with_db(move |db| db.get_course_by_code(&subject, &number)).await
    }

    /// Looks a course up by numeric id.
    pub async fn get_course(&self, id: u64) -> Result<Option<CourseRecord>> {
        self.with_db(move |db| db.get_course(id)).await
    }

    /// The whole catalog, ordered by subject and number.
    pub async fn list_courses(&self) -> Result<Vec<CourseRecord>> {
        self.with_db(|db| db.list_courses()).await
    }

    /// Prerequisite logic for every course that has any, keyed by course id.
    pub async fn prerequisite_trees(&self) -> Result<HashMap<u64, PrereqTree>> {
        self.with_db(|db| db.prerequisite_trees()).await
    }
}
