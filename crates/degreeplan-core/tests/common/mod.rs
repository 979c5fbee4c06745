#![allow(dead_code)]

use std::time::Duration;

use degreeplan_core::{
    models::{CourseRecord, NewCourse, PrereqTree, Season, SemesterId},
    Planner, PlannerBuilder, QueueConfig,
};
use tempfile::TempDir;

/// Helper function to create a test planner
pub async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

/// Short debounce so tests don't sit idle.
pub fn fast_queue() -> QueueConfig {
    QueueConfig {
        debounce: Duration::from_millis(20),
        max_retries: 2,
    }
}

pub fn fall(year: u16) -> SemesterId {
    SemesterId::new(Season::Fall, year)
}

pub fn spring(year: u16) -> SemesterId {
    SemesterId::new(Season::Spring, year)
}

pub fn course(subject: &str, number: &str, prerequisite: Option<&str>) -> NewCourse {
    NewCourse {
        subject: subject.to_string(),
        number: number.to_string(),
        title: Some(format!("{subject} {number}")),
        credit_hours: Some("3 hours".to_string()),
        prerequisites: prerequisite.map(|code| PrereqTree::Course(code.to_string())),
        ..Default::default()
    }
}

/// CS 1110 → CS 2110 → CS 3110, plus MATH 1910 with no prerequisites.
pub async fn seed_catalog(planner: &Planner) -> Vec<CourseRecord> {
    planner
        .load_catalog(vec![
            course("CS", "1110", None),
            course("CS", "2110", Some("CS 1110")),
            course("CS", "3110", Some("CS 2110")),
            course("MATH", "1910", None),
        ])
        .await
        .expect("Failed to load catalog")
}
