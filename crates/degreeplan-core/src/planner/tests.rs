//! Tests for the planner module.

use super::*;
use crate::{
    error::PlanError,
    models::{NewCourse, PrereqTree, Season, SemesterId},
    store::PlanStore,
};
use tempfile::TempDir;

/// Helper function to create a test planner
async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

fn new_course(subject: &str, number: &str, hours: &str) -> NewCourse {
    NewCourse {
        subject: subject.to_string(),
        number: number.to_string(),
        title: Some(format!("{subject} {number} title")),
        credit_hours: Some(hours.to_string()),
        ..Default::default()
    }
}

fn fall(year: u16) -> SemesterId {
    SemesterId::new(Season::Fall, year)
}

fn spring(year: u16) -> SemesterId {
    SemesterId::new(Season::Spring, year)
}

#[tokio::test]
async fn test_builder_creates_nested_directories() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("a").join("b").join("plans.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create planner");

    assert!(db_path.exists());
    assert_eq!(planner.database_path(), db_path.as_path());
}

#[tokio::test]
async fn test_builder_keeps_path_when_none_given_and_prepares_tables() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("plans.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_database_path(None::<&std::path::Path>)
        .build()
        .await
        .expect("Failed to create planner");
    assert_eq!(planner.database_path(), db_path.as_path());

    // Tables exist before anything has been written
    let user = planner.get_or_create_user("alice").await.unwrap();
    assert!(planner.list_semester_plans(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_load_catalog_and_lookup() {
    let (_temp_dir, planner) = create_test_planner().await;

    let mut cs2 = new_course("CS", "2110", "3 hours");
    cs2.prerequisites = Some(PrereqTree::Course("CS 1110".to_string()));
    cs2.offered = vec![spring(2025), fall(2024)];

    let records = planner
        .load_catalog(vec![new_course("CS", "1110", "3 hours"), cs2])
        .await
        .expect("Failed to load catalog");
    assert_eq!(records.len(), 2);

    let found = planner
        .course_by_code("cs", " 2110 ")
        .await
        .expect("Lookup failed")
        .expect("Course should exist");
    assert_eq!(found.id, records[1].id);
    assert_eq!(found.offered, vec![fall(2024), spring(2025)]);

    let by_id = planner.get_course(records[0].id).await.expect("Lookup failed");
    assert_eq!(by_id.map(|c| c.code()), Some("CS 1110".to_string()));

    let trees = planner.prerequisite_trees().await.expect("Failed to read prereqs");
    assert_eq!(trees.len(), 1);
    assert!(trees.contains_key(&records[1].id));

    assert_eq!(planner.list_courses().await.expect("List failed").len(), 2);
}

#[tokio::test]
async fn test_upsert_course_refreshes_in_place() {
    let (_temp_dir, planner) = create_test_planner().await;

    let first = planner
        .upsert_course(new_course("MATH", "1910", "4 hours"))
        .await
        .expect("Failed to insert course");

    let mut updated = new_course("MATH", "1910", "4 hours");
    updated.title = Some("Calculus I".to_string());
    let second = planner.upsert_course(updated).await.expect("Failed to update course");

    assert_eq!(first.id, second.id);
    assert_eq!(second.title.as_deref(), Some("Calculus I"));
    assert_eq!(planner.list_courses().await.expect("List failed").len(), 1);
}

#[tokio::test]
async fn test_get_or_create_user_is_stable() {
    let (_temp_dir, planner) = create_test_planner().await;

    let first = planner.get_or_create_user("alice").await.expect("Failed to create user");
    let again = planner.get_or_create_user("alice").await.expect("Failed to fetch user");
    let other = planner.get_or_create_user("bob").await.expect("Failed to create user");

    assert_eq!(first.id, again.id);
    assert_ne!(first.id, other.id);
}

#[tokio::test]
async fn test_store_round_trip_through_board() {
    let (_temp_dir, planner) = create_test_planner().await;
    let user = planner.get_or_create_user("alice").await.unwrap();
    let course = planner
        .upsert_course(new_course("CS", "1110", "3 hours"))
        .await
        .unwrap();

    let spring_plan = planner.resolve_semester_plan(user.id, spring(2025)).await.unwrap();
    let fall_plan = planner.resolve_semester_plan(user.id, fall(2024)).await.unwrap();
    planner.add_course_to_plan(spring_plan.id, course.id).await.unwrap();

    let board = planner.load_board(user.id).await.expect("Failed to load board");
    let ids: Vec<SemesterId> = board.semesters().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![fall(2024), spring(2025)]);

    let card = &board.semester(spring(2025)).unwrap().courses[0];
    assert!(card.id.starts_with("CS1110_"));
    assert_eq!(board.course_id(&card.id), Some(course.id));

    planner
        .move_course_between_plans(spring_plan.id, fall_plan.id, course.id)
        .await
        .expect("Move failed");
    assert_eq!(planner.plan_course_ids(fall_plan.id).await.unwrap(), vec![course.id]);
    assert!(planner.plan_course_ids(spring_plan.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_missing_association_is_not_found() {
    let (_temp_dir, planner) = create_test_planner().await;
    let user = planner.get_or_create_user("alice").await.unwrap();
    let course = planner
        .upsert_course(new_course("CS", "1110", "3 hours"))
        .await
        .unwrap();
    let plan = planner.resolve_semester_plan(user.id, fall(2024)).await.unwrap();

    let err = planner
        .remove_course_from_plan(plan.id, course.id)
        .await
        .expect_err("Nothing to remove");
    assert!(matches!(err, PlanError::NotFound { .. }));
    assert!(err.is_benign());
}

#[tokio::test]
async fn test_delete_semester_plan_removes_associations() {
    let (_temp_dir, planner) = create_test_planner().await;
    let user = planner.get_or_create_user("alice").await.unwrap();
    let course = planner
        .upsert_course(new_course("CS", "1110", "3 hours"))
        .await
        .unwrap();
    let plan = planner.resolve_semester_plan(user.id, fall(2024)).await.unwrap();
    planner.add_course_to_plan(plan.id, course.id).await.unwrap();

    planner.delete_semester_plan(plan.id).await.expect("Delete failed");

    assert!(planner.find_semester_plan(user.id, fall(2024)).await.unwrap().is_none());
    assert!(planner.list_semester_plans(user.id).await.unwrap().is_empty());
    // The catalog row survives
    assert!(planner.get_course(course.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_find_course_delegates_to_catalog() {
    let (_temp_dir, planner) = create_test_planner().await;
    planner
        .upsert_course(new_course("CS", "1110", "3 hours"))
        .await
        .unwrap();

    assert!(PlanStore::find_course(&planner, "CS", "1110").await.unwrap().is_some());
    assert!(PlanStore::find_course(&planner, "CS", "9999").await.unwrap().is_none());
}
