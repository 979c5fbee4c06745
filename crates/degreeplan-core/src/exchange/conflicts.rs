//! Conflict detection and the store-side import.

use serde::Serialize;

use super::ImportedSemester;
use crate::{
    error::Result,
    models::{Season, SemesterId},
    store::PlanStore,
};

/// An imported semester whose stored plan already holds courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemesterConflict {
    pub semester: String,
    pub season: Season,
    pub year: u16,
    pub plan_id: u64,
    pub existing_course_count: usize,
    pub import_course_count: usize,
}

impl SemesterConflict {
    pub fn semester_id(&self) -> SemesterId {
        SemesterId::new(self.season, self.year)
    }
}

/// What to do with courses already stored in a conflicting semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportStrategy {
    /// Keep existing courses and add the imported ones
    #[default]
    Merge,
    /// Clear the conflicting semesters first
    Replace,
}

/// Outcome of [`import_plan`]. Per-item failures land in `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported_semesters: Vec<String>,
    pub imported_courses: usize,
    pub errors: Vec<String>,
    pub message: String,
}

impl ImportReport {
    pub fn success(&self) -> bool {
        self.imported_courses > 0
    }
}

/// Lists every imported semester whose stored plan is non-empty. Semesters
/// with unparseable names or no stored plan are not conflicts.
pub async fn detect_conflicts<S: PlanStore>(
    store: &S,
    user_id: u64,
    semesters: &[ImportedSemester],
) -> Result<Vec<SemesterConflict>> {
    let mut conflicts = Vec::new();

    for imported in semesters {
        let Ok(id) = imported.semester_id() else {
            continue;
        };
        let Some(plan) = store.find_semester_plan(user_id, id).await? else {
            continue;
        };
        let existing = store.plan_course_ids(plan.id).await?;
        if existing.is_empty() {
            continue;
        }
        conflicts.push(SemesterConflict {
            semester: imported.semester.clone(),
            season: id.season,
            year: id.year,
            plan_id: plan.id,
            existing_course_count: existing.len(),
            import_course_count: imported.courses.len(),
        });
    }

    log::debug!("Import touches {} non-empty semester(s)", conflicts.len());
    Ok(conflicts)
}

/// Writes an imported plan to the store.
///
/// With [`ImportStrategy::Replace`] the conflicting semesters are emptied
/// first. Every semester is then resolved or created and each course found
/// in the catalog is added. Unknown semesters and courses are reported in
/// the returned [`ImportReport`] rather than failing the import.
///
/// # Errors
///
/// Only the conflict scan can fail the whole import.
pub async fn import_plan<S: PlanStore>(
    store: &S,
    user_id: u64,
    semesters: &[ImportedSemester],
    strategy: ImportStrategy,
) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    let mut notes = Vec::new();

    if strategy == ImportStrategy::Replace {
        for conflict in detect_conflicts(store, user_id, semesters).await? {
            match clear_plan(store, conflict.plan_id).await {
                Ok(cleared) => notes.push(format!(
                    "Cleared {cleared} existing course(s) from {}.",
                    conflict.semester
                )),
                Err(e) => report.errors.push(format!(
                    "Failed to clear existing courses from {}: {e}",
                    conflict.semester
                )),
            }
        }
    }

    for imported in semesters {
        let id = match imported.semester_id() {
            Ok(id) => id,
            Err(_) => {
                report.errors.push(format!(
                    "Invalid semester format: {}. Expected \"Season YYYY\" or \"Se YYYY\"",
                    imported.semester
                ));
                continue;
            }
        };
        let plan = match store.resolve_semester_plan(user_id, id).await {
            Ok(plan) => plan,
            Err(e) => {
                report.errors.push(format!(
                    "Failed to create semester plan for {}: {e}",
                    imported.semester
                ));
                continue;
            }
        };
        report.imported_semesters.push(imported.semester.clone());

        for course in &imported.courses {
            let record = match store.find_course(&course.subject, &course.number).await {
                Ok(Some(record)) => record,
                Ok(None) => {
                    report
                        .errors
                        .push(format!("Course not found: {} {}", course.subject, course.number));
                    continue;
                }
                Err(e) => {
                    report.errors.push(format!(
                        "Error processing course {} {}: {e}",
                        course.subject, course.number
                    ));
                    continue;
                }
            };
            match store.add_course_to_plan(plan.id, record.id).await {
                Ok(()) => report.imported_courses += 1,
                Err(e) => report.errors.push(format!(
                    "Failed to add course {} {} to {}: {e}",
                    course.subject, course.number, imported.semester
                )),
            }
        }
    }

    notes.push(if report.success() {
        format!(
            "Imported {} course(s) across {} semester(s).",
            report.imported_courses,
            report.imported_semesters.len()
        )
    } else {
        "No courses were imported.".to_string()
    });
    report.message = notes.join(" ");

    log::info!(
        "Import for user {user_id}: {} course(s), {} error(s)",
        report.imported_courses,
        report.errors.len()
    );
    Ok(report)
}

async fn clear_plan<S: PlanStore>(store: &S, plan_id: u64) -> Result<usize> {
    let course_ids = store.plan_course_ids(plan_id).await?;
    for course_id in &course_ids {
        store.remove_course_from_plan(plan_id, *course_id).await?;
    }
    Ok(course_ids.len())
}
