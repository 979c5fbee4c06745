//! The write primitives shared by the operation queue and the importer.
//!
//! [`Planner`](crate::Planner) implements this over SQLite. Tests substitute
//! in-memory stores to inject failures.

use std::future::Future;

use crate::{
    error::Result,
    models::{CourseRecord, SemesterId, SemesterPlanRecord},
};

/// Durable store for semester plans and their course associations.
pub trait PlanStore: Send + Sync + 'static {
    /// Returns the user's plan for `semester`, creating it if needed.
    fn resolve_semester_plan(
        &self,
        user_id: u64,
        semester: SemesterId,
    ) -> impl Future<Output = Result<SemesterPlanRecord>> + Send;

    /// Returns the user's plan for `semester` if it exists.
    fn find_semester_plan(
        &self,
        user_id: u64,
        semester: SemesterId,
    ) -> impl Future<Output = Result<Option<SemesterPlanRecord>>> + Send;

    /// Associates a course with a plan.
    fn add_course_to_plan(
        &self,
        plan_id: u64,
        course_id: u64,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Removes a course from a plan. Fails with a not-found error when the
    /// plan does not hold the course.
    fn remove_course_from_plan(
        &self,
        plan_id: u64,
        course_id: u64,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Re-points a course association from one plan to another in a single
    /// update. Fails with a not-found error when the source does not hold
    /// the course.
    fn move_course_between_plans(
        &self,
        source_plan: u64,
        destination_plan: u64,
        course_id: u64,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Deletes a plan after removing all of its course associations.
    fn delete_semester_plan(&self, plan_id: u64) -> impl Future<Output = Result<()>> + Send;

    /// Numeric ids of the courses a plan holds.
    fn plan_course_ids(&self, plan_id: u64) -> impl Future<Output = Result<Vec<u64>>> + Send;

    /// Catalog lookup by subject and number.
    fn find_course(
        &self,
        subject: &str,
        number: &str,
    ) -> impl Future<Output = Result<Option<CourseRecord>>> + Send;
}
