//! User, semester-plan and board operations for the Planner, and its
//! [`PlanStore`] implementation.

use super::Planner;
use crate::{
    board::Board,
    error::Result,
    models::{CourseRecord, PlannedCourse, SemesterId, SemesterPlanRecord, User},
    store::PlanStore,
};

impl Planner {
    /// Resolves the identity provider's opaque id to a user row.
    pub async fn get_or_create_user(&self, external_id: &str) -> Result<User> {
        let external_id = external_id.to_string();
        self.with_db(move |db| db.get_or_create_user(&external_id)).await
    }

    /// Every plan the user owns, oldest term first.
    pub async fn list_semester_plans(&self, user_id: u64) -> Result<Vec<SemesterPlanRecord>> {
        self.with_db(move |db| db.list_semester_plans(user_id)).await
    }

    /// A plan's courses with their catalog records, in position order.
    pub async fn plan_courses(&self, plan_id: u64) -> Result<Vec<PlannedCourse>> {
        self.with_db(move |db| db.plan_courses(plan_id)).await
    }

    /// Builds the user's board from the store in one blocking call.
    pub async fn load_board(&self, user_id: u64) -> Result<Board> {
        self.with_db(move |db| {
            let plans = db
                .list_semester_plans(user_id)?
                .into_iter()
                .map(|plan| {
                    let courses = db.plan_courses(plan.id)?;
                    Ok((plan, courses))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Board::from_plans(plans))
        })
        .await
    }
}

impl PlanStore for Planner {
    async fn resolve_semester_plan(&self, user_id: u64, semester: SemesterId) -> Result<SemesterPlanRecord> {
        self.with_db(move |db| db.get_or_create_semester_plan(user_id, semester))
            .await
    }

    async fn find_semester_plan(
        &self,
        user_id: u64,
        semester: SemesterId,
    ) -> Result<Option<SemesterPlanRecord>> {
        self.with_db(move |db| db.find_semester_plan(user_id, semester)).await
    }

    async fn add_course_to_plan(&self, plan_id: u64, course_id: u64) -> Result<()> {
        self.with_db(move |db| db.add_course_to_plan(plan_id, course_id).map(|_| ()))
            .await
    }

    async fn remove_course_from_plan(&self, plan_id: u64, course_id: u64) -> Result<()> {
        self.with_db(move |db| db.remove_course_from_plan(plan_id, course_id))
            .await
    }

    async fn move_course_between_plans(
        &self,
        source_plan: u64,
        destination_plan: u64,
        course_id: u64,
    ) -> Result<()> {
        self.with_db(move |db| db.move_course_between_plans(source_plan, destination_plan, course_id))
            .await
    }

    async fn delete_semester_plan(&self, plan_id: u64) -> Result<()> {
        self.with_db(move |db| db.delete_semester_plan(plan_id)).await
    }

    async fn plan_course_ids(&self, plan_id: u64) -> Result<Vec<u64>> {
        self.with_db(move |db| db.plan_course_ids(plan_id)).await
    }

    async fn find_course(&self, subject: &str, number: &str) -> Result<Option<CourseRecord>> {
        self.course_by_code(subject, number).await
    }
}
