//! Durable user and semester-plan records.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::SemesterId;

/// Internal user row resolved from the identity provider's opaque handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u64,
    pub external_id: String,
    pub created_at: Timestamp,
}

/// One user's course set for one academic term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemesterPlanRecord {
    pub id: u64,
    pub user_id: u64,
    pub term_id: u64,
    pub semester: SemesterId,
    pub plan_name: String,
    #[serde(default)]
    pub complete: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A course association row joined with its catalog record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannedCourse {
    /// Id of the course-to-plan association row
    pub association_id: u64,
    pub course: super::CourseRecord,
}
