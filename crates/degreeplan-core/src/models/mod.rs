//! Data models for courses, semesters and durable plan records.
//!
//! Display implementations live in [`crate::display`] so these types stay
//! plain data.

pub mod course;
pub mod grades;
pub mod plan;
pub mod prereq;
pub mod semester;


pub use course::{course_code, leading_credit_hours, Course, CourseRecord, NewCourse};
pub use grades::{gen_ed_description, TermGrades};
pub use plan::{PlannedCourse, SemesterPlanRecord, User};
pub use prereq::PrereqTree;
pub use semester::{Season, SemesterId};
