//! Durable write operations and their execution against a [`PlanStore`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{PlanError, Result},
    models::SemesterId,
    store::PlanStore,
};

/// Discriminant of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    AddCourse,
    RemoveCourse,
    MoveCourse,
    DeleteSemester,
    AddSemester,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::AddCourse => "ADD_COURSE",
            OperationKind::RemoveCourse => "REMOVE_COURSE",
            OperationKind::MoveCourse => "MOVE_COURSE",
            OperationKind::DeleteSemester => "DELETE_SEMESTER",
            OperationKind::AddSemester => "ADD_SEMESTER",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plan mutation to persist. Course ids are numeric store ids, never
/// display ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    AddCourse {
        user_id: u64,
        semester: SemesterId,
        course_id: u64,
    },
    RemoveCourse {
        user_id: u64,
        semester: SemesterId,
        course_id: u64,
    },
    MoveCourse {
        user_id: u64,
        source: SemesterId,
        destination: SemesterId,
        course_id: u64,
    },
    DeleteSemester {
        user_id: u64,
        semester: SemesterId,
    },
    AddSemester {
        user_id: u64,
        semester: SemesterId,
    },
}

/// What a coalescing key is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    /// A course within one semester
    Placement { course_id: u64, semester: SemesterId },
    /// A course wherever it currently lives
    Course(u64),
    Semester(SemesterId),
}

/// Operations sharing a key collapse to the last one enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoalesceKey {
    pub kind: OperationKind,
    pub user_id: u64,
    pub subject: Subject,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::AddCourse { .. } => OperationKind::AddCourse,
            Operation::RemoveCourse { .. } => OperationKind::RemoveCourse,
            Operation::MoveCourse { .. } => OperationKind::MoveCourse,
            Operation::DeleteSemester { .. } => OperationKind::DeleteSemester,
            Operation::AddSemester { .. } => OperationKind::AddSemester,
        }
    }

    pub fn user_id(&self) -> u64 {
        match self {
            Operation::AddCourse { user_id, .. }
            | Operation::RemoveCourse { user_id, .. }
            | Operation::MoveCourse { user_id, .. }
            | Operation::DeleteSemester { user_id, .. }
            | Operation::AddSemester { user_id, .. } => *user_id,
        }
    }

    /// Coalescing key: operation kind plus the entity it acts on.
    ///
    /// Adds and removes are keyed by course *and* semester so that adding a
    /// course to two different semesters keeps both writes.
    pub fn key(&self) -> CoalesceKey {
        let subject = match self {
            Operation::AddCourse {
                semester,
                course_id,
                ..
            }
            | Operation::RemoveCourse {
                semester,
                course_id,
                ..
            } => Subject::Placement {
                course_id: *course_id,
                semester: *semester,
            },
            Operation::MoveCourse { course_id, .. } => Subject::Course(*course_id),
            Operation::DeleteSemester { semester, .. } | Operation::AddSemester { semester, .. } => {
                Subject::Semester(*semester)
            }
        };
        CoalesceKey {
            kind: self.kind(),
            user_id: self.user_id(),
            subject,
        }
    }

    /// Numeric course id for course-level operations.
    pub fn course_id(&self) -> Option<u64> {
        match self {
            Operation::AddCourse { course_id, .. }
            | Operation::RemoveCourse { course_id, .. }
            | Operation::MoveCourse { course_id, .. } => Some(*course_id),
            Operation::DeleteSemester { .. } | Operation::AddSemester { .. } => None,
        }
    }

    /// Semesters whose stored plan the operation reads or writes.
    pub fn semesters(&self) -> Vec<SemesterId> {
        match self {
            Operation::AddCourse { semester, .. }
            | Operation::RemoveCourse { semester, .. }
            | Operation::DeleteSemester { semester, .. }
            | Operation::AddSemester { semester, .. } => vec![*semester],
            Operation::MoveCourse {
                source,
                destination,
                ..
            } => vec![*source, *destination],
        }
    }

    /// Whether running the two operations in a different order could leave
    /// the store in a different state: they act on the same course, or one
    /// creates or deletes a semester the other uses.
    pub fn conflicts_with(&self, other: &Operation) -> bool {
        if self.user_id() != other.user_id() {
            return false;
        }
        if self.course_id().is_some() && self.course_id() == other.course_id() {
            return true;
        }
        let semester_op = |op: &Operation| match op {
            Operation::DeleteSemester { semester, .. } | Operation::AddSemester { semester, .. } => {
                Some(*semester)
            }
            _ => None,
        };
        semester_op(self).is_some_and(|s| other.semesters().contains(&s))
            || semester_op(other).is_some_and(|s| self.semesters().contains(&s))
    }

    /// Executes the operation against the store.
    pub async fn execute<S: PlanStore>(&self, store: &S) -> Result<()> {
        match self {
            Operation::AddCourse {
                user_id,
                semester,
                course_id,
            } => {
                let plan = store.resolve_semester_plan(*user_id, *semester).await?;
                store.add_course_to_plan(plan.id, *course_id).await
            }
            Operation::RemoveCourse {
                user_id,
                semester,
                course_id,
            } => {
                let plan = store
                    .find_semester_plan(*user_id, *semester)
                    .await?
                    .ok_or_else(|| PlanError::not_found("Semester plan", semester))?;
                store.remove_course_from_plan(plan.id, *course_id).await
            }
            Operation::MoveCourse {
                user_id,
                source,
                destination,
                course_id,
            } => {
                let source = store.resolve_semester_plan(*user_id, *source).await?;
                let destination = store.resolve_semester_plan(*user_id, *destination).await?;
                store
                    .move_course_between_plans(source.id, destination.id, *course_id)
                    .await
            }
            Operation::DeleteSemester { user_id, semester } => {
                let plan = store
                    .find_semester_plan(*user_id, *semester)
                    .await?
                    .ok_or_else(|| PlanError::not_found("Semester plan", semester))?;
                store.delete_semester_plan(plan.id).await
            }
            Operation::AddSemester { user_id, semester } => {
                store.resolve_semester_plan(*user_id, *semester).await?;
                Ok(())
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::AddCourse {
                semester,
                course_id,
                ..
            }
            | Operation::RemoveCourse {
                semester,
                course_id,
                ..
            } => write!(f, "{} course {course_id} in {semester}", self.kind()),
            Operation::MoveCourse {
                source,
                destination,
                course_id,
                ..
            } => write!(f, "{} course {course_id} {source} -> {destination}", self.kind()),
            Operation::DeleteSemester { semester, .. } | Operation::AddSemester { semester, .. } => {
                write!(f, "{} {semester}", self.kind())
            }
        }
    }
}
