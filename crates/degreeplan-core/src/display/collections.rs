//! Wrapper types for displaying lists of stored rows.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{exchange::SemesterConflict, models::SemesterPlanRecord};

/// A user's stored semester plans as a Markdown table.
///
/// # Examples
///
/// ```rust
/// use degreeplan_core::{
///     display::SemesterPlans,
///     models::{Season, SemesterId, SemesterPlanRecord},
/// };
/// use jiff::Timestamp;
///
/// let plan = SemesterPlanRecord {
///     id: 3,
///     user_id: 1,
///     term_id: 9,
///     semester: SemesterId::new(Season::Fall, 2024),
///     plan_name: "Fall 2024".to_string(),
///     complete: false,
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
/// };
/// let output = SemesterPlans(vec![plan]).to_string();
/// assert!(output.contains("| FALL2024 | Fall 2024 |"));
/// ```
pub struct SemesterPlans(pub Vec<SemesterPlanRecord>);

impl SemesterPlans {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for SemesterPlans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No stored semester plans.");
        }
        writeln!(f, "| Id | Name | Complete | Updated |")?;
        writeln!(f, "|----|------|----------|---------|")?;
        for plan in &self.0 {
            writeln!(
                f,
                "| {} | {} | {} | {} |",
                plan.semester,
                plan.plan_name,
                if plan.complete { "yes" } else { "no" },
                LocalDateTime(&plan.updated_at)
            )?;
        }
        Ok(())
    }
}

/// Semesters an import would overwrite or merge into.
pub struct Conflicts<'a>(pub &'a [SemesterConflict]);

impl fmt::Display for Conflicts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No conflicting semesters.");
        }
        writeln!(f, "## Conflicting semesters")?;
        writeln!(f)?;
        for conflict in self.0 {
            writeln!(
                f,
                "- **{}**: {} stored course(s), {} in the import",
                conflict.semester, conflict.existing_course_count, conflict.import_course_count
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Choose `--strategy merge` or `--strategy replace`.")
    }
}
