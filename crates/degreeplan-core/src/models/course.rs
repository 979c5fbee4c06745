//! Catalog rows and the display form of a course card.

use serde::{Deserialize, Serialize};

use super::{PrereqTree, SemesterId, TermGrades};

/// Human-readable course code: subject and number joined by a space.
pub fn course_code(subject: &str, number: &str) -> String {
    format!("{} {}", subject.trim(), number.trim())
}

/// Leading number of a credit-hours text ("3 to 4 hours" counts as 3).
pub fn leading_credit_hours(text: &str) -> f64 {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_digit() || c == '.'))
        .map_or(text.len(), |(i, _)| i);
    text[..end].trim_end_matches('.').parse().unwrap_or(0.0)
}

/// A catalog course as held by the store, keyed by its numeric id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseRecord {
    /// Numeric course identifier used by every durable write
    pub id: u64,
    pub subject: String,
    pub number: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Free-form text such as "3 hours" or "3 to 4 hours"
    pub credit_hours: Option<String>,
    pub degree_attributes: Option<String>,
    /// Raw prerequisite logic, if the catalog has any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<PrereqTree>,
    /// Terms in which the course has been offered, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offered: Vec<SemesterId>,
    /// General-education codes such as "QR1", sorted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gen_eds: Vec<String>,
    /// Grade distributions, oldest term first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grades: Vec<TermGrades>,
}

impl CourseRecord {
    pub fn code(&self) -> String {
        course_code(&self.subject, &self.number)
    }

    /// Average GPA of the most recent term with recorded grades.
    pub fn latest_gpa(&self) -> Option<(SemesterId, f64)> {
        let latest = self.grades.iter().max_by_key(|g| g.semester)?;
        latest.average().map(|gpa| (latest.semester, gpa))
    }
}

/// Catalog entry as loaded from a catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewCourse {
    pub subject: String,
    pub number: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub credit_hours: Option<String>,
    #[serde(default)]
    pub degree_attributes: Option<String>,
    #[serde(default)]
    pub prerequisites: Option<PrereqTree>,
    #[serde(default)]
    pub offered: Vec<SemesterId>,
    #[serde(default)]
    pub gen_eds: Vec<String>,
    #[serde(default)]
    pub grades: Vec<TermGrades>,
}

/// A course card on the board.
///
/// `id` is a session-local display id, distinct from the numeric id in the
/// store; the board keeps the mapping between the two.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: String,
    pub subject: String,
    pub number: String,
    pub title: String,
    pub description: String,
    pub credit_hours: String,
    /// Offered terms in long form ("Fall 2024"), oldest first
    pub terms_offered: Vec<String>,
    pub degree_attributes: Option<String>,
}

impl Course {
    /// Builds the card for a catalog record under the given display id.
    pub fn from_record(display_id: impl Into<String>, record: &CourseRecord) -> Self {
        let mut offered = record.offered.clone();
        offered.sort();
        Self {
            id: display_id.into(),
            subject: record.subject.clone(),
            number: record.number.clone(),
            title: record.title.clone().unwrap_or_default(),
            description: record.description.clone().unwrap_or_default(),
            credit_hours: record.credit_hours.clone().unwrap_or_default(),
            terms_offered: offered.iter().map(SemesterId::long_name).collect(),
            degree_attributes: record.degree_attributes.clone(),
        }
    }

    pub fn code(&self) -> String {
        course_code(&self.subject, &self.number)
    }

    pub fn credits(&self) -> f64 {
        leading_credit_hours(&self.credit_hours)
    }
}
