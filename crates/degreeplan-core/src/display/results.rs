//! Display for command outcomes: catalog detail, import reports, highlight
//! sets and queue status.

use std::fmt;

use crate::{
    exchange::ImportReport,
    graph::Highlight,
    models::{gen_ed_description, CourseRecord, SemesterId},
    queue::{QueuePhase, QueueStatus},
};

/// Full catalog entry for one course.
pub struct CourseDetail<'a>(pub &'a CourseRecord);

impl fmt::Display for CourseDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let course = self.0;
        match &course.title {
            Some(title) => writeln!(f, "# {}: {title}", course.code())?,
            None => writeln!(f, "# {}", course.code())?,
        }
        writeln!(f)?;

        writeln!(f, "- Id: {}", course.id)?;
        if let Some(hours) = &course.credit_hours {
            writeln!(f, "- Credit hours: {hours}")?;
        }
        if let Some(attributes) = &course.degree_attributes {
            writeln!(f, "- Degree attributes: {attributes}")?;
        }
        if let Some(prerequisites) = &course.prerequisites {
            writeln!(f, "- Prerequisites: {prerequisites}")?;
        }
        if !course.offered.is_empty() {
            let terms: Vec<String> = course.offered.iter().map(SemesterId::long_name).collect();
            writeln!(f, "- Offered: {}", terms.join(", "))?;
        }
        if !course.gen_eds.is_empty() {
            let gen_eds: Vec<String> = course
                .gen_eds
                .iter()
                .map(|code| match gen_ed_description(code) {
                    Some(description) => format!("{code} ({description})"),
                    None => code.clone(),
                })
                .collect();
            writeln!(f, "- Gen-eds: {}", gen_eds.join(", "))?;
        }
        if let Some((semester, gpa)) = course.latest_gpa() {
            writeln!(f, "- Latest GPA: {gpa:.2} ({})", semester.long_name())?;
        }

        if let Some(description) = &course.description {
            writeln!(f)?;
            writeln!(f, "{description}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        if !self.imported_semesters.is_empty() {
            writeln!(f)?;
            writeln!(f, "Semesters: {}", self.imported_semesters.join(", "))?;
        }
        if !self.errors.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Problems")?;
            writeln!(f)?;
            for error in &self.errors {
                writeln!(f, "- {error}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn section(f: &mut fmt::Formatter<'_>, title: &str, codes: &[&String]) -> fmt::Result {
            writeln!(f, "## {title}")?;
            writeln!(f)?;
            if codes.is_empty() {
                return writeln!(f, "*None on this plan*");
            }
            for code in codes {
                writeln!(f, "- {code}")?;
            }
            Ok(())
        }

        writeln!(f, "# {}", self.course)?;
        writeln!(f)?;
        section(f, "Prerequisites", &self.prerequisites.iter().collect::<Vec<_>>())?;
        writeln!(f)?;
        section(f, "Postrequisites", &self.postrequisites.iter().collect::<Vec<_>>())
    }
}

impl fmt::Display for QueuePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueuePhase::Idle => "idle",
            QueuePhase::Scheduled => "scheduled",
            QueuePhase::Executing => "executing",
        })
    }
}

/// One-line summary, e.g. `idle: 3 written, 1 merged, 0 failed`.
impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} written, {} merged, {} failed",
            self.phase, self.stats.executed, self.stats.superseded, self.stats.failed
        )?;
        if self.pending > 0 {
            write!(f, ", {} pending", self.pending)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::models::{PrereqTree, Season, TermGrades};

    #[test]
    fn test_course_detail() {
        let record = CourseRecord {
            id: 12,
            subject: "CS".to_string(),
            number: "2110".to_string(),
            title: Some("Data Structures".to_string()),
            description: Some("Lists and trees.".to_string()),
            credit_hours: Some("3 hours".to_string()),
            degree_attributes: None,
            prerequisites: Some(PrereqTree::Course("CS 1110".to_string())),
            offered: vec![SemesterId::new(Season::Fall, 2024)],
            gen_eds: vec!["QR1".to_string(), "XYZ".to_string()],
            grades: vec![
                TermGrades { a: 4, ..TermGrades::new(SemesterId::new(Season::Fall, 2024)) },
                TermGrades {
                    a: 1,
                    b: 1,
                    ..TermGrades::new(SemesterId::new(Season::Spring, 2025))
                },
            ],
        };
        let output = CourseDetail(&record).to_string();

        assert!(output.starts_with("# CS 2110: Data Structures"));
        assert!(output.contains("- Prerequisites: CS 1110"));
        assert!(output.contains("- Offered: Fall 2024"));
        assert!(output.contains("- Gen-eds: QR1 (Quantitative Reasoning 1), XYZ"));
        assert!(output.contains("- Latest GPA: 3.50 (Spring 2025)"));
        assert!(output.ends_with("Lists and trees.\n"));
    }

    #[test]
    fn test_import_report_lists_problems() {
        let report = ImportReport {
            imported_semesters: vec!["Fall 2024".to_string()],
            imported_courses: 1,
            errors: vec!["Course not found: CS 9999".to_string()],
            message: "Imported 1 course(s) across 1 semester(s).".to_string(),
        };
        let output = report.to_string();
        assert!(output.contains("Semesters: Fall 2024"));
        assert!(output.contains("- Course not found: CS 9999"));
    }

    #[test]
    fn test_highlight_display() {
        let highlight = Highlight {
            course: "CS 2110".to_string(),
            prerequisites: BTreeSet::from(["CS 1110".to_string()]),
            postrequisites: BTreeSet::new(),
        };
        let output = highlight.to_string();
        assert!(output.contains("## Prerequisites\n\n- CS 1110"));
        assert!(output.contains("## Postrequisites\n\n*None on this plan*"));
    }

    #[test]
    fn test_queue_status_line() {
        let mut status = QueueStatus::default();
        status.stats.executed = 3;
        status.pending = 2;
        assert_eq!(status.to_string(), "idle: 3 written, 0 merged, 0 failed, 2 pending");
    }
}
