//! Moving a plan in and out of the application.
//!
//! Exports are built from the board as the user sees it. Imports go straight
//! to the store through [`import_plan`], after [`detect_conflicts`] has told
//! the caller which semesters already hold courses.

use serde::{Deserialize, Serialize};

use crate::{
    board::Board,
    error::{PlanError, Result},
    models::{NewCourse, SemesterId},
};

pub mod conflicts;

pub use conflicts::{detect_conflicts, import_plan, ImportReport, ImportStrategy, SemesterConflict};

/// One course line of an exported or imported plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedCourse {
    pub subject: String,
    pub number: String,
    #[serde(default)]
    pub name: String,
}

/// One semester of an exported or imported plan, named like "Fall 2024".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedSemester {
    pub semester: String,
    pub courses: Vec<ImportedCourse>,
}

impl ImportedSemester {
    pub fn semester_id(&self) -> Result<SemesterId> {
        SemesterId::from_name(&self.semester)
    }
}

/// The board's semesters and cards in exchange form.
pub fn board_semesters(board: &Board) -> Vec<ImportedSemester> {
    board
        .semesters()
        .iter()
        .map(|semester| ImportedSemester {
            semester: semester.name.clone(),
            courses: semester
                .courses
                .iter()
                .map(|course| ImportedCourse {
                    subject: course.subject.clone(),
                    number: course.number.clone(),
                    name: course.title.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Pretty-printed JSON array of semesters.
pub fn export_json(board: &Board) -> Result<String> {
    Ok(serde_json::to_string_pretty(&board_semesters(board))?)
}

/// Parses a JSON export. Short semester names ("Fa 2024") are rewritten to
/// the long form; names that do not parse are kept so the import can report
/// them.
///
/// # Errors
///
/// Returns `PlanError::Serialization` for malformed JSON and
/// `PlanError::InvalidInput` for a course without subject or number.
pub fn parse_json(content: &str) -> Result<Vec<ImportedSemester>> {
    let mut semesters: Vec<ImportedSemester> = serde_json::from_str(content)?;

    for semester in &mut semesters {
        if let Some(course) = semester
            .courses
            .iter()
            .find(|c| c.subject.trim().is_empty() || c.number.trim().is_empty())
        {
            return Err(PlanError::invalid_input(
                "courses",
                format!(
                    "course '{} {}' in {} needs a subject and a number",
                    course.subject, course.number, semester.semester
                ),
            ));
        }
        match SemesterId::canonical_name(&semester.semester) {
            Ok(name) => semester.semester = name,
            Err(e) => log::debug!("Keeping semester name as given: {e}"),
        }
    }
    Ok(semesters)
}

/// Parses a catalog file: a JSON array of courses.
pub fn parse_catalog(content: &str) -> Result<Vec<NewCourse>> {
    let courses: Vec<NewCourse> = serde_json::from_str(content)?;
    log::debug!("Parsed {} catalog entr(ies)", courses.len());
    Ok(courses)
}

/// Markdown course list, one section per semester.
pub fn export_markdown(board: &Board) -> String {
    let mut markdown = String::from("# Course List\n\n");

    for semester in board_semesters(board) {
        markdown.push_str(&format!("## {}\n\n", semester.semester));
        if semester.courses.is_empty() {
            markdown.push_str("*No courses for this semester*\n\n");
            continue;
        }
        markdown.push_str("| Subject | Number | Course Name |\n");
        markdown.push_str("|---------|--------|-------------|\n");
        for course in &semester.courses {
            markdown.push_str(&format!(
                "| {} | {} | {} |\n",
                course.subject, course.number, course.name
            ));
        }
        markdown.push('\n');
    }
    markdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board::BoardMutation,
        models::{Course, CourseRecord, Season},
    };

    fn record(id: u64, subject: &str, number: &str, title: &str) -> CourseRecord {
        CourseRecord {
            id,
            subject: subject.to_string(),
            number: number.to_string(),
            title: Some(title.to_string()),
            description: None,
            credit_hours: Some("3 hours".to_string()),
            degree_attributes: None,
            prerequisites: None,
            offered: Vec::new(),
            gen_eds: Vec::new(),
            grades: Vec::new(),
        }
    }

    fn sample_board() -> Board {
        let fall = SemesterId::new(Season::Fall, 2024);
        let spring = SemesterId::new(Season::Spring, 2025);
        let mut board = Board::new();
        board.apply(&BoardMutation::AddSemester { semester: fall });
        board.apply(&BoardMutation::AddSemester { semester: spring });

        let cs = record(7, "CS", "1110", "Intro to Programming");
        let display_id = board.next_display_id(&cs);
        board.apply(&BoardMutation::AddCourse {
            semester: fall,
            course: Course::from_record(display_id, &cs),
            course_id: cs.id,
        });
        board
    }

    #[test]
    fn test_export_json_shape() {
        let json = export_json(&sample_board()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["semester"], "Fall 2024");
        assert_eq!(value[0]["courses"][0]["subject"], "CS");
        assert_eq!(value[0]["courses"][0]["number"], "1110");
        assert_eq!(value[0]["courses"][0]["name"], "Intro to Programming");
        assert_eq!(value[1]["semester"], "Spring 2025");
        assert_eq!(value[1]["courses"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_parse_json_normalizes_short_names() {
        let parsed = parse_json(
            r#"[{"semester": "Fa 2024", "courses": [{"subject": "CS", "number": "1110"}]},
                {"semester": "Spring 2025", "courses": []}]"#,
        )
        .unwrap();

        assert_eq!(parsed[0].semester, "Fall 2024");
        assert_eq!(parsed[0].courses[0].name, "");
        assert_eq!(parsed[1].semester, "Spring 2025");
        assert_eq!(
            parsed[0].semester_id().unwrap(),
            SemesterId::new(Season::Fall, 2024)
        );
    }

    #[test]
    fn test_parse_json_keeps_unknown_semester_names() {
        let parsed = parse_json(r#"[{"semester": "Autumn 2024", "courses": []}]"#).unwrap();
        assert_eq!(parsed[0].semester, "Autumn 2024");
        assert!(parsed[0].semester_id().is_err());
    }

    #[test]
    fn test_parse_json_rejects_bad_input() {
        assert!(matches!(
            parse_json(r#"{"semester": "Fall 2024"}"#),
            Err(PlanError::Serialization { .. })
        ));
        assert!(matches!(
            parse_json(r#"[{"semester": "Fall 2024", "courses": [{"subject": "", "number": "1"}]}]"#),
            Err(PlanError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_exported_json_parses_back() {
        let board = sample_board();
        let parsed = parse_json(&export_json(&board).unwrap()).unwrap();
        assert_eq!(parsed, board_semesters(&board));
    }

    #[test]
    fn test_parse_catalog_defaults() {
        let courses = parse_catalog(
            r#"[{"subject": "CS", "number": "2110", "prerequisites": {"and": ["CS 1110"]},
                 "offered": ["FALL2024", "SP2025"]}]"#,
        )
        .unwrap();
        assert_eq!(courses.len(), 1);
        assert!(courses[0].title.is_none());
        assert_eq!(courses[0].offered[1], SemesterId::new(Season::Spring, 2025));
    }

    #[test]
    fn test_export_markdown() {
        let markdown = export_markdown(&sample_board());
        assert!(markdown.starts_with("# Course List\n\n## Fall 2024\n\n"));
        assert!(markdown.contains("| Subject | Number | Course Name |"));
        assert!(markdown.contains("| CS | 1110 | Intro to Programming |"));
        assert!(markdown.contains("## Spring 2025\n\n*No courses for this semester*"));
    }
}
