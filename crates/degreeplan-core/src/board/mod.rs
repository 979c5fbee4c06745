//! The in-memory plan board and the reorder/move engine.
//!
//! A [`Board`] holds the semester containers in chronological order together
//! with the display-id → numeric-course-id map. It changes only through
//! [`Board::apply`], which performs every card move as remove-then-insert, so
//! a card is never duplicated or orphaned.
//!
//! Turning a [`BoardMutation`] into a durable [`Operation`] is a separate
//! step ([`Board::remote_operation`]) that validates the mutation and
//! resolves numeric course ids before anything changes.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    drag::{DropEvent, DropTargetKind, Edge},
    error::{PlanError, Result},
    models::{Course, CourseRecord, PlannedCourse, SemesterId, SemesterPlanRecord},
    queue::Operation,
};

pub mod reorder;


pub use reorder::{reorder, reorder_destination_index};

/// A semester container on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    pub id: SemesterId,
    pub name: String,
    pub completed: bool,
    pub courses: Vec<Course>,
}

impl Semester {
    pub fn new(id: SemesterId) -> Self {
        Self {
            id,
            name: id.long_name(),
            completed: false,
            courses: Vec::new(),
        }
    }

    /// Index of a card, looked up by display id.
    pub fn position(&self, display_id: &str) -> Option<usize> {
        self.courses.iter().position(|c| c.id == display_id)
    }

    /// Sum of the leading credit-hour numbers of every card.
    pub fn credits(&self) -> f64 {
        self.courses.iter().map(Course::credits).sum()
    }
}

/// Display id → numeric course id for every card on the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseIdMap(HashMap<String, u64>);

impl CourseIdMap {
    pub fn get(&self, display_id: &str) -> Option<u64> {
        self.0.get(display_id).copied()
    }

    pub fn contains(&self, display_id: &str) -> bool {
        self.0.contains_key(display_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, display_id: String, course_id: u64) {
        self.0.insert(display_id, course_id);
    }

    fn remove(&mut self, display_id: &str) {
        self.0.remove(display_id);
    }
}

/// A state change of the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardMutation {
    /// Same-container reorder
    Reorder {
        semester: SemesterId,
        start_index: usize,
        finish_index: usize,
    },
    /// Cross-container move
    Move {
        display_id: String,
        source: SemesterId,
        destination: SemesterId,
        destination_index: usize,
    },
    AddCourse {
        semester: SemesterId,
        course: Course,
        course_id: u64,
    },
    RemoveCourse {
        semester: SemesterId,
        display_id: String,
    },
    AddSemester {
        semester: SemesterId,
    },
    DeleteSemester {
        semester: SemesterId,
    },
    ToggleCompleted {
        semester: SemesterId,
    },
}

/// All semester containers of one plan view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    semesters: Vec<Semester>,
    course_ids: CourseIdMap,
    next_display_seq: u64,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the board from stored plans. Card display ids are
    /// `"{SUBJECT}{NUMBER}_{association id}"`.
    pub fn from_plans(plans: Vec<(SemesterPlanRecord, Vec<PlannedCourse>)>) -> Self {
        let mut board = Self::new();
        for (plan, courses) in plans {
            let mut semester = Semester::new(plan.semester);
            semester.completed = plan.complete;
            for planned in courses {
                let display_id = format!(
                    "{}{}_{}",
                    planned.course.subject, planned.course.number, planned.association_id
                );
                board.course_ids.insert(display_id.clone(), planned.course.id);
                semester.courses.push(Course::from_record(display_id, &planned.course));
            }
            board.insert_semester(semester);
        }
        board
    }

    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    pub fn semester(&self, id: SemesterId) -> Option<&Semester> {
        self.semesters.iter().find(|s| s.id == id)
    }

    pub fn course_ids(&self) -> &CourseIdMap {
        &self.course_ids
    }

    /// Numeric course id behind a display id.
    pub fn course_id(&self, display_id: &str) -> Option<u64> {
        self.course_ids.get(display_id)
    }

    /// Semester and index of a card, searched by display id.
    pub fn locate(&self, display_id: &str) -> Option<(SemesterId, usize)> {
        self.semesters
            .iter()
            .find_map(|s| s.position(display_id).map(|idx| (s.id, idx)))
    }

    /// First card whose course code matches, case-insensitively.
    pub fn find_by_code(&self, subject: &str, number: &str) -> Option<(SemesterId, &Course)> {
        self.semesters.iter().find_map(|s| {
            s.courses
                .iter()
                .find(|c| {
                    c.subject.eq_ignore_ascii_case(subject.trim())
                        && c.number.eq_ignore_ascii_case(number.trim())
                })
                .map(|c| (s.id, c))
        })
    }

    /// Numeric id and course code of every card, for the relationship graph.
    pub fn visible_courses(&self) -> Vec<(u64, String)> {
        self.semesters
            .iter()
            .flat_map(|s| s.courses.iter())
            .filter_map(|c| self.course_id(&c.id).map(|id| (id, c.code())))
            .collect()
    }

    pub fn total_credits(&self) -> f64 {
        self.semesters.iter().map(Semester::credits).sum()
    }

    /// Credits in semesters marked completed.
    pub fn completed_credits(&self) -> f64 {
        self.semesters
            .iter()
            .filter(|s| s.completed)
            .map(Semester::credits)
            .sum()
    }

    /// A display id not used by any card: `"{SUBJECT}{NUMBER}_{n}"`.
    pub fn next_display_id(&mut self, record: &CourseRecord) -> String {
        let taken: HashSet<&str> = self
            .semesters
            .iter()
            .flat_map(|s| s.courses.iter().map(|c| c.id.as_str()))
            .collect();
        loop {
            self.next_display_seq += 1;
            let candidate = format!("{}{}_{}", record.subject, record.number, self.next_display_seq);
            if !taken.contains(candidate.as_str()) && !self.course_ids.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn insert_semester(&mut self, semester: Semester) {
        let idx = self.semesters.partition_point(|s| s.id < semester.id);
        self.semesters.insert(idx, semester);
    }

    fn semester_mut(&mut self, id: SemesterId) -> Option<&mut Semester> {
        self.semesters.iter_mut().find(|s| s.id == id)
    }

    fn require_semester(&self, id: SemesterId) -> Result<&Semester> {
        self.semester(id).ok_or_else(|| PlanError::NotOnBoard {
            entity: "Semester",
            id: id.to_string(),
        })
    }

    fn require_course_id(&self, display_id: &str) -> Result<u64> {
        self.course_id(display_id)
            .ok_or_else(|| PlanError::UnresolvedCourse {
                display_id: display_id.to_string(),
            })
    }

    /// Translates a finished drop into a board mutation.
    ///
    /// A chain of one container means "append at the end"; a card followed
    /// by its container means "insert beside that card on its edge"; the
    /// trash removes the card. An empty chain is a cancelled drop. Returns
    /// `None` when the drop leaves the board unchanged.
    pub fn resolve_drop(&self, event: &DropEvent) -> Result<Option<BoardMutation>> {
        if event.targets.is_empty() {
            return Ok(None);
        }
        let (source, start_index) = self.locate(&event.display_id).ok_or_else(|| PlanError::NotOnBoard {
            entity: "Course",
            id: event.display_id.clone(),
        })?;

        let kinds: Vec<&DropTargetKind> = event.targets.iter().map(|t| &t.kind).collect();
        let mutation = match kinds.as_slice() {
            [DropTargetKind::Trash] => BoardMutation::RemoveCourse {
                semester: source,
                display_id: event.display_id.clone(),
            },
            [DropTargetKind::Container { semester }] => {
                self.container_drop(&event.display_id, source, start_index, *semester)?
            }
            [DropTargetKind::Card { display_id: target }, DropTargetKind::Container { semester }] => {
                let destination = self.require_semester(*semester)?;
                match destination.position(target) {
                    Some(target_index) => self.card_drop(
                        &event.display_id,
                        source,
                        start_index,
                        *semester,
                        target_index,
                        event.targets[0].edge,
                    ),
                    None => {
                        log::debug!("Drop target {target} is gone; treating as container drop");
                        self.container_drop(&event.display_id, source, start_index, *semester)?
                    }
                }
            }
            _ => {
                return Err(PlanError::invalid_input(
                    "drop targets",
                    format!("unsupported target chain {kinds:?}"),
                ))
            }
        };

        Ok(match mutation {
            BoardMutation::Reorder {
                start_index,
                finish_index,
                ..
            } if start_index == finish_index => None,
            mutation => Some(mutation),
        })
    }

    fn container_drop(
        &self,
        display_id: &str,
        source: SemesterId,
        start_index: usize,
        destination: SemesterId,
    ) -> Result<BoardMutation> {
        let len = self.require_semester(destination)?.courses.len();
        Ok(if destination == source {
            BoardMutation::Reorder {
                semester: source,
                start_index,
                finish_index: len,
            }
        } else {
            BoardMutation::Move {
                display_id: display_id.to_string(),
                source,
                destination,
                destination_index: len,
            }
        })
    }

    fn card_drop(
        &self,
        display_id: &str,
        source: SemesterId,
        start_index: usize,
        destination: SemesterId,
        target_index: usize,
        edge: Option<Edge>,
    ) -> BoardMutation {
        if destination == source {
            BoardMutation::Reorder {
                semester: source,
                start_index,
                finish_index: reorder_destination_index(start_index, target_index, edge),
            }
        } else {
            let destination_index = match edge {
                Some(Edge::Bottom) => target_index + 1,
                Some(Edge::Top) | None => target_index,
            };
            BoardMutation::Move {
                display_id: display_id.to_string(),
                source,
                destination,
                destination_index,
            }
        }
    }

    /// Validates a mutation against the current board and returns the
    /// durable write it implies, if any.
    ///
    /// Reorders and completion toggles are local only. Fails with
    /// [`PlanError::UnresolvedCourse`] when a card has no numeric id, in
    /// which case the mutation must not be applied either.
    pub fn remote_operation(&self, mutation: &BoardMutation, user_id: u64) -> Result<Option<Operation>> {
        match mutation {
            BoardMutation::Reorder { semester, .. } | BoardMutation::ToggleCompleted { semester } => {
                self.require_semester(*semester)?;
                Ok(None)
            }
            BoardMutation::Move {
                display_id,
                source,
                destination,
                ..
            } => {
                self.require_card(*source, display_id)?;
                self.require_semester(*destination)?;
                let course_id = self.require_course_id(display_id)?;
                if source == destination {
                    return Ok(None);
                }
                self.require_not_holding(*destination, course_id)?;
                Ok(Some(Operation::MoveCourse {
                    user_id,
                    source: *source,
                    destination: *destination,
                    course_id,
                }))
            }
            BoardMutation::AddCourse {
                semester,
                course,
                course_id,
            } => {
                self.require_semester(*semester)?;
                if self.locate(&course.id).is_some() || self.course_ids.contains(&course.id) {
                    return Err(PlanError::invalid_input(
                        "display_id",
                        format!("'{}' is already on the board", course.id),
                    ));
                }
                self.require_not_holding(*semester, *course_id)?;
                Ok(Some(Operation::AddCourse {
                    user_id,
                    semester: *semester,
                    course_id: *course_id,
                }))
            }
            BoardMutation::RemoveCourse {
                semester,
                display_id,
            } => {
                self.require_card(*semester, display_id)?;
                let course_id = self.require_course_id(display_id)?;
                Ok(Some(Operation::RemoveCourse {
                    user_id,
                    semester: *semester,
                    course_id,
                }))
            }
            BoardMutation::AddSemester { semester } => {
                if self.semester(*semester).is_some() {
                    return Err(PlanError::invalid_input(
                        "semester",
                        format!("{} is already on the board", semester.long_name()),
                    ));
                }
                Ok(Some(Operation::AddSemester {
                    user_id,
                    semester: *semester,
                }))
            }
            BoardMutation::DeleteSemester { semester } => {
                self.require_semester(*semester)?;
                Ok(Some(Operation::DeleteSemester {
                    user_id,
                    semester: *semester,
                }))
            }
        }
    }

    /// The store keeps one association per course and semester, so a
    /// semester may hold each catalog course only once.
    fn require_not_holding(&self, semester: SemesterId, course_id: u64) -> Result<()> {
        let held = self
            .require_semester(semester)?
            .courses
            .iter()
            .find(|c| self.course_ids.get(&c.id) == Some(course_id));
        match held {
            Some(card) => Err(PlanError::invalid_input(
                "course_id",
                format!("{} is already in {}", card.code(), semester.long_name()),
            )),
            None => Ok(()),
        }
    }

    fn require_card(&self, semester: SemesterId, display_id: &str) -> Result<usize> {
        self.require_semester(semester)?
            .position(display_id)
            .ok_or_else(|| PlanError::NotOnBoard {
                entity: "Course",
                id: display_id.to_string(),
            })
    }

    /// Applies a mutation in place. Never fails: indices are clamped and
    /// references to missing semesters or cards leave the board unchanged.
    pub fn apply(&mut self, mutation: &BoardMutation) {
        match mutation {
            BoardMutation::Reorder {
                semester,
                start_index,
                finish_index,
            } => {
                if let Some(semester) = self.semester_mut(*semester) {
                    reorder(&mut semester.courses, *start_index, *finish_index);
                }
            }
            BoardMutation::Move {
                display_id,
                source,
                destination,
                destination_index,
            } => {
                if self.semester(*destination).is_none() {
                    return;
                }
                let card = self.semester_mut(*source).and_then(|s| {
                    let idx = s.position(display_id)?;
                    Some(s.courses.remove(idx))
                });
                if let (Some(card), Some(destination)) = (card, self.semester_mut(*destination)) {
                    let idx = (*destination_index).min(destination.courses.len());
                    destination.courses.insert(idx, card);
                }
            }
            BoardMutation::AddCourse {
                semester,
                course,
                course_id,
            } => {
                if let Some(semester) = self.semester_mut(*semester) {
                    semester.courses.push(course.clone());
                    self.course_ids.insert(course.id.clone(), *course_id);
                }
            }
            BoardMutation::RemoveCourse {
                semester,
                display_id,
            } => {
                if let Some(semester) = self.semester_mut(*semester) {
                    semester.courses.retain(|c| c.id != *display_id);
                    self.course_ids.remove(display_id);
                }
            }
            BoardMutation::AddSemester { semester } => {
                if self.semester(*semester).is_none() {
                    self.insert_semester(Semester::new(*semester));
                }
            }
            BoardMutation::DeleteSemester { semester } => {
                if let Some(idx) = self.semesters.iter().position(|s| s.id == *semester) {
                    let removed = self.semesters.remove(idx);
                    for course in &removed.courses {
                        self.course_ids.remove(&course.id);
                    }
                }
            }
            BoardMutation::ToggleCompleted { semester } => {
                if let Some(semester) = self.semester_mut(*semester) {
                    semester.completed = !semester.completed;
                }
            }
        }
    }
}
