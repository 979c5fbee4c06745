//! Markdown rendering for boards, catalog entries and operation outcomes.
//!
//! Domain types implement `Display` directly (see [`models`]); groups of
//! rows and the outcomes of commands use small wrapper types. Everything
//! produces Markdown so that the terminal renderer can style it.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Board, Course, │    │ Wrappers and    │    │    Markdown     │
//! │  ImportReport   │───▶│ Display impls   │───▶│ (terminal/file) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use degreeplan_core::{
//!     display::OperationStatus,
//!     models::{Season, SemesterId},
//!     Board, BoardMutation,
//! };
//!
//! let mut board = Board::new();
//! board.apply(&BoardMutation::AddSemester {
//!     semester: SemesterId::new(Season::Fall, 2024),
//! });
//! assert!(board.to_string().contains("## Fall 2024"));
//!
//! let status = OperationStatus::success("Added Fall 2024");
//! assert!(status.to_string().starts_with("Success:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Conflicts, SemesterPlans};
pub use datetime::LocalDateTime;
pub use results::CourseDetail;
pub use status::OperationStatus;
