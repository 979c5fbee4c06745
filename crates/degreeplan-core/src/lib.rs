//! Core library for the degreeplan semester planner.
//!
//! A degree plan is a board of semester containers holding course cards.
//! Cards are rearranged by drag and drop; every change is applied to the
//! in-memory [`Board`] first and persisted afterwards through a debounced,
//! coalescing [`WriteQueue`].
//!
//! # Architecture
//!
//! - **Drag geometry** ([`drag`]): pointer positions to drop-target chains
//! - **Board** ([`board`]): semester containers and the reorder/move engine
//! - **Queue** ([`queue`]): write coalescing, retries and ordering
//! - **Store** ([`db`], [`planner`]): SQLite behind an async facade
//! - **Graph** ([`graph`]): prerequisite highlighting over visible courses
//! - **Exchange** ([`exchange`]): JSON and Markdown export, conflict-aware import
//!
//! [`PlanSession`] ties the board and the queue together for one user.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use degreeplan_core::{
//!     models::{Season, SemesterId},
//!     PlanSession, PlannerBuilder, QueueConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = Arc::new(
//!     PlannerBuilder::new()
//!         .with_database_path(Some("plans.db"))
//!         .build()
//!         .await?,
//! );
//! let user = planner.get_or_create_user("local").await?;
//! let board = planner.load_board(user.id).await?;
//!
//! let mut session = PlanSession::start(user.id, board, planner.clone(), QueueConfig::default());
//! session.add_semester(SemesterId::new(Season::Fall, 2024))?;
//!
//! let (board, status) = session.close().await?;
//! println!("{board}\n{status}");
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod db;
pub mod display;
pub mod drag;
pub mod error;
pub mod exchange;
pub mod graph;
pub mod models;
pub mod planner;
pub mod queue;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use board::{Board, BoardMutation, Semester};
pub use db::Database;
pub use display::{Conflicts, CourseDetail, LocalDateTime, OperationStatus, SemesterPlans};
pub use drag::{DragPayload, DragSession, DropEvent, DropTarget, DropTargetKind, DropTargetRegistry, Edge};
pub use error::{PlanError, Result};
pub use exchange::{ImportReport, ImportStrategy, ImportedSemester, SemesterConflict};
pub use graph::{Highlight, RelationshipGraph};
pub use planner::{Planner, PlannerBuilder};
pub use queue::{Operation, QueueConfig, QueueStatus, WriteQueue};
pub use session::PlanSession;
pub use store::PlanStore;
