//! Subcommand arguments and their handlers.
//!
//! Every board change runs through a [`PlanSession`]: the board is updated
//! first, the matching write is queued, and the command waits for the queue
//! to drain before it reports success.
//!
//! ```text
//! clap args → Cli handler → PlanSession (board + WriteQueue) → Planner
//! ```

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use degreeplan_core::{
    exchange::{self, detect_conflicts, import_plan},
    models::{course_code, Season, SemesterId},
    Conflicts, CourseDetail, DropEvent, DropTarget, ImportStrategy, OperationStatus,
    PlanSession, Planner, QueueConfig, RelationshipGraph, SemesterPlans,
};

use crate::renderer::TerminalRenderer;

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum SeasonArg {
    Fall,
    Spring,
    Summer,
    Winter,
}

impl From<SeasonArg> for Season {
    fn from(val: SeasonArg) -> Self {
        match val {
            SeasonArg::Fall => Season::Fall,
            SeasonArg::Spring => Season::Spring,
            SeasonArg::Summer => Season::Summer,
            SeasonArg::Winter => Season::Winter,
        }
    }
}

/// Add an empty semester
#[derive(Args)]
pub struct AddSemesterArgs {
    #[arg(value_enum)]
    pub season: SeasonArg,
    #[arg(help = "Four-digit year, e.g. 2024")]
    pub year: u16,
}

impl From<AddSemesterArgs> for SemesterId {
    fn from(val: AddSemesterArgs) -> Self {
        SemesterId::new(val.season.into(), val.year)
    }
}

/// Delete a semester and every course in it
#[derive(Args)]
pub struct RemoveSemesterArgs {
    #[arg(help = "Semester id such as FALL2024 or FA2024")]
    pub id: SemesterId,
}

#[derive(Subcommand)]
pub enum SemesterCommands {
    #[command(alias = "a")]
    Add(AddSemesterArgs),
    #[command(aliases = ["d", "delete"])]
    Rm(RemoveSemesterArgs),
    /// List stored semester plans
    #[command(aliases = ["l", "ls"])]
    List,
}

/// Subject and number of a course, e.g. `CS 2110`
#[derive(Args, Clone)]
pub struct CourseCodeArgs {
    pub subject: String,
    pub number: String,
}

/// Place a catalog course in a semester
#[derive(Args)]
pub struct AddCourseArgs {
    #[arg(help = "Semester id such as FALL2024 or FA2024")]
    pub semester: SemesterId,
    #[command(flatten)]
    pub course: CourseCodeArgs,
}

/// Move a course to the end of another semester
#[derive(Args)]
pub struct MoveCourseArgs {
    #[command(flatten)]
    pub course: CourseCodeArgs,
    #[arg(help = "Destination semester id")]
    pub to: SemesterId,
}

#[derive(Subcommand)]
pub enum CourseCommands {
    #[command(alias = "a")]
    Add(AddCourseArgs),
    /// Remove a course from the plan
    #[command(aliases = ["d", "remove"])]
    Rm(CourseCodeArgs),
    #[command(alias = "move")]
    Mv(MoveCourseArgs),
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Load courses from a JSON catalog file
    Load {
        file: PathBuf,
    },
    /// Show one catalog entry
    #[command(alias = "s")]
    Show(CourseCodeArgs),
}

#[derive(Args)]
pub struct PrereqsArgs {
    #[command(flatten)]
    pub course: CourseCodeArgs,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,
    #[arg(short, long, help = "Write to this file instead of standard output")]
    pub output: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Keep stored courses and add the imported ones
    Merge,
    /// Empty conflicting semesters first
    Replace,
}

impl From<StrategyArg> for ImportStrategy {
    fn from(val: StrategyArg) -> Self {
        match val {
            StrategyArg::Merge => ImportStrategy::Merge,
            StrategyArg::Replace => ImportStrategy::Replace,
        }
    }
}

#[derive(Args)]
pub struct ImportArgs {
    pub file: PathBuf,
    #[arg(
        long,
        value_enum,
        help = "How to treat semesters that already hold courses; required when there are any"
    )]
    pub strategy: Option<StrategyArg>,
}

pub struct Cli {
    planner: Arc<Planner>,
    renderer: TerminalRenderer,
    user: String,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer, user: String) -> Self {
        Self {
            planner: Arc::new(planner),
            renderer,
            user,
        }
    }

    async fn user_id(&self) -> Result<u64> {
        let user = self
            .planner
            .get_or_create_user(&self.user)
            .await
            .with_context(|| format!("Failed to resolve user '{}'", self.user))?;
        Ok(user.id)
    }

    async fn open_session(&self) -> Result<PlanSession> {
        let user_id = self.user_id().await?;
        let board = self
            .planner
            .load_board(user_id)
            .await
            .context("Failed to load plan")?;
        Ok(PlanSession::start(
            user_id,
            board,
            self.planner.clone(),
            QueueConfig::default(),
        ))
    }

    /// Drains the session's queue and reports the command's outcome.
    async fn finish(&self, session: PlanSession, status: OperationStatus) -> Result<()> {
        let (_, queue) = session.close().await.context("Failed to save plan")?;
        log::debug!("Write queue finished: {queue}");
        if queue.stats.failed > 0 {
            bail!("{} change(s) could not be saved", queue.stats.failed);
        }
        self.renderer.render(&status.to_string())
    }

    pub async fn show_board(&self) -> Result<()> {
        let user_id = self.user_id().await?;
        let board = self
            .planner
            .load_board(user_id)
            .await
            .context("Failed to load plan")?;
        self.renderer.render(&board.to_string())
    }

    pub async fn handle_semester_command(&self, command: SemesterCommands) -> Result<()> {
        match command {
            SemesterCommands::Add(args) => {
                let semester = SemesterId::from(args);
                let mut session = self.open_session().await?;
                let op = session
                    .add_semester(semester)
                    .with_context(|| format!("Failed to add {}", semester.long_name()))?;
                let status = OperationStatus::success(format!("Added {}", semester.long_name()))
                    .with_operation(op);
                self.finish(session, status).await
            }
            SemesterCommands::Rm(args) => {
                let mut session = self.open_session().await?;
                let op = session
                    .delete_semester(args.id)
                    .with_context(|| format!("Failed to delete {}", args.id.long_name()))?;
                let status = OperationStatus::success(format!("Deleted {}", args.id.long_name()))
                    .with_operation(op);
                self.finish(session, status).await
            }
            SemesterCommands::List => {
                let user_id = self.user_id().await?;
                let plans = self
                    .planner
                    .list_semester_plans(user_id)
                    .await
                    .context("Failed to list semester plans")?;
                self.renderer.render(&SemesterPlans(plans).to_string())
            }
        }
    }

    pub async fn handle_course_command(&self, command: CourseCommands) -> Result<()> {
        match command {
            CourseCommands::Add(args) => {
                let CourseCodeArgs { subject, number } = args.course;
                let record = self
                    .planner
                    .course_by_code(&subject, &number)
                    .await
                    .context("Failed to query catalog")?
                    .ok_or_else(|| anyhow!("{} is not in the catalog", course_code(&subject, &number)))?;

                let mut session = self.open_session().await?;
                if let Some((semester, _)) = session.board().find_by_code(&subject, &number) {
                    bail!("{} is already planned for {}", record.code(), semester.long_name());
                }
                let (_, op) = session
                    .add_course(args.semester, &record)
                    .with_context(|| format!("Failed to add {}", record.code()))?;
                let status = OperationStatus::success(format!(
                    "Added {} to {}",
                    record.code(),
                    args.semester.long_name()
                ))
                .with_operation(op);
                self.finish(session, status).await
            }
            CourseCommands::Rm(CourseCodeArgs { subject, number }) => {
                let mut session = self.open_session().await?;
                let (semester, display_id) = match session.board().find_by_code(&subject, &number) {
                    Some((semester, card)) => (semester, card.id.clone()),
                    None => bail!("{} is not on the plan", course_code(&subject, &number)),
                };
                let op = session.remove_course(&display_id)?;
                let status = OperationStatus::success(format!(
                    "Removed {} from {}",
                    course_code(&subject, &number),
                    semester.long_name()
                ))
                .with_operation(op);
                self.finish(session, status).await
            }
            CourseCommands::Mv(args) => self.move_course(args).await,
        }
    }

    /// Turns the move into a drop on the destination semester, which
    /// appends the card there.
    async fn move_course(&self, args: MoveCourseArgs) -> Result<()> {
        let mut session = self.open_session().await?;
        let code = course_code(&args.course.subject, &args.course.number);
        let (semester, card) = session
            .board()
            .find_by_code(&args.course.subject, &args.course.number)
            .ok_or_else(|| anyhow!("{code} is not on the plan"))?;
        if semester == args.to {
            bail!("{code} is already in {}", semester.long_name());
        }

        let event = DropEvent {
            display_id: card.id.clone(),
            targets: vec![DropTarget::container(args.to)],
        };
        let op = session
            .drop_course(&event)
            .with_context(|| format!("Failed to move {code}"))?;
        let status = OperationStatus::success(format!("Moved {code} to {}", args.to.long_name()))
            .with_operation(op);
        self.finish(session, status).await
    }

    pub async fn handle_catalog_command(&self, command: CatalogCommands) -> Result<()> {
        match command {
            CatalogCommands::Load { file } => {
                let content = fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let courses = exchange::parse_catalog(&content)
                    .with_context(|| format!("Failed to parse {}", file.display()))?;
                let loaded = self
                    .planner
                    .load_catalog(courses)
                    .await
                    .context("Failed to load catalog")?;
                self.renderer.render(&format!("Loaded {} catalog course(s)", loaded.len()))
            }
            CatalogCommands::Show(CourseCodeArgs { subject, number }) => {
                let record = self
                    .planner
                    .course_by_code(&subject, &number)
                    .await
                    .context("Failed to query catalog")?
                    .ok_or_else(|| anyhow!("{} is not in the catalog", course_code(&subject, &number)))?;
                self.renderer.render(&CourseDetail(&record).to_string())
            }
        }
    }

    pub async fn show_prereqs(&self, args: PrereqsArgs) -> Result<()> {
        let user_id = self.user_id().await?;
        let board = self
            .planner
            .load_board(user_id)
            .await
            .context("Failed to load plan")?;
        let CourseCodeArgs { subject, number } = args.course;
        let (_, card) = board
            .find_by_code(&subject, &number)
            .ok_or_else(|| anyhow!("{} is not on the plan", course_code(&subject, &number)))?;

        let trees = self
            .planner
            .prerequisite_trees()
            .await
            .context("Failed to read prerequisites")?;
        let graph = RelationshipGraph::build(&board.visible_courses(), &trees);
        self.renderer.render(&graph.highlight(&card.code()).to_string())
    }

    pub async fn export(&self, args: ExportArgs) -> Result<()> {
        let user_id = self.user_id().await?;
        let board = self
            .planner
            .load_board(user_id)
            .await
            .context("Failed to load plan")?;
        let content = match args.format {
            ExportFormat::Json => exchange::export_json(&board).context("Failed to serialize plan")?,
            ExportFormat::Markdown => exchange::export_markdown(&board),
        };

        match args.output {
            Some(path) => {
                fs::write(&path, &content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                self.renderer.render(&format!("Exported plan to {}", path.display()))
            }
            None => {
                print!("{content}");
                Ok(())
            }
        }
    }

    pub async fn import(&self, args: ImportArgs) -> Result<()> {
        let content = fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?;
        let semesters = exchange::parse_json(&content)
            .with_context(|| format!("Failed to parse {}", args.file.display()))?;
        let user_id = self.user_id().await?;

        let conflicts = detect_conflicts(self.planner.as_ref(), user_id, &semesters)
            .await
            .context("Failed to check for conflicts")?;
        let strategy = match args.strategy {
            Some(strategy) => ImportStrategy::from(strategy),
            None if conflicts.is_empty() => ImportStrategy::default(),
            None => {
                self.renderer.render(&Conflicts(&conflicts).to_string())?;
                bail!(
                    "{} semester(s) already hold courses; nothing was imported",
                    conflicts.len()
                );
            }
        };

        let report = import_plan(self.planner.as_ref(), user_id, &semesters, strategy)
            .await
            .context("Import failed")?;
        self.renderer.render(&report.to_string())?;
        if !report.success() && !report.errors.is_empty() {
            bail!("No courses were imported");
        }
        Ok(())
    }
}
