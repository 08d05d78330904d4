//! Taskboard - a kanban board over markdown checklists
//!
//! Reads checklist lines from a vault of markdown notes, shows them as a
//! board, and writes moves and edits back into the notes.

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use taskboard::board::{
    group_by_swimlane, lanes_for, limit_completed, resolve_linked_note, status_for_column,
    BoardState, Column, SwimlaneAssignment,
};
use taskboard::config::{
    BoardConfig, ConfigLocations, ConfigValidator, Settings, SettingsManager,
};
use taskboard::store::VaultStore;
use taskboard::task::{parse_date, DateField, Priority, StatusCode, Task, TaskId};
use taskboard::{BoardError, Result};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(version)]
#[command(about = "Kanban board for markdown checklist tasks", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Vault directory (defaults to current directory)
    #[arg(long, global = true, default_value = ".", env = "TASKBOARD_VAULT")]
    vault: PathBuf,

    /// Board id (defaults to the first configured board)
    #[arg(short, long, global = true)]
    board: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the board: columns, swimlanes and cards
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the board's tasks, one per line
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Only tasks in this column
        #[arg(long)]
        column: Option<String>,

        /// Only tasks carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },

    /// Move a task to another column
    Move {
        /// Task id, as `document:line`
        id: String,

        /// Target column name, e.g. "In Progress"
        column: String,

        /// Swimlane to show the task in (not saved to the note)
        #[arg(long)]
        swimlane: Option<String>,
    },

    /// Edit a task's fields; an empty value clears the field
    Edit {
        /// Task id, as `document:line`
        id: String,

        /// Task description, without markers
        #[arg(long)]
        text: Option<String>,

        /// Status character or column name
        #[arg(long)]
        status: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Scheduled date (YYYY-MM-DD)
        #[arg(long)]
        scheduled: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Priority: high, medium or low
        #[arg(long)]
        priority: Option<String>,

        /// Comma-separated tags, without '#'
        #[arg(long)]
        tags: Option<String>,

        /// Comma-separated linked note names
        #[arg(long)]
        links: Option<String>,
    },

    /// Find the note a [[link]] points at
    Link {
        /// Note name as written inside the brackets
        name: String,
    },

    /// Manage boards
    Boards {
        #[command(subcommand)]
        action: BoardsAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum BoardsAction {
    /// List configured boards
    List,

    /// Add a board with the standard columns
    Add {
        /// Board name
        name: String,

        /// Board id (generated if omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Remove a board
    Remove {
        /// Board id
        id: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the settings file
    Validate,

    /// Show configuration file paths
    Paths,
}

/// JSON shape of `show --json`.
#[derive(Serialize)]
struct BoardView<'a> {
    id: &'a str,
    name: &'a str,
    lanes: Vec<LaneView<'a>>,
}

#[derive(Serialize)]
struct LaneView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    swimlane: Option<SwimlaneAssignment>,
    columns: Vec<ColumnView<'a>>,
}

#[derive(Serialize)]
struct ColumnView<'a> {
    name: &'a Column,
    tasks: Vec<&'a Task>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "taskboard=debug,info"
    } else {
        "taskboard=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        let code = e
            .downcast_ref::<BoardError>()
            .map_or(1, BoardError::exit_code);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let vault = cli.vault.canonicalize().unwrap_or_else(|_| cli.vault.clone());
    if !vault.is_dir() {
        return Err(
            BoardError::config_with_path("Vault directory does not exist", vault).into(),
        );
    }
    let locations = ConfigLocations::new(&vault);
    let board_id = cli.board.as_deref();

    match cli.command {
        Commands::Show { json } => {
            let state = open_board(&vault, &locations, board_id).await?;
            let board = state.board();
            let tasks = limit_completed(state.tasks().to_vec(), board.max_completed_items);

            if json {
                println!("{}", serde_json::to_string_pretty(&board_view(board, &tasks))?);
            } else {
                print_board(board, &tasks);
            }
        }

        Commands::List { json, column, tag } => {
            let state = open_board(&vault, &locations, board_id).await?;
            let column = column.map(|c| Column::from_name(&c));
            let tag = tag.map(|t| t.trim_start_matches('#').to_string());
            let tasks: Vec<&Task> = state
                .tasks()
                .iter()
                .filter(|t| column.as_ref().is_none_or(|c| t.column == *c))
                .filter(|t| tag.as_ref().is_none_or(|g| t.tags.contains(g)))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("{} No tasks", "Note:".yellow());
            } else {
                for task in tasks {
                    println!(
                        "{}  [{}] {}  {}",
                        task.id.to_string().dimmed(),
                        task.status,
                        task.clean_text,
                        format!("({})", task.column).cyan()
                    );
                }
            }
        }

        Commands::Move {
            id,
            column,
            swimlane,
        } => {
            let id = TaskId::parse(&id)?;
            let column = Column::from_name(&column);
            let mut state = open_board(&vault, &locations, board_id).await?;

            if !state.board().columns.contains(&column) {
                println!(
                    "{} Column '{}' is not on board '{}'",
                    "Warning:".yellow(),
                    column,
                    state.board().name
                );
            }

            let swimlane = swimlane.map(SwimlaneAssignment::from);
            let moved = state.move_task(&id, column, swimlane).await?;
            match &moved.swimlane {
                Some(lane) if state.board().swimlanes_enabled => println!(
                    "{} Moved {} to {} in {}",
                    "OK".green().bold(),
                    id,
                    moved.column,
                    lane
                ),
                _ => println!("{} Moved {} to {}", "OK".green().bold(), id, moved.column),
            }
        }

        Commands::Edit {
            id,
            text,
            status,
            start,
            scheduled,
            due,
            priority,
            tags,
            links,
        } => {
            let id = TaskId::parse(&id)?;
            let mut state = open_board(&vault, &locations, board_id).await?;
            let mut edited = state
                .task(&id)
                .cloned()
                .ok_or_else(|| BoardError::task_not_found(id.to_string()))?;

            if let Some(text) = text {
                edited.clean_text = text.trim().to_string();
            }
            if let Some(status) = status {
                edited.set_status(parse_status(&status)?);
            }
            for (field, value) in [
                (DateField::Start, start),
                (DateField::Scheduled, scheduled),
                (DateField::Due, due),
            ] {
                if let Some(value) = value {
                    edited.set_date(field, parse_optional_date(field, &value)?);
                }
            }
            if let Some(priority) = priority {
                edited.priority = if priority.trim().is_empty() {
                    None
                } else {
                    Some(priority.parse::<Priority>()?)
                };
            }
            if let Some(tags) = tags {
                edited.tags = split_list(&tags)
                    .into_iter()
                    .map(|t| t.trim_start_matches('#').to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
            }
            if let Some(links) = links {
                edited.linked_notes = split_list(&links);
            }

            let updated = state.update_task(edited).await?;
            println!("{} Updated {}", "OK".green().bold(), id);
            println!("   {}", updated.text);
        }

        Commands::Link { name } => {
            let settings = Settings::load_from(&locations)?;
            let store = VaultStore::new(&vault).with_excludes(&settings.exclude)?;
            match resolve_linked_note(&store, &name).await? {
                Some(handle) => println!("{}", vault.join(&handle.path).display()),
                None => {
                    return Err(BoardError::DocumentNotFound {
                        path: format!("{}.md", name),
                    }
                    .into())
                }
            }
        }

        Commands::Boards { action } => match action {
            BoardsAction::List => {
                let settings = Settings::load_from(&locations)?;
                let default_id = settings.default_board().id.clone();
                println!("\n{} Boards", "Config:".cyan().bold());
                println!("{}", "─".repeat(40));
                for board in &settings.boards {
                    let marker = if board.id == default_id {
                        " (default)".green().to_string()
                    } else {
                        String::new()
                    };
                    println!(
                        "   {}  {}{}  [{} columns]",
                        board.id.dimmed(),
                        board.name,
                        marker,
                        board.columns.len()
                    );
                }
            }

            BoardsAction::Add { name, id } => {
                let mut manager = SettingsManager::load(&locations)?;
                let mut board = BoardConfig::new(name);
                board.id = id.unwrap_or_default();
                let id = manager.add_board(board)?;
                println!("{} Added board {}", "OK".green().bold(), id);
            }

            BoardsAction::Remove { id } => {
                let mut manager = SettingsManager::load(&locations)?;
                let removed = manager.delete_board(&id)?;
                println!(
                    "{} Removed board {} ({})",
                    "OK".green().bold(),
                    removed.id,
                    removed.name
                );
            }
        },

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                let settings = Settings::load_from(&locations)?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&settings)?);
                } else {
                    println!("\n{} Settings", "Config:".cyan().bold());
                    println!("{}", "─".repeat(40));
                    println!("   Boards: {}", settings.boards.len());
                    println!("   Default board: {}", settings.default_board().name);
                    println!("   Exclude patterns: {}", settings.exclude.len());
                    for board in &settings.boards {
                        println!("\n   {} ({})", board.name.bold(), board.id);
                        println!("     Columns: {}", join_columns(&board.columns));
                        if !board.tag_filters.is_empty() {
                            println!("     Tag filters: {}", board.tag_filters.join(", "));
                        }
                        println!(
                            "     Swimlanes: {} ({})",
                            board.swimlanes.len(),
                            if board.swimlanes_enabled { "enabled" } else { "disabled" }
                        );
                        println!("     Sort by due date: {}", board.sort_by_due_date);
                        if !board.column_sort_order.is_empty() {
                            println!(
                                "     Column order: {}",
                                join_columns(&board.column_sort_order)
                            );
                        }
                        println!("     Max completed items: {}", board.max_completed_items);
                    }
                }
            }

            ConfigAction::Validate => {
                let report = ConfigValidator::new(locations).validate();
                if cli.verbose {
                    println!("{}", report.verbose_report());
                } else {
                    for error in &report.errors {
                        eprintln!("{} {}", "Error:".red(), error);
                    }
                    for warning in &report.warnings {
                        println!("{} {}", "Warning:".yellow(), warning);
                    }
                    if report.is_valid() {
                        println!("{} {}", "OK".green(), report.summary());
                    }
                }
                if !report.is_valid() {
                    std::process::exit(report.exit_code());
                }
            }

            ConfigAction::Paths => {
                let active = locations.active_path().map(Path::to_path_buf);
                let mark = |path: &Path| {
                    if active.as_deref() == Some(path) {
                        " (active)".green().to_string()
                    } else if path.exists() {
                        String::new()
                    } else {
                        " (not found)".dimmed().to_string()
                    }
                };

                println!("\n{} Configuration Paths", "Config:".cyan().bold());
                println!("{}", "─".repeat(40));
                let project = locations.project_path();
                println!("   Vault settings: {}{}", project.display(), mark(project));
                match locations.user_path() {
                    Some(user) => println!("   User settings: {}{}", user.display(), mark(user)),
                    None => println!("   User settings: {}", "(no config directory)".dimmed()),
                }
            }
        },
    }

    Ok(())
}

/// Load settings, pick the board and read every task.
async fn open_board(
    vault: &Path,
    locations: &ConfigLocations,
    board_id: Option<&str>,
) -> Result<BoardState<VaultStore>> {
    let settings = Settings::load_from(locations)?;
    let board = settings.resolve_board(board_id)?.clone();
    let store = VaultStore::new(vault).with_excludes(&settings.exclude)?;
    let mut state = BoardState::new(store, board);
    state.refresh().await?;
    Ok(state)
}

/// A status character, or a column name standing for its status.
fn parse_status(value: &str) -> Result<StatusCode> {
    match Column::BUILTIN
        .iter()
        .find(|c| c.name().eq_ignore_ascii_case(value.trim()))
    {
        Some(column) => Ok(status_for_column(column)),
        None => StatusCode::parse(value),
    }
}

fn parse_optional_date(field: DateField, value: &str) -> Result<Option<chrono::NaiveDate>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(field, value).map(Some)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn join_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(Column::name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn board_view<'a>(board: &'a BoardConfig, tasks: &'a [Task]) -> BoardView<'a> {
    let columns_for = |members: &[&'a Task]| -> Vec<ColumnView<'a>> {
        board
            .columns
            .iter()
            .map(|column| ColumnView {
                name: column,
                tasks: members.iter().copied().filter(|t| t.column == *column).collect(),
            })
            .collect()
    };

    let lanes = if board.swimlanes_enabled {
        let groups = group_by_swimlane(tasks);
        lanes_for(&board.swimlanes)
            .into_iter()
            .map(|lane| {
                let members = groups
                    .iter()
                    .find(|(l, _)| *l == lane)
                    .map(|(_, m)| m.clone())
                    .unwrap_or_default();
                LaneView {
                    columns: columns_for(&members),
                    swimlane: Some(lane),
                }
            })
            .collect()
    } else {
        let members: Vec<&Task> = tasks.iter().collect();
        vec![LaneView {
            swimlane: None,
            columns: columns_for(&members),
        }]
    };

    BoardView {
        id: &board.id,
        name: &board.name,
        lanes,
    }
}

fn print_board(board: &BoardConfig, tasks: &[Task]) {
    println!("\n{} {}", "Board:".cyan().bold(), board.name);
    println!("{}", "─".repeat(40));

    for lane in board_view(board, tasks).lanes {
        if let Some(swimlane) = &lane.swimlane {
            println!("\n{} {}", "Swimlane:".magenta().bold(), swimlane);
        }
        for column in lane.columns {
            println!("\n  {} ({})", column.name.to_string().bold(), column.tasks.len());
            if column.tasks.is_empty() {
                println!("    {}", "(empty)".dimmed());
            }
            for task in column.tasks {
                print_card(task);
            }
        }
    }
}

fn print_card(task: &Task) {
    let priority = task
        .priority
        .map(|p| format!("{} ", p.symbol()))
        .unwrap_or_default();
    println!(
        "    • {}{}  {}",
        priority,
        task.clean_text,
        task.id.to_string().dimmed()
    );
    println!("      📄 {}", task.source_note);
    for field in [DateField::Start, DateField::Scheduled, DateField::Due] {
        if let Some(date) = task.date(field) {
            println!("      {} {}", field.symbol(), date);
        }
    }
    for note in &task.linked_notes {
        println!("      🔗 {}", note);
    }
    if !task.tags.is_empty() {
        let tags: Vec<String> = task.tags.iter().map(|t| format!("#{}", t)).collect();
        println!("      {}", tags.join(" ").blue());
    }
}
