use board_cli::cli::{Cli, Command, collect_overrides};
use board_cli::render;
use board_core::board::Board;
use board_core::board_api;
use board_core::config::{Config, ConfigOverrides, merge_overrides, palette_for_theme};
use board_core::drag::{BoardLayout, DragKey, DropTarget};
use board_core::error::AppError;
use board_core::model::{Task, TaskStatus};
use board_core::storage::FileStorage;
use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "KANBAN_LOG";

struct Session {
    config: Config,
    board: Board<FileStorage>,
}

impl Session {
    fn open(overrides: &ConfigOverrides) -> Result<Self, AppError> {
        let loaded = board_api::resolve_config(overrides);
        if let Some(err) = loaded.error {
            tracing::warn!(error = %err, "using default configuration");
        }
        let board = board_api::open_board(&loaded.config)?;
        Ok(Self {
            config: loaded.config,
            board,
        })
    }

    fn task(&self, id: &str) -> Result<&Task, AppError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("id is required"));
        }
        self.board
            .task(trimmed)
            .ok_or_else(|| AppError::invalid_input("task not found"))
    }
}

fn print_task_json(task: &Task) {
    println!("{}", render::task_json(task));
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn print_banner(session: &Session) {
    if let Some(banner) = session.board.visible_banner() {
        eprintln!("! {}", banner.message);
    }
}

async fn run_command(session: &mut Session, cli: Cli) -> Result<(), AppError> {
    let overrides = collect_overrides(&cli.config_override).map_err(AppError::invalid_input)?;
    let config = merge_overrides(&session.config, &overrides);
    let palette = palette_for_theme(config.theme.as_deref());

    match cli.command {
        Command::Board => {
            let banner = session.board.visible_banner().map(|b| b.message.clone());
            if cli.json {
                println!(
                    "{}",
                    render::board_json(session.board.state(), banner.as_deref())
                );
            } else {
                print_banner(session);
                println!("{}", render::board_table(session.board.state(), &palette));
            }
        }
        Command::Add { title, description } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value.trim().to_string(),
                _ => return Err(AppError::invalid_input("title is required")),
            };

            let task = session.board.add_task(&title, description.as_deref());
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
        Command::Show { id } => {
            let task = session.task(&id)?;
            if cli.json {
                print_task_json(task);
            } else {
                println!("{}", render::task_detail(task, &palette));
            }
        }
        Command::Delete { id } => {
            let task = session.task(&id)?.clone();
            session.board.delete_task(&task.id);
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Deleted task: {} ({})", task.title, task.id);
            }
        }
        Command::Toggle { task_id, step_id } => {
            let task_id = session.task(&task_id)?.id.clone();
            let step_id = step_id.trim();
            if !session.task(&task_id)?.substeps.iter().any(|s| s.id == step_id) {
                return Err(AppError::invalid_input("sub-step not found"));
            }

            session.board.toggle_substep(&task_id, step_id);
            let task = session.task(&task_id)?;
            if cli.json {
                print_task_json(task);
            } else if let Some(step) = task.substeps.iter().find(|s| s.id == step_id) {
                let mark = if step.completed { "[x]" } else { "[ ]" };
                println!("Toggled sub-step: {} {} ({})", mark, step.text, step.id);
            }
        }
        Command::Status { id, status } => {
            let status: TaskStatus = status.parse()?;
            let id = session.task(&id)?.id.clone();
            session.board.set_task_status(&id, status);
            report_moved(session.task(&id)?, cli.json);
        }
        Command::Move { id, before } => {
            let id = session.task(&id)?.id.clone();
            let before = match before {
                Some(before) => Some(session.task(&before)?.id.clone()),
                None => None,
            };
            session.board.move_task(&id, before.as_deref());
            report_moved(session.task(&id)?, cli.json);
        }
        Command::Drag {
            id,
            onto_task,
            onto_column,
        } => {
            let id = session.task(&id)?.id.clone();
            let target = match (onto_task, onto_column) {
                (Some(task_id), _) => DropTarget::Task(session.task(&task_id)?.id.clone()),
                (None, Some(column)) => DropTarget::Column(column.parse()?),
                (None, None) => return Err(AppError::invalid_input("drop target is required")),
            };

            let layout = BoardLayout::of(session.board.tasks());
            let (Some(from), Some(onto)) = (
                layout.rect_of(&DropTarget::Task(id.clone())),
                layout.rect_of(&target),
            ) else {
                return Err(AppError::invalid_input("drop target is not on the board"));
            };

            session.board.drag_start(&id, from.center(), from);
            session
                .board
                .drag_pointer_move(onto.center(), layout.into_droppables());
            session.board.drag_end();
            report_moved(session.task(&id)?, cli.json);
        }
        Command::Keys { id, keys } => {
            let keys = keys
                .iter()
                .map(|key| key.parse::<DragKey>())
                .collect::<Result<Vec<_>, _>>()?;
            let id = session.task(&id)?.id.clone();

            session.board.drag_press(&id, DragKey::Pickup);
            for key in keys {
                session.board.drag_press(&id, key);
            }
            session.board.drag_key(DragKey::Drop);
            report_moved(session.task(&id)?, cli.json);
        }
        Command::Breakdown { id, offline } => {
            let id = session.task(&id)?.id.clone();
            let generator = board_api::generator_for(&config, offline);

            let result = session.board.breakdown(&id, generator.as_ref()).await;
            let steps = match result {
                Ok(steps) => steps,
                Err(err) => {
                    print_banner(session);
                    return Err(err);
                }
            };

            let task = session.task(&id)?;
            if cli.json {
                print_task_json(task);
            } else if steps.is_empty() {
                println!("No sub-steps generated for: {} ({})", task.title, task.id);
            } else {
                println!(
                    "Added {} sub-steps to: {} ({})",
                    steps.len(),
                    task.title,
                    task.id
                );
                for step in &steps {
                    println!("  [ ] {} ({})", step.text, step.id);
                }
            }
        }
    }

    Ok(())
}

fn report_moved(task: &Task, json: bool) {
    if json {
        print_task_json(task);
    } else {
        println!(
            "Moved task: {} ({}) [{}]",
            task.title,
            task.id,
            task.status.as_str()
        );
    }
}

async fn run_interactive() -> Result<(), AppError> {
    let mut session = Session::open(&ConfigOverrides::default())?;
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("kanban".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(&mut session, cli).await {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

async fn run_once(cli: Cli) -> Result<(), AppError> {
    let overrides = collect_overrides(&cli.config_override).map_err(AppError::invalid_input)?;
    let mut session = Session::open(&overrides)?;
    run_command(&mut session, cli).await
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive().await {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                let _ = err.print();
                return;
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_once(cli).await {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
