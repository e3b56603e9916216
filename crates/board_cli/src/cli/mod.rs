use board_core::config::{ConfigOverrides, canonical_key};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Three-column task board", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the board
    ///
    /// Example: kanban board
    Board,
    /// Add a new task to To Do
    ///
    /// Example: kanban add "Write release notes" -d "for 1.2"
    Add {
        title: Option<String>,
        #[arg(short = 'd', long = "description", value_name = "TEXT")]
        description: Option<String>,
    },
    /// Show details of a task
    ///
    /// Example: kanban show t1
    Show { id: String },
    /// Delete a task
    ///
    /// Example: kanban delete t1
    Delete { id: String },
    /// Check or uncheck a sub-step
    ///
    /// Example: kanban toggle t2 s2
    Toggle { task_id: String, step_id: String },
    /// Change a task's status without moving it
    ///
    /// Example: kanban status t1 in-progress
    Status { id: String, status: String },
    /// Move a task before another one, or to the end
    ///
    /// Example: kanban move t2 --before t1
    Move {
        id: String,
        #[arg(long, value_name = "ID")]
        before: Option<String>,
    },
    /// Drag a task onto another task or a column
    ///
    /// Example: kanban drag t1 --onto-task t2
    /// Example: kanban drag t1 --onto-column done
    Drag {
        id: String,
        #[arg(
            long,
            value_name = "ID",
            conflicts_with = "onto_column",
            required_unless_present = "onto_column"
        )]
        onto_task: Option<String>,
        #[arg(long, value_name = "STATUS")]
        onto_column: Option<String>,
    },
    /// Pick up a task and move it with arrow keys; space or enter drops it
    ///
    /// Example: kanban keys t1 down right
    Keys {
        id: String,
        #[arg(required = true, value_name = "KEY")]
        keys: Vec<String>,
    },
    /// Ask the AI for sub-steps and append them
    ///
    /// Example: kanban breakdown t1
    Breakdown {
        id: String,
        /// Skip the network and use the fallback steps
        #[arg(long)]
        offline: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    ApiKey,
    Model,
    Endpoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field = canonical_key(key_raw);
    if field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let target = match field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "api_key" | "apikey" => ConfigOverrideTarget::ApiKey,
        "model" => ConfigOverrideTarget::Model,
        "endpoint" => ConfigOverrideTarget::Endpoint,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        let slot = match parsed.target {
            ConfigOverrideTarget::Theme => &mut overrides.theme,
            ConfigOverrideTarget::ApiKey => &mut overrides.api_key,
            ConfigOverrideTarget::Model => &mut overrides.model,
            ConfigOverrideTarget::Endpoint => &mut overrides.endpoint,
        };
        *slot = Some(parsed.value);
    }
    Ok(overrides)
}
