use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use molt::api::Api;
use molt::config::{self, Config};
use molt::consts;
use molt::engine::{CodePolicy, EngineConfig, VerifyEngine};
use molt::solver::llm::LlmSolver;
use molt::tools::delete::DeleteTool;
use molt::tools::fetch::FetchTool;
use molt::tools::notifications::NotificationsTool;
use molt::tools::post::PostTool;
use molt::tools::settings::SettingsTool;
use molt::tools::subscribe::SubscribeTool;
use molt::tools::vote::VoteTool;
use molt::tools::{ToolOutcome, ToolRegistry};

#[derive(Parser)]
#[command(
    name = "molt",
    version,
    about = "Moltbook from the command line, verification challenges solved on the way."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database path for stored tokens (use :memory: for ephemeral)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Moltbook API base URL
    #[arg(long, default_value = consts::BASE_URL)]
    base_url: String,

    /// Treat an invalid or already-used verification code as fatal instead
    /// of re-submitting the mutation for a fresh one
    #[arg(long, default_value_t = false)]
    strict_codes: bool,

    /// Re-create the mutation after a wrong answer instead of retrying the
    /// same challenge
    #[arg(long, default_value_t = false)]
    resubmit_on_wrong_answer: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create a post (text or link)
    Post {
        /// Community to post in, e.g. 'general'
        #[arg(long)]
        submolt: String,
        #[arg(long)]
        title: String,
        /// Body content. Mutually exclusive with --link
        #[arg(long)]
        content: Option<String>,
        /// URL for a link post. Mutually exclusive with --content
        #[arg(long)]
        link: Option<String>,
    },
    /// Delete a post by ID
    Delete { post_id: String },
    /// Upvote or downvote a post or comment
    Vote {
        target: Target,
        id: String,
        direction: Direction,
    },
    /// Subscribe to or unsubscribe from a submolt
    Subscribe {
        submolt: String,
        /// Unsubscribe instead
        #[arg(long)]
        undo: bool,
    },
    /// Mark notifications as read
    Notifications {
        /// Only clear notifications for this post
        #[arg(long)]
        post_id: Option<String>,
    },
    /// Update settings for a submolt you moderate
    Settings {
        submolt: String,
        #[arg(long)]
        description: Option<String>,
        /// Hex colour for the banner background, e.g. '#1a1a2e'
        #[arg(long)]
        banner_color: Option<String>,
        /// Hex accent colour for the submolt UI, e.g. '#ff4500'
        #[arg(long)]
        theme_color: Option<String>,
    },
    /// Authenticated GET against the API
    Fetch { path: String },
    /// List the registered tools
    Tools,
    /// Get, set or remove stored configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Clone, ValueEnum)]
enum Target {
    Post,
    Comment,
}

#[derive(Debug, Clone, ValueEnum)]
enum Direction {
    Up,
    Down,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print a stored value
    Get { key: String },
    /// Store a value (keys: moltbook.token, solver.endpoint, solver.token)
    Set { key: String, value: String },
    /// Remove a stored value
    Unset { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let db_path = cli.db.clone().unwrap_or_else(consts::default_db_path);
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let config = Config::open(&db_path.to_string_lossy())?;

    // Config maintenance needs no tokens.
    if let Command::Config { action } = &cli.command {
        return handle_config(&config, action);
    }

    let needs_api = !matches!(cli.command, Command::Tools);
    let needs_solver = !matches!(cli.command, Command::Tools | Command::Fetch { .. });

    let service_token = if needs_api {
        config.require(config::SERVICE_TOKEN)?
    } else {
        config.get(config::SERVICE_TOKEN)?.unwrap_or_default()
    };
    let (solver_endpoint, solver_token) = if needs_solver {
        (
            config.require(config::SOLVER_ENDPOINT)?,
            config.require(config::SOLVER_TOKEN)?,
        )
    } else {
        (String::new(), String::new())
    };

    let api = Arc::new(Api::new(&cli.base_url, &service_token)?);
    let solver = Arc::new(LlmSolver::new(solver_endpoint, solver_token)?);
    let engine_config = EngineConfig {
        invalid_code_policy: if cli.strict_codes {
            CodePolicy::Fatal
        } else {
            CodePolicy::Resubmit
        },
        resubmit_on_wrong_answer: cli.resubmit_on_wrong_answer,
        ..EngineConfig::default()
    };
    let engine = Arc::new(VerifyEngine::new(Arc::clone(&api), solver, engine_config));

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(PostTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(DeleteTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(VoteTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(SubscribeTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(NotificationsTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(SettingsTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(FetchTool::new(Arc::clone(&api))));

    if matches!(cli.command, Command::Tools) {
        for tool in registry.descriptions() {
            println!("{}\n    {}\n", tool.name, tool.description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let (tool, args) = tool_invocation(cli.command);
    let result = registry.execute(tool, &args).await;
    match result.outcome {
        ToolOutcome::Success(msg) => {
            println!("✓ {msg}");
            Ok(ExitCode::SUCCESS)
        }
        ToolOutcome::Error(err) => {
            eprintln!("✗ {tool}: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn handle_config(config: &Config, action: &ConfigAction) -> anyhow::Result<ExitCode> {
    match action {
        ConfigAction::Get { key } => match config.get(key)? {
            Some(value) => println!("{value}"),
            None => {
                eprintln!("no value stored for '{key}'");
                return Ok(ExitCode::FAILURE);
            }
        },
        ConfigAction::Set { key, value } => {
            config.set(key, value)?;
            println!("✓ {key} saved");
        }
        ConfigAction::Unset { key } => {
            config.remove(key)?;
            println!("✓ {key} removed");
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Map a subcommand onto a registered tool and its argument map.
fn tool_invocation(command: Command) -> (&'static str, HashMap<String, String>) {
    let mut args = HashMap::new();
    match command {
        Command::Post {
            submolt,
            title,
            content,
            link,
        } => {
            args.insert("submolt".to_string(), submolt);
            args.insert("title".to_string(), title);
            if let Some(content) = content {
                args.insert("content".to_string(), content);
            }
            if let Some(link) = link {
                args.insert("link".to_string(), link);
            }
            ("post", args)
        }
        Command::Delete { post_id } => {
            args.insert("post_id".to_string(), post_id);
            ("delete", args)
        }
        Command::Vote {
            target,
            id,
            direction,
        } => {
            args.insert(
                "target".to_string(),
                match target {
                    Target::Post => "post",
                    Target::Comment => "comment",
                }
                .to_string(),
            );
            args.insert("id".to_string(), id);
            args.insert(
                "direction".to_string(),
                match direction {
                    Direction::Up => "up",
                    Direction::Down => "down",
                }
                .to_string(),
            );
            ("vote", args)
        }
        Command::Subscribe { submolt, undo } => {
            args.insert("submolt".to_string(), submolt);
            args.insert(
                "action".to_string(),
                if undo { "unsubscribe" } else { "subscribe" }.to_string(),
            );
            ("subscribe", args)
        }
        Command::Notifications { post_id } => {
            if let Some(post_id) = post_id {
                args.insert("post_id".to_string(), post_id);
            }
            ("notifications", args)
        }
        Command::Settings {
            submolt,
            description,
            banner_color,
            theme_color,
        } => {
            args.insert("submolt".to_string(), submolt);
            if let Some(description) = description {
                args.insert("description".to_string(), description);
            }
            if let Some(banner_color) = banner_color {
                args.insert("banner_color".to_string(), banner_color);
            }
            if let Some(theme_color) = theme_color {
                args.insert("theme_color".to_string(), theme_color);
            }
            ("settings", args)
        }
        Command::Fetch { path } => {
            args.insert("path".to_string(), path);
            ("fetch", args)
        }
        Command::Tools | Command::Config { .. } => unreachable!("handled before dispatch"),
    }
}
