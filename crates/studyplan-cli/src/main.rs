use clap::{Parser, Subcommand};
use studyplan_core::TaskDraft;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyplan", version, about = "Pomodoro study planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print tasks in study order
    Sort {
        /// Task as name:priority:difficulty:units (trailing fields optional)
        #[arg(short, long = "task", value_parser = commands::task_arg::parse_task_arg, required = true)]
        tasks: Vec<TaskDraft>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Turn a free-text description into tasks
    Extract {
        /// Description to analyze (read from stdin if omitted)
        text: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run an interactive study session
    Run {
        /// Task as name:priority:difficulty:units (trailing fields optional)
        #[arg(short, long = "task", value_parser = commands::task_arg::parse_task_arg)]
        tasks: Vec<TaskDraft>,
        /// Also import tasks extracted from this description
        #[arg(long)]
        extract: Option<String>,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Sort { tasks, json } => commands::sort::run(tasks, json),
        Commands::Extract { text, json } => commands::extract::run(text, json).await,
        Commands::Run {
            tasks,
            extract,
            json,
        } => commands::run::run(tasks, extract, json).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
