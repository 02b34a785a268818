use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use taskrank_core::{
    FileSettingsStore, ModelScorer, PriorityEngine, Strategy, StrategyStore, Task,
    completion_rate,
};

mod tasks;

use tasks::load_tasks;

#[derive(Parser, Debug)]
#[command(name = "taskrank", version, about = "Task priority scoring and ranking")]
struct Cli {
    /// Path to the serialized priority model (overrides TASKRANK_MODEL)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank a task file by score (incomplete first, score desc, title asc)
    Rank {
        /// JSON array of tasks
        #[arg(long, default_value = "tasks.json")]
        file: PathBuf,

        /// Recompute every score instead of reusing cached values
        #[arg(long)]
        fresh: bool,

        /// Limit number of tasks printed
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print each task's score and which scorer produced it
    Score {
        #[arg(long, default_value = "tasks.json")]
        file: PathBuf,
    },

    /// Recompute all scores, then print the new order
    Prioritize {
        #[arg(long, default_value = "tasks.json")]
        file: PathBuf,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Strategy settings
    Strategy {
        #[command(subcommand)]
        command: StrategyCommand,
    },

    /// Suggest a priority from task text
    SuggestPriority {
        title: String,
        note: Option<String>,
    },

    /// Score the task list under every strategy (debug tooling)
    Compare {
        #[arg(long, default_value = "tasks.json")]
        file: PathBuf,

        /// Tasks shown per strategy
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

#[derive(Subcommand, Debug)]
enum StrategyCommand {
    /// Show the active strategy and auto-sort flag
    Get,

    /// Set and persist the strategy (quick-wins | balanced | eat-the-frog)
    Set { strategy: Strategy },

    /// Suggest a strategy from completion history in a task file
    Suggest {
        #[arg(long, default_value = "tasks.json")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut engine = build_engine(cli.model)?;
    let now = Utc::now();

    match cli.command {
        Command::Rank { file, fresh, limit } => {
            let tasks = load_tasks(&file)?;
            let ranked = engine.rank(&tasks, now, !fresh);
            print_ranked(&engine, &ranked, limit, now);
        }

        Command::Score { file } => {
            let tasks = load_tasks(&file)?;
            let scorer = if engine.model_available() { "model" } else { "fallback" };
            for t in &tasks {
                println!("{:6.1} [{}] {}", engine.calculate_score(t, now), scorer, t.title);
            }
        }

        Command::Prioritize { file, limit } => {
            let tasks = load_tasks(&file)?;
            let ranked = engine.prioritize(&tasks, now);
            println!(
                "Prioritized {} tasks under {} ({:.0}% complete)\n",
                ranked.len(),
                engine.strategy(),
                completion_rate(&ranked) * 100.0
            );
            print_ranked(&engine, &ranked, limit, now);
        }

        Command::Strategy { command } => match command {
            StrategyCommand::Get => {
                let strategy = engine.strategy();
                println!("{} — {}", strategy, strategy.description());
                println!("auto-sort: {}", if engine.auto_sort_enabled() { "on" } else { "off" });
            }
            StrategyCommand::Set { strategy } => {
                engine.set_strategy(strategy)?;
                println!("Strategy set to {}", strategy);
            }
            StrategyCommand::Suggest { file } => {
                let tasks = load_tasks(&file)?;
                let suggestion = engine.suggest_strategy(&tasks);
                println!("{} — {}", suggestion, suggestion.description());
            }
        },

        Command::SuggestPriority { title, note } => {
            let priority = engine.suggest_priority(&title, note.as_deref());
            println!("{}", priority.label());
        }

        Command::Compare { file, top } => {
            let tasks = load_tasks(&file)?;
            let by_title: std::collections::HashMap<&str, &str> =
                tasks.iter().map(|t| (t.id.as_str(), t.title.as_str())).collect();

            for (strategy, scored) in engine.compare_strategies(&tasks, now) {
                println!("{}", strategy.title().to_uppercase());
                for (id, score) in scored.iter().take(top) {
                    println!("  {:6.1}  {}", score, by_title.get(id.as_str()).unwrap_or(&""));
                }
                println!();
            }
        }
    }

    Ok(())
}

fn build_engine(model_flag: Option<PathBuf>) -> Result<PriorityEngine> {
    let settings_path = FileSettingsStore::default_path()?;
    let store = StrategyStore::open(Box::new(FileSettingsStore::new(settings_path)))
        .context("load strategy settings")?;

    let model_path = model_flag
        .or_else(|| std::env::var_os("TASKRANK_MODEL").map(PathBuf::from))
        .unwrap_or(default_model_path()?);
    let scorer = ModelScorer::load(&model_path);

    Ok(PriorityEngine::new(scorer, store))
}

fn default_model_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".taskrank").join("priority_model.json"))
}

fn print_ranked(
    engine: &PriorityEngine,
    ranked: &[Task],
    limit: Option<usize>,
    now: chrono::DateTime<Utc>,
) {
    let shown = limit.unwrap_or(ranked.len());
    for (i, t) in ranked.iter().take(shown).enumerate() {
        let score = engine
            .cache()
            .get(&t.id)
            .unwrap_or_else(|| engine.calculate_score(t, now));
        let mark = if t.is_completed { "x" } else { " " };
        println!("{:3}. [{}] {:6.1}  {}", i + 1, mark, score, t.title);
    }
}
