use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use adweave_core::config::AppConfig;
use adweave_core::traits::{ArtifactRepository, ProviderInvoker, RunRepository, TaskRepository};
use adweave_core::types::{ContentType, TaskId, TaskRecord};

use adweave_agents::{AgentRegistry, ReviewBroker, ReviewDecision};
use adweave_executor::{ExecutorEnv, GenerativePlanner, TaskExecutor};
use adweave_providers::ProviderRouter;
use adweave_store::{FsArtifactStore, SqliteStore};

#[derive(Parser)]
#[command(name = "adweave", version, about = "Automated multi-format marketing content pipelines")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "adweave.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config file
    Init,
    /// Plan a new campaign task and persist it
    Create {
        /// Campaign topic
        #[arg(long)]
        topic: String,
        /// Comma-separated content types (text,image,video)
        #[arg(long, default_value = "text")]
        types: String,
        /// Skip the generative planner and use the static template
        #[arg(long)]
        template: bool,
    },
    /// Execute a persisted task
    Run {
        task_id: String,
        /// Resolve escalations automatically with the last partial output
        #[arg(long)]
        auto_approve: bool,
    },
    /// Show a task with its runs and artifacts
    Status { task_id: String },
    /// List all tasks
    Tasks,
    /// Show configured providers and the active mode
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => init_config(&cli.config),
        Commands::Create {
            topic,
            types,
            template,
        } => create_task(&cli.config, &topic, &types, template).await,
        Commands::Run {
            task_id,
            auto_approve,
        } => run_task(&cli.config, &task_id, auto_approve).await,
        Commands::Status { task_id } => show_status(&cli.config, &task_id).await,
        Commands::Tasks => list_tasks(&cli.config).await,
        Commands::Providers => show_providers(&cli.config),
    }
}

const STARTER_CONFIG: &str = r#"workspace = "~/.adweave"
locale = "en-US"

[executor]
max_attempts = 3
review_timeout_secs = 300

# Providers are tried in priority order (lower first). Without any
# credentialed provider the whole pipeline runs in mock mode.
[[providers]]
id = "openai"
name = "OpenAI"
priority = 10
api_key = "${OPENAI_API_KEY}"
model = "gpt-4o-mini"

[[providers]]
id = "local-mock"
name = "Local mock"
priority = 100
mock = true
"#;

fn init_config(path: &PathBuf) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("config already exists: {}", path.display());
    }
    std::fs::write(path, STARTER_CONFIG)?;
    println!("Wrote {}", path.display());
    Ok(())
}

struct App {
    config: AppConfig,
    store: Arc<SqliteStore>,
    router: Arc<ProviderRouter>,
}

fn open_app(config_path: &PathBuf) -> anyhow::Result<App> {
    let config = AppConfig::load(config_path)?;
    let store = Arc::new(SqliteStore::open(&config.database_path())?);
    let router = Arc::new(ProviderRouter::new(config.providers.clone()));
    Ok(App {
        config,
        store,
        router,
    })
}

fn parse_types(spec: &str) -> anyhow::Result<Vec<ContentType>> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            ContentType::parse(s).ok_or_else(|| anyhow::anyhow!("unknown content type: '{s}'"))
        })
        .collect()
}

async fn create_task(
    config_path: &PathBuf,
    topic: &str,
    types: &str,
    use_template: bool,
) -> anyhow::Result<()> {
    let app = open_app(config_path)?;
    let content_types = parse_types(types)?;

    let plan = if use_template {
        adweave_executor::template::build_plan(topic, &content_types)
    } else {
        GenerativePlanner::new(app.router.clone())
            .plan(topic, &content_types)
            .await
    };
    plan.validate()?;

    let task = TaskRecord::new(plan);
    TaskRepository::create(app.store.as_ref(), &task).await?;

    println!("Created task {}", task.id);
    for node in &task.plan.nodes {
        println!(
            "  {} -> {} (after: {})",
            node.id,
            node.agent,
            node.depends_on.join(", ")
        );
    }
    Ok(())
}

async fn run_task(config_path: &PathBuf, task_id: &str, auto_approve: bool) -> anyhow::Result<()> {
    let app = open_app(config_path)?;
    let mut executor_config = app.config.executor.clone();
    if auto_approve {
        executor_config.auto_approve = true;
    }

    let review = Arc::new(ReviewBroker::new());
    let registry = Arc::new(AgentRegistry::with_builtins(review.clone(), &executor_config));
    let storage = Arc::new(FsArtifactStore::new(
        app.config.workspace_dir().join("artifacts"),
        app.store.clone(),
    ));

    if !executor_config.auto_approve {
        spawn_review_prompt(review.clone());
    }

    let executor = TaskExecutor::new(
        ExecutorEnv {
            registry,
            tasks: app.store.clone(),
            runs: app.store.clone(),
            logs: app.store.clone(),
            providers: app.router.clone(),
            storage,
        },
        &executor_config,
        app.config.locale.clone(),
    );

    info!(mode = %app.router.mode(), "Executing task");
    let task = executor.execute_task(&TaskId::from_string(task_id)).await?;

    println!("Task {} finished: {}", task.id, task.status);
    if let Some(error) = &task.error {
        println!("  error: {error}");
    }
    print_runs(&app, &task.id).await?;
    Ok(())
}

/// Watch for pending escalations and resolve them on stdin.
///
/// Works like an operator console: each request is printed once, then a
/// single line answers it — `approve {...json...}`, bare `approve` to reuse
/// the partial output, or `deny <reason>`.
fn spawn_review_prompt(broker: Arc<ReviewBroker>) {
    tokio::spawn(async move {
        let mut seen: HashSet<String> = HashSet::new();
        loop {
            for req in broker.pending_requests().await {
                if !seen.insert(req.id.clone()) {
                    continue;
                }
                println!("\n-- review requested --------------------------------");
                println!(
                    "node '{}' (agent {}): {}",
                    req.node_id, req.agent, req.message
                );
                println!("partial: {}", req.partial);
                println!("answer: approve [json] | deny <reason>");
                print!("> ");
                io::stdout().flush().ok();

                let line = tokio::task::spawn_blocking(|| {
                    let mut line = String::new();
                    io::stdin().lock().read_line(&mut line).map(|_| line)
                })
                .await;

                let line = match line {
                    Ok(Ok(line)) => line,
                    _ => continue,
                };
                let decision = parse_decision(line.trim(), &req.partial);
                broker.respond(&req.id, decision).await;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    });
}

fn parse_decision(line: &str, partial: &serde_json::Value) -> ReviewDecision {
    if let Some(reason) = line.strip_prefix("deny") {
        let reason = reason.trim();
        return ReviewDecision::Denied {
            reason: if reason.is_empty() {
                "denied by operator".to_string()
            } else {
                reason.to_string()
            },
        };
    }

    let rest = line.strip_prefix("approve").unwrap_or(line).trim();
    let output = if rest.is_empty() {
        partial.as_object().cloned().unwrap_or_default()
    } else {
        match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(rest) {
            Ok(map) => map,
            Err(_) => {
                let mut map = serde_json::Map::new();
                map.insert(
                    "content".into(),
                    serde_json::Value::String(rest.to_string()),
                );
                map
            }
        }
    };
    ReviewDecision::Approved { output }
}

async fn show_status(config_path: &PathBuf, task_id: &str) -> anyhow::Result<()> {
    let app = open_app(config_path)?;
    let id = TaskId::from_string(task_id);
    let task = TaskRepository::find_by_id(app.store.as_ref(), &id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no such task: {task_id}"))?;

    println!("Task {} [{}] {}", task.id, task.status, task.description);
    if let Some(error) = &task.error {
        println!("  error: {error}");
    }
    print_runs(&app, &task.id).await?;
    Ok(())
}

async fn print_runs(app: &App, task_id: &TaskId) -> anyhow::Result<()> {
    let runs = RunRepository::find_by_task(app.store.as_ref(), task_id).await?;
    for run in &runs {
        println!(
            "  {:<14} {:<16} {:<9} attempts={}",
            run.node_id,
            run.agent,
            run.status.as_str(),
            run.attempts
        );
        if let Some(error) = &run.error {
            println!("      error: {error}");
        }
        for artifact in ArtifactRepository::find_by_run(app.store.as_ref(), &run.id).await? {
            println!("      artifact [{}] {}", artifact.kind, artifact.path);
        }
    }
    Ok(())
}

async fn list_tasks(config_path: &PathBuf) -> anyhow::Result<()> {
    let app = open_app(config_path)?;
    let tasks = TaskRepository::list(app.store.as_ref()).await?;
    if tasks.is_empty() {
        println!("No tasks yet. Try: adweave create --topic \"spring sale\" --types text,image");
        return Ok(());
    }
    for task in tasks {
        println!(
            "{}  [{:<9}] {}  ({} nodes)",
            task.id,
            task.status.as_str(),
            task.description,
            task.plan.nodes.len()
        );
    }
    Ok(())
}

fn show_providers(config_path: &PathBuf) -> anyhow::Result<()> {
    let app = open_app(config_path)?;
    println!("mode: {}", app.router.mode());
    for p in app.router.providers() {
        println!(
            "  {:<12} priority={:<4} enabled={:<5} mock={:<5} credential={}",
            p.id,
            p.priority,
            p.enabled,
            p.mock,
            if p.has_credential() { "yes" } else { "no" }
        );
    }
    Ok(())
}
