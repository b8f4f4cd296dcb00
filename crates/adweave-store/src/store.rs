use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use rusqlite::{params, Connection, Row};
use tracing::debug;

use adweave_core::error::{AdweaveError, Result};
use adweave_core::traits::{ArtifactRepository, LogRepository, RunRepository, TaskRepository};
use adweave_core::types::{
    ArtifactId, ArtifactRecord, ContentType, LogLevel, LogRecord, RunId, RunRecord, TaskId,
    TaskRecord, TaskStatus,
};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS tasks (
        id TEXT PRIMARY KEY,
        description TEXT NOT NULL,
        plan TEXT NOT NULL,
        status TEXT NOT NULL,
        error TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS runs (
        id TEXT PRIMARY KEY,
        task_id TEXT NOT NULL REFERENCES tasks(id),
        node_id TEXT NOT NULL,
        agent TEXT NOT NULL,
        status TEXT NOT NULL,
        error TEXT,
        attempts INTEGER NOT NULL DEFAULT 0,
        output TEXT,
        started_at TEXT,
        ended_at TEXT,
        seq INTEGER
    );

    CREATE INDEX IF NOT EXISTS idx_runs_task ON runs(task_id, seq);

    CREATE TABLE IF NOT EXISTS artifacts (
        id TEXT PRIMARY KEY,
        run_id TEXT NOT NULL REFERENCES runs(id),
        kind TEXT NOT NULL,
        path TEXT NOT NULL,
        metadata TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_artifacts_run ON artifacts(run_id);

    CREATE TABLE IF NOT EXISTS logs (
        id TEXT PRIMARY KEY,
        task_id TEXT NOT NULL,
        run_id TEXT,
        level TEXT NOT NULL,
        message TEXT NOT NULL,
        meta TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_logs_task ON logs(task_id, created_at);
";

/// SQLite-backed store implementing all four persistence repositories.
///
/// The relational store is the single source of truth for durable state:
/// every write is committed when the call returns, and each record has one
/// writer at a time.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AdweaveError::Database(format!("Failed to create db directory: {}", e))
            })?;
        }

        let conn = Connection::open(path).map_err(|e| AdweaveError::Database(e.to_string()))?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| AdweaveError::Database(e.to_string()))?;

        conn.execute_batch(SCHEMA)
            .map_err(|e| AdweaveError::Database(e.to_string()))?;

        debug!(path = %path.display(), "SQLite store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| AdweaveError::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| AdweaveError::Database(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| AdweaveError::Database(e.to_string()))
    }
}

fn db_err(e: rusqlite::Error) -> AdweaveError {
    AdweaveError::Database(e.to_string())
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AdweaveError::Database(format!("bad timestamp '{s}': {e}")))
}

fn parse_opt_ts(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
    s.as_deref().map(parse_ts).transpose()
}

fn parse_status(s: &str) -> Result<TaskStatus> {
    TaskStatus::parse(s).ok_or_else(|| AdweaveError::Database(format!("unknown status '{s}'")))
}

type TaskRow = (
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
);

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

// Parsing happens outside the query_map closure, where rich errors fit.
fn finish_task(raw: TaskRow) -> Result<TaskRecord> {
    let (id, description, plan_json, status, error, created_at, updated_at) = raw;
    Ok(TaskRecord {
        id: TaskId::from_string(id),
        description,
        plan: serde_json::from_str(&plan_json)?,
        status: parse_status(&status)?,
        error,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
    })
}

impl TaskRepository for SqliteStore {
    fn create(&self, task: &TaskRecord) -> BoxFuture<'_, Result<()>> {
        let task = task.clone();
        Box::pin(async move {
            let plan_json = serde_json::to_string(&task.plan)?;
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO tasks (id, description, plan, status, error, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    task.id.0,
                    task.description,
                    plan_json,
                    task.status.as_str(),
                    task.error,
                    task.created_at.to_rfc3339(),
                    task.updated_at.to_rfc3339(),
                ],
            )
            .map_err(db_err)?;
            Ok(())
        })
    }

    fn update(&self, task: &TaskRecord) -> BoxFuture<'_, Result<()>> {
        let task = task.clone();
        Box::pin(async move {
            let conn = self.lock()?;
            let changed = conn
                .execute(
                    "UPDATE tasks SET status = ?2, error = ?3, updated_at = ?4 WHERE id = ?1",
                    params![
                        task.id.0,
                        task.status.as_str(),
                        task.error,
                        task.updated_at.to_rfc3339(),
                    ],
                )
                .map_err(db_err)?;
            if changed == 0 {
                return Err(AdweaveError::TaskNotFound(task.id.to_string()));
            }
            Ok(())
        })
    }

    fn find_by_id(&self, id: &TaskId) -> BoxFuture<'_, Result<Option<TaskRecord>>> {
        let id = id.clone();
        Box::pin(async move {
            let conn = self.lock()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, description, plan, status, error, created_at, updated_at
                     FROM tasks WHERE id = ?1",
                )
                .map_err(db_err)?;
            let mut rows = stmt
                .query_map(params![id.0], task_from_row)
                .map_err(db_err)?;
            match rows.next() {
                Some(raw) => Ok(Some(finish_task(raw.map_err(db_err)?)?)),
                None => Ok(None),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<TaskRecord>>> {
        Box::pin(async move {
            let conn = self.lock()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, description, plan, status, error, created_at, updated_at
                     FROM tasks ORDER BY created_at",
                )
                .map_err(db_err)?;
            let rows = stmt.query_map([], task_from_row).map_err(db_err)?;
            let mut tasks = Vec::new();
            for raw in rows {
                tasks.push(finish_task(raw.map_err(db_err)?)?);
            }
            Ok(tasks)
        })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: RunId::from_string(row.get::<_, String>(0)?),
        task_id: TaskId::from_string(row.get::<_, String>(1)?),
        node_id: row.get(2)?,
        agent: row.get(3)?,
        // Status/output/timestamps are replaced by the caller.
        status: TaskStatus::Pending,
        error: row.get(5)?,
        attempts: row.get(6)?,
        output: None,
        started_at: None,
        ended_at: None,
    })
}

fn finish_run(
    mut run: RunRecord,
    status: String,
    output: Option<String>,
    started_at: Option<String>,
    ended_at: Option<String>,
) -> Result<RunRecord> {
    run.status = parse_status(&status)?;
    run.output = output.as_deref().map(serde_json::from_str).transpose()?;
    run.started_at = parse_opt_ts(started_at)?;
    run.ended_at = parse_opt_ts(ended_at)?;
    Ok(run)
}

impl RunRepository for SqliteStore {
    fn create(&self, run: &RunRecord) -> BoxFuture<'_, Result<()>> {
        let run = run.clone();
        Box::pin(async move {
            let output = run
                .output
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;
            let conn = self.lock()?;
            // seq preserves plan declaration order for find_by_task
            conn.execute(
                "INSERT INTO runs
                   (id, task_id, node_id, agent, status, error, attempts, output,
                    started_at, ended_at, seq)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                   (SELECT COUNT(*) FROM runs WHERE task_id = ?2))",
                params![
                    run.id.0,
                    run.task_id.0,
                    run.node_id,
                    run.agent,
                    run.status.as_str(),
                    run.error,
                    run.attempts,
                    output,
                    run.started_at.map(|t| t.to_rfc3339()),
                    run.ended_at.map(|t| t.to_rfc3339()),
                ],
            )
            .map_err(db_err)?;
            Ok(())
        })
    }

    fn update(&self, run: &RunRecord) -> BoxFuture<'_, Result<()>> {
        let run = run.clone();
        Box::pin(async move {
            let output = run
                .output
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;
            let conn = self.lock()?;
            let changed = conn
                .execute(
                    "UPDATE runs SET status = ?2, error = ?3, attempts = ?4, output = ?5,
                        started_at = ?6, ended_at = ?7
                     WHERE id = ?1",
                    params![
                        run.id.0,
                        run.status.as_str(),
                        run.error,
                        run.attempts,
                        output,
                        run.started_at.map(|t| t.to_rfc3339()),
                        run.ended_at.map(|t| t.to_rfc3339()),
                    ],
                )
                .map_err(db_err)?;
            if changed == 0 {
                return Err(AdweaveError::Database(format!(
                    "run not found: {}",
                    run.id
                )));
            }
            Ok(())
        })
    }

    fn find_by_id(&self, id: &RunId) -> BoxFuture<'_, Result<Option<RunRecord>>> {
        let id = id.clone();
        Box::pin(async move {
            let conn = self.lock()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, task_id, node_id, agent, status, error, attempts, output,
                            started_at, ended_at
                     FROM runs WHERE id = ?1",
                )
                .map_err(db_err)?;
            let mut rows = stmt
                .query_map(params![id.0], |row| {
                    let run = run_from_row(row)?;
                    let status: String = row.get(4)?;
                    let output: Option<String> = row.get(7)?;
                    let started_at: Option<String> = row.get(8)?;
                    let ended_at: Option<String> = row.get(9)?;
                    Ok((run, status, output, started_at, ended_at))
                })
                .map_err(db_err)?;
            match rows.next() {
                Some(raw) => {
                    let (run, status, output, started_at, ended_at) = raw.map_err(db_err)?;
                    Ok(Some(finish_run(run, status, output, started_at, ended_at)?))
                }
                None => Ok(None),
            }
        })
    }

    fn find_by_task(&self, task_id: &TaskId) -> BoxFuture<'_, Result<Vec<RunRecord>>> {
        let task_id = task_id.clone();
        Box::pin(async move {
            let conn = self.lock()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, task_id, node_id, agent, status, error, attempts, output,
                            started_at, ended_at
                     FROM runs WHERE task_id = ?1 ORDER BY seq",
                )
                .map_err(db_err)?;
            let rows = stmt
                .query_map(params![task_id.0], |row| {
                    let run = run_from_row(row)?;
                    let status: String = row.get(4)?;
                    let output: Option<String> = row.get(7)?;
                    let started_at: Option<String> = row.get(8)?;
                    let ended_at: Option<String> = row.get(9)?;
                    Ok((run, status, output, started_at, ended_at))
                })
                .map_err(db_err)?;
            let mut runs = Vec::new();
            for raw in rows {
                let (run, status, output, started_at, ended_at) = raw.map_err(db_err)?;
                runs.push(finish_run(run, status, output, started_at, ended_at)?);
            }
            Ok(runs)
        })
    }
}

impl ArtifactRepository for SqliteStore {
    fn create(&self, artifact: &ArtifactRecord) -> BoxFuture<'_, Result<()>> {
        let artifact = artifact.clone();
        Box::pin(async move {
            let metadata = serde_json::to_string(&artifact.metadata)?;
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO artifacts (id, run_id, kind, path, metadata, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    artifact.id.0,
                    artifact.run_id.0,
                    artifact.kind.as_str(),
                    artifact.path,
                    metadata,
                    artifact.created_at.to_rfc3339(),
                ],
            )
            .map_err(db_err)?;
            Ok(())
        })
    }

    fn find_by_id(&self, id: &ArtifactId) -> BoxFuture<'_, Result<Option<ArtifactRecord>>> {
        let id = id.clone();
        Box::pin(async move {
            let conn = self.lock()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, run_id, kind, path, metadata, created_at
                     FROM artifacts WHERE id = ?1",
                )
                .map_err(db_err)?;
            let mut rows = stmt
                .query_map(params![id.0], artifact_from_row)
                .map_err(db_err)?;
            match rows.next() {
                Some(raw) => Ok(Some(finish_artifact(raw.map_err(db_err)?)?)),
                None => Ok(None),
            }
        })
    }

    fn find_by_run(&self, run_id: &RunId) -> BoxFuture<'_, Result<Vec<ArtifactRecord>>> {
        let run_id = run_id.clone();
        Box::pin(async move {
            let conn = self.lock()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, run_id, kind, path, metadata, created_at
                     FROM artifacts WHERE run_id = ?1 ORDER BY created_at",
                )
                .map_err(db_err)?;
            let rows = stmt
                .query_map(params![run_id.0], artifact_from_row)
                .map_err(db_err)?;
            let mut artifacts = Vec::new();
            for raw in rows {
                artifacts.push(finish_artifact(raw.map_err(db_err)?)?);
            }
            Ok(artifacts)
        })
    }
}

fn artifact_from_row(
    row: &Row<'_>,
) -> rusqlite::Result<(String, String, String, String, String, String)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn finish_artifact(
    raw: (String, String, String, String, String, String),
) -> Result<ArtifactRecord> {
    let (id, run_id, kind, path, metadata, created_at) = raw;
    Ok(ArtifactRecord {
        id: ArtifactId::from_string(id),
        run_id: RunId::from_string(run_id),
        kind: ContentType::parse(&kind)
            .ok_or_else(|| AdweaveError::Database(format!("unknown artifact kind '{kind}'")))?,
        path,
        metadata: serde_json::from_str(&metadata)?,
        created_at: parse_ts(&created_at)?,
    })
}

impl LogRepository for SqliteStore {
    fn create(&self, entry: &LogRecord) -> BoxFuture<'_, Result<()>> {
        let entry = entry.clone();
        Box::pin(async move {
            let meta = serde_json::to_string(&entry.meta)?;
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO logs (id, task_id, run_id, level, message, meta, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    entry.id,
                    entry.task_id.0,
                    entry.run_id.as_ref().map(|r| r.0.clone()),
                    entry.level.as_str(),
                    entry.message,
                    meta,
                    entry.created_at.to_rfc3339(),
                ],
            )
            .map_err(db_err)?;
            Ok(())
        })
    }

    fn find_by_task(&self, task_id: &TaskId) -> BoxFuture<'_, Result<Vec<LogRecord>>> {
        let task_id = task_id.clone();
        Box::pin(async move {
            let conn = self.lock()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, task_id, run_id, level, message, meta, created_at
                     FROM logs WHERE task_id = ?1 ORDER BY created_at",
                )
                .map_err(db_err)?;
            let rows = stmt
                .query_map(params![task_id.0], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                })
                .map_err(db_err)?;
            let mut entries = Vec::new();
            for raw in rows {
                let (id, task_id, run_id, level, message, meta, created_at) =
                    raw.map_err(db_err)?;
                let level = match level.as_str() {
                    "info" => LogLevel::Info,
                    "warn" => LogLevel::Warn,
                    "error" => LogLevel::Error,
                    other => {
                        return Err(AdweaveError::Database(format!(
                            "unknown log level '{other}'"
                        )))
                    }
                };
                entries.push(LogRecord {
                    id,
                    task_id: TaskId::from_string(task_id),
                    run_id: run_id.map(RunId::from_string),
                    level,
                    message,
                    meta: serde_json::from_str(&meta)?,
                    created_at: parse_ts(&created_at)?,
                });
            }
            Ok(entries)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adweave_core::plan::{Plan, PlanNode};
    use chrono::Utc;

    fn sample_plan() -> Plan {
        Plan::new("launch campaign", vec![ContentType::Text, ContentType::Image]).with_nodes(
            vec![
                PlanNode::new("copy", "copywriter")
                    .with_input(serde_json::json!({"topic": "spring sale"})),
                PlanNode::new("hero", "image_director").depends_on(vec!["copy".into()]),
            ],
        )
    }

    #[tokio::test]
    async fn task_round_trip_preserves_plan_structure() {
        let store = SqliteStore::in_memory().unwrap();
        let task = TaskRecord::new(sample_plan());

        TaskRepository::create(&store, &task).await.unwrap();
        let loaded = TaskRepository::find_by_id(&store, &task.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(loaded.id, task.id);
        assert_eq!(loaded.status, TaskStatus::Pending);
        assert_eq!(loaded.plan.nodes.len(), 2);
        // No reordering, no lost edges
        assert_eq!(loaded.plan.nodes[0].id, "copy");
        assert_eq!(loaded.plan.nodes[1].id, "hero");
        assert_eq!(loaded.plan.nodes[1].depends_on, vec!["copy".to_string()]);
    }

    #[tokio::test]
    async fn task_update_persists_status_and_error() {
        let store = SqliteStore::in_memory().unwrap();
        let mut task = TaskRecord::new(sample_plan());
        TaskRepository::create(&store, &task).await.unwrap();

        task.status = TaskStatus::Failed;
        task.error = Some("node 'hero' failed".into());
        task.updated_at = Utc::now();
        TaskRepository::update(&store, &task).await.unwrap();

        let loaded = TaskRepository::find_by_id(&store, &task.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status, TaskStatus::Failed);
        assert_eq!(loaded.error.as_deref(), Some("node 'hero' failed"));
    }

    #[tokio::test]
    async fn update_of_missing_task_fails() {
        let store = SqliteStore::in_memory().unwrap();
        let task = TaskRecord::new(sample_plan());
        assert!(TaskRepository::update(&store, &task).await.is_err());
    }

    #[tokio::test]
    async fn runs_keep_declaration_order() {
        let store = SqliteStore::in_memory().unwrap();
        let task = TaskRecord::new(sample_plan());
        TaskRepository::create(&store, &task).await.unwrap();

        for node in &task.plan.nodes {
            let run = RunRecord::new(task.id.clone(), &node.id, &node.agent);
            RunRepository::create(&store, &run).await.unwrap();
        }

        let runs = RunRepository::find_by_task(&store, &task.id).await.unwrap();
        let node_ids: Vec<&str> = runs.iter().map(|r| r.node_id.as_str()).collect();
        assert_eq!(node_ids, vec!["copy", "hero"]);
    }

    #[tokio::test]
    async fn run_update_round_trips_output() {
        let store = SqliteStore::in_memory().unwrap();
        let task = TaskRecord::new(sample_plan());
        TaskRepository::create(&store, &task).await.unwrap();

        let mut run = RunRecord::new(task.id.clone(), "copy", "copywriter");
        RunRepository::create(&store, &run).await.unwrap();

        run.status = TaskStatus::Completed;
        run.attempts = 2;
        run.output = Some(serde_json::json!({"content": "Spring into savings"}));
        run.started_at = Some(Utc::now());
        run.ended_at = Some(Utc::now());
        RunRepository::update(&store, &run).await.unwrap();

        let loaded = RunRepository::find_by_id(&store, &run.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status, TaskStatus::Completed);
        assert_eq!(loaded.attempts, 2);
        assert_eq!(
            loaded.output.unwrap()["content"],
            serde_json::json!("Spring into savings")
        );
        assert!(loaded.started_at.is_some());
        assert!(loaded.ended_at.is_some());
    }

    #[tokio::test]
    async fn artifacts_attach_to_runs() {
        let store = SqliteStore::in_memory().unwrap();
        let task = TaskRecord::new(sample_plan());
        TaskRepository::create(&store, &task).await.unwrap();
        let run = RunRecord::new(task.id.clone(), "hero", "image_director");
        RunRepository::create(&store, &run).await.unwrap();

        let artifact = ArtifactRecord {
            id: ArtifactId::new(),
            run_id: run.id.clone(),
            kind: ContentType::Image,
            path: "/tmp/artifacts/hero.png".into(),
            metadata: serde_json::json!({"provider": "acme"}),
            created_at: Utc::now(),
        };
        ArtifactRepository::create(&store, &artifact).await.unwrap();

        let found = ArtifactRepository::find_by_run(&store, &run.id)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ContentType::Image);
        assert_eq!(found[0].metadata["provider"], serde_json::json!("acme"));

        let by_id = ArtifactRepository::find_by_id(&store, &artifact.id)
            .await
            .unwrap();
        assert!(by_id.is_some());
    }

    #[tokio::test]
    async fn logs_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let task_id = TaskId::new();
        let entry = LogRecord {
            id: "log-1".into(),
            task_id: task_id.clone(),
            run_id: None,
            level: LogLevel::Warn,
            message: "node retried".into(),
            meta: serde_json::json!({"attempt": 2}),
            created_at: Utc::now(),
        };
        LogRepository::create(&store, &entry).await.unwrap();

        let entries = LogRepository::find_by_task(&store, &task_id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert_eq!(entries[0].meta["attempt"], serde_json::json!(2));
    }

    #[test]
    fn open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deep/adweave.db");
        let store = SqliteStore::open(&path);
        assert!(store.is_ok());
        assert!(path.exists());
    }
}
