use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use adweave_agents::AgentRegistry;
use adweave_core::config::ExecutorConfig;
use adweave_core::error::{AdweaveError, Result};
use adweave_core::log::TaskLogger;
use adweave_core::plan::PlanNode;
use adweave_core::traits::{
    AgentContext, ArtifactStorage, LogRepository, ProviderInvoker, RunRepository, TaskRepository,
};
use adweave_core::types::{
    OutputMap, RunRecord, TaskId, TaskRecord, TaskStatus, DEPENDENCIES_KEY, ESCALATION_CAPABILITY,
};

/// Shared infrastructure the executor runs against.
pub struct ExecutorEnv {
    pub registry: Arc<AgentRegistry>,
    pub tasks: Arc<dyn TaskRepository>,
    pub runs: Arc<dyn RunRepository>,
    pub logs: Arc<dyn LogRepository>,
    pub providers: Arc<dyn ProviderInvoker>,
    pub storage: Arc<dyn ArtifactStorage>,
}

/// Task Orchestration Core.
///
/// Walks one task graph in dependency order, caps attempts per node, and
/// guarantees every run reaches a terminal status. One task is drained by
/// one caller; ready nodes within a scan pass execute sequentially.
pub struct TaskExecutor {
    env: ExecutorEnv,
    max_attempts: u32,
    locale: String,
}

impl TaskExecutor {
    pub fn new(env: ExecutorEnv, config: &ExecutorConfig, locale: impl Into<String>) -> Self {
        Self {
            env,
            max_attempts: config.max_attempts,
            locale: locale.into(),
        }
    }

    /// Execute a persisted task to a terminal status.
    ///
    /// Returns the task record in its terminal state (`Completed` or
    /// `Failed`). `Err` is reserved for infrastructure problems — a missing
    /// task or a failing repository — never for node failures.
    pub async fn execute_task(&self, task_id: &TaskId) -> Result<TaskRecord> {
        let mut task = self
            .env
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AdweaveError::TaskNotFound(task_id.to_string()))?;

        let logger = TaskLogger::new(self.env.logs.clone(), task.id.clone());

        if let Err(e) = task.plan.validate() {
            warn!(task_id = %task.id, error = %e, "Task references a malformed plan");
            return self.fail_task(task, e.to_string(), &logger).await;
        }

        task.status = TaskStatus::Running;
        task.updated_at = Utc::now();
        self.env.tasks.update(&task).await?;

        let nodes: Vec<PlanNode> = task.plan.nodes.clone();
        info!(task_id = %task.id, nodes = nodes.len(), "Task started");
        logger
            .info("task started", serde_json::json!({"nodes": nodes.len()}))
            .await;

        // One run per node, durable before anything executes.
        let mut runs: HashMap<String, RunRecord> = HashMap::new();
        for node in &nodes {
            let run = RunRecord::new(task.id.clone(), &node.id, &node.agent);
            self.env.runs.create(&run).await?;
            runs.insert(node.id.clone(), run);
        }

        // Outputs of completed nodes, keyed by node id.
        let mut results: HashMap<String, serde_json::Value> = HashMap::new();

        while results.len() < nodes.len() {
            let mut executed = 0usize;

            for node in &nodes {
                if results.contains_key(&node.id) {
                    continue;
                }
                if !node.depends_on.iter().all(|d| results.contains_key(d)) {
                    continue;
                }

                let run = runs.get_mut(&node.id).ok_or_else(|| {
                    AdweaveError::Database(format!("no run record for node '{}'", node.id))
                })?;

                match self.execute_node(&task, node, run, &results, &logger).await {
                    Ok(output) => {
                        results.insert(node.id.clone(), serde_json::Value::Object(output));
                        executed += 1;
                    }
                    Err(e) => {
                        // Terminal node failure fails the whole task;
                        // remaining nodes are left untouched.
                        return self.fail_task(task, e.to_string(), &logger).await;
                    }
                }
            }

            if executed == 0 && results.len() < nodes.len() {
                let unresolved = nodes.len() - results.len();
                let err = AdweaveError::GraphStagnation {
                    task_id: task.id.to_string(),
                    unresolved,
                };
                logger
                    .error(
                        "task graph stalled",
                        serde_json::json!({"unresolved": unresolved}),
                    )
                    .await;
                return self.fail_task(task, err.to_string(), &logger).await;
            }
        }

        task.status = TaskStatus::Completed;
        task.error = None;
        task.updated_at = Utc::now();
        self.env.tasks.update(&task).await?;
        info!(task_id = %task.id, "Task completed");
        logger.info("task completed", serde_json::json!({})).await;
        Ok(task)
    }

    /// Run one node: bounded attempts, then escalation.
    async fn execute_node(
        &self,
        task: &TaskRecord,
        node: &PlanNode,
        run: &mut RunRecord,
        results: &HashMap<String, serde_json::Value>,
        logger: &TaskLogger,
    ) -> Result<OutputMap> {
        let payload = build_payload(node, results);
        let mut last_error = String::new();

        for _ in 0..self.max_attempts {
            run.status = TaskStatus::Running;
            run.attempts += 1;
            if run.started_at.is_none() {
                run.started_at = Some(Utc::now());
            }
            self.env.runs.update(run).await?;

            debug!(
                task_id = %task.id,
                node_id = %node.id,
                agent = %node.agent,
                attempt = run.attempts,
                "Executing node"
            );

            // The capability is resolved per attempt; a lookup failure is an
            // ordinary execution failure.
            let outcome = match self.env.registry.load(&node.agent) {
                Ok(agent) => {
                    agent
                        .execute(payload.clone(), self.agent_context(task, run, logger))
                        .await
                }
                Err(e) => Err(e),
            };

            match outcome {
                Ok(output) => {
                    run.status = TaskStatus::Completed;
                    run.error = None;
                    run.output = Some(serde_json::Value::Object(output.clone()));
                    run.ended_at = Some(Utc::now());
                    self.env.runs.update(run).await?;
                    logger
                        .info(
                            "node completed",
                            serde_json::json!({"node": node.id, "attempts": run.attempts}),
                        )
                        .await;
                    return Ok(output);
                }
                Err(e) => {
                    last_error = e.to_string();
                    run.error = Some(format!("attempt {}: {}", run.attempts, last_error));
                    self.env.runs.update(run).await?;
                    logger
                        .warn(
                            "node attempt failed",
                            serde_json::json!({
                                "node": node.id,
                                "attempt": run.attempts,
                                "error": last_error,
                            }),
                        )
                        .await;
                }
            }
        }

        // Retries exhausted.
        run.status = TaskStatus::Failed;
        run.ended_at = Some(Utc::now());
        self.env.runs.update(run).await?;

        self.escalate(task, node, run, &last_error, logger).await
    }

    /// Human-gate escalation: one extra attempt through the escalation
    /// capability. Its output, if any, becomes the node's result.
    async fn escalate(
        &self,
        task: &TaskRecord,
        node: &PlanNode,
        run: &mut RunRecord,
        last_error: &str,
        logger: &TaskLogger,
    ) -> Result<OutputMap> {
        let gate = match self.env.registry.get(ESCALATION_CAPABILITY) {
            Some(gate) => gate,
            None => {
                logger
                    .error(
                        "no escalation capability registered",
                        serde_json::json!({"node": node.id}),
                    )
                    .await;
                return Err(AdweaveError::Escalation {
                    node: node.id.clone(),
                    message: format!(
                        "retries exhausted and no '{}' capability registered: {}",
                        ESCALATION_CAPABILITY, last_error
                    ),
                });
            }
        };

        let payload = serde_json::json!({
            "failed_node": node.id,
            "partial": run.output.clone().unwrap_or(serde_json::json!({})),
            "message": format!(
                "agent '{}' failed after {} attempts: {}",
                node.agent, run.attempts, last_error
            ),
        });

        run.status = TaskStatus::Running;
        run.attempts += 1;
        self.env.runs.update(run).await?;
        logger
            .warn(
                "node escalated",
                serde_json::json!({"node": node.id, "attempts": run.attempts}),
            )
            .await;

        match gate
            .execute(payload, self.agent_context(task, run, logger))
            .await
        {
            Ok(output) => {
                run.status = TaskStatus::Completed;
                run.error = None;
                run.output = Some(serde_json::Value::Object(output.clone()));
                run.ended_at = Some(Utc::now());
                self.env.runs.update(run).await?;
                logger
                    .info(
                        "escalation resolved",
                        serde_json::json!({"node": node.id}),
                    )
                    .await;
                Ok(output)
            }
            Err(e) => {
                run.status = TaskStatus::Failed;
                run.error = Some(format!("escalation: {}", e));
                run.ended_at = Some(Utc::now());
                self.env.runs.update(run).await?;
                Err(AdweaveError::Escalation {
                    node: node.id.clone(),
                    message: e.to_string(),
                })
            }
        }
    }

    fn agent_context(
        &self,
        task: &TaskRecord,
        run: &RunRecord,
        logger: &TaskLogger,
    ) -> AgentContext {
        AgentContext {
            task: task.clone(),
            run: run.clone(),
            providers: self.env.providers.clone(),
            storage: self.env.storage.clone(),
            logger: logger.for_run(run.id.clone()),
            mode: self.env.providers.mode(),
            locale: self.locale.clone(),
        }
    }

    async fn fail_task(
        &self,
        mut task: TaskRecord,
        error: String,
        logger: &TaskLogger,
    ) -> Result<TaskRecord> {
        warn!(task_id = %task.id, error = %error, "Task failed");
        logger
            .error("task failed", serde_json::json!({"error": error}))
            .await;
        task.status = TaskStatus::Failed;
        task.error = Some(error);
        task.updated_at = Utc::now();
        self.env.tasks.update(&task).await?;
        Ok(task)
    }
}

/// Node payload: static input merged with the outputs of its declared
/// dependencies under `dependencies`.
fn build_payload(node: &PlanNode, results: &HashMap<String, serde_json::Value>) -> serde_json::Value {
    let mut payload = match &node.input {
        serde_json::Value::Object(map) => map.clone(),
        serde_json::Value::Null => serde_json::Map::new(),
        other => {
            let mut map = serde_json::Map::new();
            map.insert("input".to_string(), other.clone());
            map
        }
    };

    let mut deps = serde_json::Map::new();
    for dep in &node.depends_on {
        if let Some(output) = results.get(dep) {
            deps.insert(dep.clone(), output.clone());
        }
    }
    payload.insert(DEPENDENCIES_KEY.to_string(), serde_json::Value::Object(deps));

    serde_json::Value::Object(payload)
}
