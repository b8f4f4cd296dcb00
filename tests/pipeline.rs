//! End-to-end pipeline runs against the real store, registry, and provider
//! router — everything short of the network, which mock mode replaces.

use std::sync::Arc;

use futures::future::BoxFuture;

use adweave_agents::{AgentRegistry, ReviewBroker};
use adweave_core::config::ExecutorConfig;
use adweave_core::error::{AdweaveError, Result};
use adweave_core::plan::PlanNode;
use adweave_core::traits::{
    Agent, AgentContext, ArtifactRepository, LogRepository, RunRepository, TaskRepository,
};
use adweave_core::types::{ContentType, OutputMap, TaskRecord, TaskStatus};
use adweave_executor::{template, ExecutorEnv, TaskExecutor};
use adweave_providers::ProviderRouter;
use adweave_store::{FsArtifactStore, SqliteStore};

struct Pipeline {
    _dir: tempfile::TempDir,
    store: Arc<SqliteStore>,
    executor: TaskExecutor,
}

fn pipeline(registry: AgentRegistry, config: &ExecutorConfig) -> Pipeline {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::open(&dir.path().join("adweave.db")).unwrap());
    let storage = Arc::new(FsArtifactStore::new(
        dir.path().join("artifacts"),
        store.clone(),
    ));
    // No configured providers: the router answers synthetically.
    let providers = Arc::new(ProviderRouter::with_clients(vec![]));

    let executor = TaskExecutor::new(
        ExecutorEnv {
            registry: Arc::new(registry),
            tasks: store.clone(),
            runs: store.clone(),
            logs: store.clone(),
            providers,
            storage,
        },
        config,
        "en-US",
    );

    Pipeline {
        _dir: dir,
        store,
        executor,
    }
}

#[tokio::test]
async fn full_campaign_completes_in_mock_mode() {
    let config = ExecutorConfig::default();
    let registry = AgentRegistry::with_builtins(Arc::new(ReviewBroker::new()), &config);
    let p = pipeline(registry, &config);

    let plan = template::build_plan(
        "spring sale",
        &[ContentType::Text, ContentType::Image, ContentType::Video],
    );
    let task = TaskRecord::new(plan);
    TaskRepository::create(p.store.as_ref(), &task).await.unwrap();

    let done = p.executor.execute_task(&task.id).await.unwrap();
    assert_eq!(done.status, TaskStatus::Completed);

    let runs = RunRepository::find_by_task(p.store.as_ref(), &task.id)
        .await
        .unwrap();
    assert_eq!(runs.len(), 5);
    for run in &runs {
        assert_eq!(run.status, TaskStatus::Completed, "run {}", run.node_id);
        assert_eq!(run.attempts, 1);
    }

    // Copy, image, video, and the publish manifest each produced an artifact
    // whose bytes exist on disk.
    let mut artifact_count = 0;
    for run in &runs {
        for artifact in ArtifactRepository::find_by_run(p.store.as_ref(), &run.id)
            .await
            .unwrap()
        {
            assert!(std::path::Path::new(&artifact.path).exists());
            artifact_count += 1;
        }
    }
    assert_eq!(artifact_count, 4);

    // The run left a durable log trail.
    let logs = LogRepository::find_by_task(p.store.as_ref(), &task.id)
        .await
        .unwrap();
    assert!(logs.iter().any(|l| l.message == "task started"));
    assert!(logs.iter().any(|l| l.message == "task completed"));
}

/// Fails every time; stands in for a broken capability.
struct UnstableAgent;

impl Agent for UnstableAgent {
    fn name(&self) -> &str {
        "unstable"
    }

    fn description(&self) -> &str {
        "always fails"
    }

    fn execute(
        &self,
        _payload: serde_json::Value,
        _ctx: AgentContext,
    ) -> BoxFuture<'_, Result<OutputMap>> {
        Box::pin(async {
            Err(AdweaveError::AgentExecution {
                agent: "unstable".into(),
                message: "synthetic outage".into(),
            })
        })
    }
}

#[tokio::test]
async fn escalation_auto_approval_rescues_a_broken_node() {
    let config = ExecutorConfig {
        auto_approve: true,
        ..Default::default()
    };
    let mut registry = AgentRegistry::with_builtins(Arc::new(ReviewBroker::new()), &config);
    registry.register(UnstableAgent);
    let p = pipeline(registry, &config);

    let plan = adweave_core::plan::Plan::new("rescued", vec![ContentType::Text]).with_nodes(vec![
        PlanNode::new("shaky", "unstable"),
        PlanNode::new("publish", "publisher").depends_on(vec!["shaky".into()]),
    ]);
    let task = TaskRecord::new(plan);
    TaskRepository::create(p.store.as_ref(), &task).await.unwrap();

    let done = p.executor.execute_task(&task.id).await.unwrap();
    assert_eq!(done.status, TaskStatus::Completed);

    let runs = RunRepository::find_by_task(p.store.as_ref(), &task.id)
        .await
        .unwrap();
    // Three failed attempts plus the auto-approved escalation.
    assert_eq!(runs[0].attempts, 4);
    assert_eq!(runs[0].status, TaskStatus::Completed);
    assert_eq!(
        runs[0].output.as_ref().unwrap()["resolved_by"],
        serde_json::json!("auto")
    );
    assert_eq!(runs[1].status, TaskStatus::Completed);
}

#[tokio::test]
async fn denial_by_missing_reviewer_fails_the_task() {
    // Tight review timeout and no one listening: escalation times out.
    let config = ExecutorConfig {
        review_timeout_secs: 0,
        ..Default::default()
    };
    let mut registry = AgentRegistry::with_builtins(Arc::new(ReviewBroker::new()), &config);
    registry.register(UnstableAgent);
    let p = pipeline(registry, &config);

    let plan = adweave_core::plan::Plan::new("doomed", vec![ContentType::Text])
        .with_nodes(vec![PlanNode::new("shaky", "unstable")]);
    let task = TaskRecord::new(plan);
    TaskRepository::create(p.store.as_ref(), &task).await.unwrap();

    let done = p.executor.execute_task(&task.id).await.unwrap();
    assert_eq!(done.status, TaskStatus::Failed);

    let runs = RunRepository::find_by_task(p.store.as_ref(), &task.id)
        .await
        .unwrap();
    assert_eq!(runs[0].status, TaskStatus::Failed);
    assert_eq!(runs[0].attempts, 4);
}

#[tokio::test]
async fn round_trip_preserves_graph_through_persistence() {
    let config = ExecutorConfig::default();
    let registry = AgentRegistry::with_builtins(Arc::new(ReviewBroker::new()), &config);
    let p = pipeline(registry, &config);

    let plan = template::build_plan("round trip", &[ContentType::Text, ContentType::Image]);
    let task = TaskRecord::new(plan.clone());
    TaskRepository::create(p.store.as_ref(), &task).await.unwrap();

    let loaded = TaskRepository::find_by_id(p.store.as_ref(), &task.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(loaded.plan.nodes.len(), plan.nodes.len());
    for (a, b) in plan.nodes.iter().zip(loaded.plan.nodes.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.agent, b.agent);
        assert_eq!(a.depends_on, b.depends_on);
        assert_eq!(a.input, b.input);
    }
}
