//! Write-through persistence: snapshot round trips, restart seeding, and
//! the absorb-and-continue policy for failing stores.

use std::sync::Arc;

use toolgate_engine::store::{ControlSnapshot, ControlStore};
use toolgate_engine::{JsonFileStore, MemoryStore, ToolControlEngine};
use toolgate_types::{Actor, ControlOutcome, ControlRequest, RawControlConfig, ToolAction, ToolId};

fn echo() -> ToolId {
    "srv:echo".parse().expect("valid id")
}

#[test]
fn missing_snapshot_file_loads_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("toolgate.json"));
    let snapshot = store.load().expect("missing file is not an error");
    assert_eq!(snapshot, ControlSnapshot::default());

    let engine = ToolControlEngine::new(Box::new(store));
    assert_eq!(engine.all_tool_states().count(), 0);
}

#[tokio::test]
async fn state_survives_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("toolgate.json");

    {
        let mut engine = ToolControlEngine::new(Box::new(JsonFileStore::new(path.clone())));
        engine.initialize_tool(echo(), "srv", false);
        let outcome = engine
            .process_request(
                ControlRequest::new(echo(), ToolAction::Disable, Actor::User)
                    .with_reason("holiday"),
            )
            .await;
        assert_eq!(outcome, ControlOutcome::Applied { enabled: false });
    }

    let mut engine = ToolControlEngine::new(Box::new(JsonFileStore::new(path)));
    // Re-registration after restart must not clobber the persisted choice.
    engine.initialize_tool(echo(), "srv", false);

    let state = engine.tool_state(&echo()).expect("seeded from disk");
    assert!(!state.enabled);
    assert!(state.dynamically_controlled);
    assert_eq!(state.disable_reason.as_deref(), Some("holiday"));
    assert!(!engine.is_tool_enabled(&echo()));
}

#[test]
fn config_overrides_survive_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("toolgate.json");

    {
        let mut engine = ToolControlEngine::new(Box::new(JsonFileStore::new(path.clone())));
        engine.apply_config(RawControlConfig {
            enable_agent_tool_control: Some(false),
            ..RawControlConfig::default()
        });
    }

    let engine = ToolControlEngine::new(Box::new(JsonFileStore::new(path)));
    assert!(!engine.config().enable_agent_tool_control);
}

#[tokio::test]
async fn every_mutation_writes_through() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = ToolControlEngine::new(Box::new(Arc::clone(&store)));

    engine.initialize_tool(echo(), "srv", false);
    assert!(
        store
            .snapshot()
            .expect("inspect")
            .states
            .contains_key(&echo())
    );

    engine
        .process_request(ControlRequest::new(echo(), ToolAction::Disable, Actor::User))
        .await;
    let persisted = store.snapshot().expect("inspect");
    assert!(!persisted.states[&echo()].enabled);

    engine.record_tool_usage(&echo(), true, 42);
    let persisted = store.snapshot().expect("inspect");
    assert_eq!(persisted.states[&echo()].usage.total_calls, 1);
}

/// Store that always fails, standing in for a broken config document.
struct FailingStore;

impl ControlStore for FailingStore {
    fn load(&self) -> anyhow::Result<ControlSnapshot> {
        anyhow::bail!("disk on fire")
    }

    fn save(&self, _snapshot: &ControlSnapshot) -> anyhow::Result<()> {
        anyhow::bail!("disk on fire")
    }
}

#[tokio::test]
async fn save_failures_never_fail_the_operation() {
    let mut engine = ToolControlEngine::new(Box::new(FailingStore));
    engine.initialize_tool(echo(), "srv", false);

    let outcome = engine
        .process_request(ControlRequest::new(echo(), ToolAction::Disable, Actor::Agent))
        .await;
    // In-memory state stays authoritative even though every save failed.
    assert_eq!(outcome, ControlOutcome::Applied { enabled: false });
    assert!(!engine.is_tool_enabled(&echo()));
    assert_eq!(engine.audit_len(), 1);
}

#[tokio::test]
async fn snapshot_round_trips_through_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("toolgate.json");
    let store = JsonFileStore::new(path);

    let mut engine = ToolControlEngine::new(Box::new(JsonFileStore::new(store.path())));
    engine.initialize_tool(echo(), "srv", false);
    engine
        .process_request(
            ControlRequest::new(echo(), ToolAction::Disable, Actor::User).with_duration_ms(60_000),
        )
        .await;
    engine.record_tool_usage(&echo(), false, 17);

    let snapshot = store.load().expect("load back");
    let state = &snapshot.states[&echo()];
    assert!(!state.enabled);
    assert!(state.temporary_disable_until_ms.is_some());
    assert_eq!(state.usage.failed_calls, 1);
}
