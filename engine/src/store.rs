//! Persistence port and adapters.
//!
//! The engine persists one serde document, [`ControlSnapshot`]: the full tool
//! state map plus the raw configuration overrides. The port is deliberately
//! narrow so the engine knows nothing about whatever larger configuration
//! document an adapter may fold the snapshot into.
//!
//! Persistence is best-effort: the engine logs save failures and keeps going,
//! because the in-memory map is authoritative for the running process.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, anyhow};
use toolgate_types::{RawControlConfig, ToolId, ToolState};

/// The persisted document: every tool's state plus configuration overrides.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlSnapshot {
    #[serde(default)]
    pub states: BTreeMap<ToolId, ToolState>,
    #[serde(default)]
    pub config: RawControlConfig,
}

/// Where the engine reads its snapshot at construction and writes it after
/// every mutation.
pub trait ControlStore {
    fn load(&self) -> anyhow::Result<ControlSnapshot>;
    fn save(&self, snapshot: &ControlSnapshot) -> anyhow::Result<()>;
}

// Callers keep a handle to the same store the engine writes through.
impl<S: ControlStore + ?Sized> ControlStore for std::sync::Arc<S> {
    fn load(&self) -> anyhow::Result<ControlSnapshot> {
        (**self).load()
    }

    fn save(&self, snapshot: &ControlSnapshot) -> anyhow::Result<()> {
        (**self).save(snapshot)
    }
}

/// In-memory adapter for tests and callers that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<ControlSnapshot>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a pre-existing snapshot, as a restart would see.
    #[must_use]
    pub fn with_snapshot(snapshot: ControlSnapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
        }
    }

    /// The last saved snapshot (test inspection).
    pub fn snapshot(&self) -> anyhow::Result<ControlSnapshot> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(guard.clone())
    }
}

impl ControlStore for MemoryStore {
    fn load(&self) -> anyhow::Result<ControlSnapshot> {
        self.snapshot()
    }

    fn save(&self, snapshot: &ControlSnapshot) -> anyhow::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        *guard = snapshot.clone();
        Ok(())
    }
}

/// File adapter: pretty-printed JSON at a caller-supplied path.
///
/// A missing file loads as the empty snapshot; the parent directory is
/// created on first save.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ControlStore for JsonFileStore {
    fn load(&self) -> anyhow::Result<ControlSnapshot> {
        if !self.path.exists() {
            return Ok(ControlSnapshot::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read tool control snapshot {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parse tool control snapshot {}", self.path.display()))
    }

    fn save(&self, snapshot: &ControlSnapshot) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create snapshot directory {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(snapshot).context("serialize snapshot")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("write tool control snapshot {}", self.path.display()))
    }
}
