//! Strategy persistence and change notification.
//!
//! The store is constructed once at process start from persisted state and
//! mutated only through its own setters, which write synchronously before
//! notifying subscribers. No flush step is needed at teardown.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::strategy::Strategy;

/// Values persisted to the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StrategySettings {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub auto_sort_enabled: bool,
}

/// Persistence seam for strategy settings.
pub trait SettingsStore {
    fn load(&self) -> Result<StrategySettings>;
    fn save(&self, settings: &StrategySettings) -> Result<()>;
}

/// JSON-file-backed store under the user's home directory.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `~/.taskrank/settings.json`.
    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME is not set")?;
        Ok(PathBuf::from(home).join(".taskrank").join("settings.json"))
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<StrategySettings> {
        if !self.path.exists() {
            return Ok(StrategySettings::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse {}", self.path.display()))
    }

    fn save(&self, settings: &StrategySettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory store for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: Mutex<StrategySettings>,
}

impl MemorySettingsStore {
    pub fn new(settings: StrategySettings) -> Self {
        Self { inner: Mutex::new(settings) }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<StrategySettings> {
        Ok(*self.inner.lock().expect("settings mutex poisoned"))
    }

    fn save(&self, settings: &StrategySettings) -> Result<()> {
        *self.inner.lock().expect("settings mutex poisoned") = *settings;
        Ok(())
    }
}

type StrategyListener = Box<dyn Fn(Strategy) + Send>;

/// Owns the current strategy and auto-sort flag.
///
/// Setters persist synchronously, then notify subscribers. Writing the
/// same value again is allowed and idempotent.
pub struct StrategyStore {
    settings: StrategySettings,
    store: Box<dyn SettingsStore + Send>,
    listeners: Vec<StrategyListener>,
}

impl StrategyStore {
    /// Load persisted settings through the given store.
    pub fn open(store: Box<dyn SettingsStore + Send>) -> Result<Self> {
        let settings = store.load()?;
        debug!(strategy = %settings.strategy, auto_sort = settings.auto_sort_enabled, "strategy settings loaded");
        Ok(Self { settings, store, listeners: Vec::new() })
    }

    /// Volatile store with default settings. Handy for tests.
    pub fn in_memory() -> Self {
        Self {
            settings: StrategySettings::default(),
            store: Box::new(MemorySettingsStore::default()),
            listeners: Vec::new(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.settings.strategy
    }

    pub fn auto_sort_enabled(&self) -> bool {
        self.settings.auto_sort_enabled
    }

    /// Persist a new strategy, then fire change notifications.
    pub fn set_strategy(&mut self, strategy: Strategy) -> Result<()> {
        self.settings.strategy = strategy;
        self.store.save(&self.settings)?;
        for listener in &self.listeners {
            listener(strategy);
        }
        Ok(())
    }

    pub fn set_auto_sort(&mut self, enabled: bool) -> Result<()> {
        self.settings.auto_sort_enabled = enabled;
        self.store.save(&self.settings)
    }

    /// Register a strategy-change callback, fired after each persist.
    pub fn subscribe(&mut self, listener: impl Fn(Strategy) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }
}

impl fmt::Debug for StrategyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyStore")
            .field("settings", &self.settings)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
