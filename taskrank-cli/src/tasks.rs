//! Task-file plumbing for the CLI.
//!
//! The engine does not persist tasks; the CLI reads a JSON array from disk
//! as a stand-in for the application's task store.

use anyhow::{Context, Result, bail};
use std::path::Path;

use taskrank_core::Task;

pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    if !path.exists() {
        bail!("task file not found: {} (pass --file <path>)", path.display());
    }
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let tasks: Vec<Task> =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(tasks)
}
