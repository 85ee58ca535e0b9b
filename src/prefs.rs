use crate::filter::FilterState;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Loads the persisted filter toggles and display modes, or the defaults when the
/// file is missing or unreadable.
pub fn load_or_default(path: impl AsRef<Path>) -> FilterState {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<FilterState>(&contents) {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(
                    "[console] Failed to parse {}: {err}. Falling back to default preferences.",
                    path.display()
                );
                FilterState::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => FilterState::default(),
        Err(err) => {
            tracing::warn!("[console] Failed to read {}: {err}. Falling back to default preferences.", path.display());
            FilterState::default()
        }
    }
}

pub fn save(path: impl AsRef<Path>, state: &FilterState) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating preferences directory '{}'", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(state).context("serializing console preferences")?;
    fs::write(path, json).with_context(|| format!("writing console preferences '{}'", path.display()))
}
