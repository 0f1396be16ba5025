//! Bindings configuration — the JSON file listing shortcuts to display.
//!
//! ```json
//! [
//!   { "keys": "ctrl+k+v", "description": "Open vault" },
//!   { "keys": ["meta+s", "ctrl+s"], "description": "Save", "action": "keydown" }
//! ]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combo::registry::ShortcutList;
use crate::tips::{KeyAction, Tooltips};

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid bindings in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// One entry of the bindings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub keys: ShortcutList,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<KeyAction>,
}

impl Binding {
    fn new(keys: &str, description: &str) -> Self {
        Self {
            keys: keys.into(),
            description: description.to_string(),
            action: None,
        }
    }
}

/// Read and parse a bindings file.
pub fn load(path: &Path) -> Result<Vec<Binding>, ConfigError> {
    let shown = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: shown.clone(),
        source,
    })?;
    let bindings: Vec<Binding> =
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: shown.clone(),
            source,
        })?;

    tracing::debug!(path = %shown, count = bindings.len(), "loaded bindings");
    Ok(bindings)
}

/// Bind every entry, in file order.
pub fn apply(bindings: &[Binding], tooltips: &mut Tooltips) {
    for binding in bindings {
        tooltips.bind_key(binding.keys.clone(), &binding.description, binding.action);
    }
}

/// Demonstration set used when no bindings file is given.
pub fn demo_bindings() -> Vec<Binding> {
    vec![
        Binding::new("a", "A single key; fires at once and never shows a tooltip"),
        Binding::new("A", "Uppercase letter, converted to shift+a"),
        Binding::new("shift+l", "Explicit shift, no automatic conversion"),
        Binding::new("E", "Uppercase letter, converted to shift+e"),
        Binding::new("meta+e", "Meta with a single key"),
        Binding::new("meta+shift+e", "Meta and shift"),
        Binding::new("meta+shift+v", "Only one non-modifier key works alongside meta"),
        Binding::new("meta+alt+.", "Alt and option are the same key"),
        Binding::new("meta+option+2", "Option is an alias for alt"),
        Binding::new("meta+f", "Find"),
        Binding::new("meta+z", "Undo"),
        Binding::new("ctrl+k+v", "Three-key combination"),
        Binding::new("ctrl+0", "Control with a digit"),
        Binding::new("ctrl+M", "Uppercase with a modifier; never matches"),
        Binding::new("ctrl+t", "Toggle tooltips"),
    ]
}
