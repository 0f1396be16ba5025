//! Shortcut registry — insertion-ordered descriptors of bound shortcuts.
//!
//! Entries are appended at bind time and never individually removed.
//! Binding the same string twice yields two descriptors that are matched
//! independently.

use serde::{Deserialize, Serialize};

use super::alias;

/// How the keys of a shortcut are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutKind {
    /// All keys held at once (`ctrl+k`).
    Combination,
    /// Keys pressed one after another (`g i`).
    Sequence,
}

/// One or several shortcut strings sharing a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShortcutList {
    One(String),
    Many(Vec<String>),
}

impl ShortcutList {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(s) => std::slice::from_ref(s),
            Self::Many(v) => v,
        }
    }
}

impl From<&str> for ShortcutList {
    fn from(s: &str) -> Self {
        Self::One(s.to_string())
    }
}

impl From<String> for ShortcutList {
    fn from(s: String) -> Self {
        Self::One(s)
    }
}

impl From<Vec<String>> for ShortcutList {
    fn from(v: Vec<String>) -> Self {
        Self::Many(v)
    }
}

impl From<&[&str]> for ShortcutList {
    fn from(v: &[&str]) -> Self {
        Self::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ShortcutList {
    fn from(v: [&str; N]) -> Self {
        Self::from(&v[..])
    }
}

/// A bound shortcut and its live match state.
///
/// Everything except `relevance` and `matched` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutDescriptor {
    /// Normalized key tokens, e.g. `["ctrl", "k", "v"]`.
    pub keys: Vec<String>,
    /// Canonical display text after normalization.
    pub shortcut: String,
    /// The string as the user supplied it, used to re-trigger the action.
    pub unmodified: String,
    pub kind: ShortcutKind,
    pub description: String,
    /// Percentage (0–100) of `keys` satisfied by the live combination.
    pub relevance: u8,
    /// Pressed keys satisfying this shortcut, in press order, shown with
    /// the registered spelling of aliased keys.
    pub matched: Option<Vec<String>>,
}

impl ShortcutDescriptor {
    pub fn new(raw: &str, description: &str) -> Self {
        let resolved = alias::resolve(raw);
        Self {
            keys: resolved.keys,
            shortcut: resolved.text,
            unmodified: raw.to_string(),
            kind: resolved.kind,
            description: description.to_string(),
            relevance: 0,
            matched: None,
        }
    }
}

/// Renderer-facing snapshot of a matched shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    pub shortcut: String,
    pub unmodified: String,
    pub description: String,
    pub relevance: u8,
    pub combination: Vec<String>,
}

impl From<&ShortcutDescriptor> for Tip {
    fn from(d: &ShortcutDescriptor) -> Self {
        Self {
            shortcut: d.shortcut.clone(),
            unmodified: d.unmodified.clone(),
            description: d.description.clone(),
            relevance: d.relevance,
            combination: d.matched.clone().unwrap_or_default(),
        }
    }
}

/// Insertion-ordered store of shortcut descriptors.
#[derive(Debug, Default)]
pub struct Registry {
    shortcuts: Vec<ShortcutDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one descriptor per shortcut string, all sharing `description`.
    ///
    /// No validation is done; a malformed string simply never matches.
    pub fn register(&mut self, shortcuts: impl Into<ShortcutList>, description: &str) {
        let shortcuts = shortcuts.into();
        for raw in shortcuts.as_slice() {
            let descriptor = ShortcutDescriptor::new(raw, description);
            tracing::debug!(
                shortcut = %descriptor.shortcut,
                keys = ?descriptor.keys,
                kind = ?descriptor.kind,
                "registered shortcut"
            );
            self.shortcuts.push(descriptor);
        }
    }

    /// Drop every descriptor.
    pub fn clear(&mut self) {
        self.shortcuts.clear();
    }

    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShortcutDescriptor> {
        self.shortcuts.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, ShortcutDescriptor> {
        self.shortcuts.iter_mut()
    }
}
