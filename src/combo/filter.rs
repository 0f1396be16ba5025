//! Match filtering — recomputes which shortcuts the live combination is
//! progressing toward after every key transition.
//!
//! A shortcut is a candidate once every currently pressed key is accounted
//! for by it; its relevance is the share of its own keys that are down.
//! Reaching 100% is an exact match: the filter locks until the keyboard is
//! fully released so the leftover keys of a fired shortcut do not produce
//! spurious partial matches.

use super::alias;
use super::registry::{Registry, ShortcutDescriptor, Tip};
use super::tracker::Combination;

/// What a single filter pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Locked after an exact match; the previous list was left untouched.
    Locked,
    /// The matched list was recomputed.
    Matched,
    /// An exact match fired. The combination was cleared and the lock set.
    Triggered { shortcut: String },
}

/// Matched-list state plus the post-trigger lock.
#[derive(Debug, Default)]
pub struct MatchFilter {
    matched: Vec<Tip>,
    locked: bool,
}

impl MatchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one filter pass against the registry.
    ///
    /// Registry order is preserved in the output; there is no ranking by
    /// relevance. The first exact match abandons the scan and discards the
    /// partial list built so far.
    pub fn filter(&mut self, registry: &mut Registry, combo: &mut Combination) -> FilterOutcome {
        if self.locked {
            if combo.is_empty() {
                self.locked = false;
                tracing::debug!("combination released, match lock cleared");
            }
            return FilterOutcome::Locked;
        }

        self.matched.clear();
        if combo.is_empty() {
            return FilterOutcome::Matched;
        }

        for descriptor in registry.iter_mut() {
            if !score(descriptor, combo.keys()) {
                continue;
            }

            if descriptor.relevance == 100 {
                let shortcut = descriptor.shortcut.clone();
                tracing::debug!(%shortcut, "exact match");
                self.trigger();
                self.matched.clear();
                combo.reset();
                return FilterOutcome::Triggered { shortcut };
            }

            self.matched.push(Tip::from(&*descriptor));
        }

        tracing::trace!(
            combination = ?combo.keys(),
            matches = self.matched.len(),
            "filtered shortcuts"
        );
        FilterOutcome::Matched
    }

    /// Set the lock as though a shortcut had just fired.
    pub fn trigger(&mut self) {
        self.locked = true;
    }

    /// Clear the matched list and the lock.
    pub fn reset(&mut self) {
        self.matched.clear();
        self.locked = false;
    }

    /// Drop the matched list, keeping the lock state.
    pub fn clear_matches(&mut self) {
        self.matched.clear();
    }

    pub fn matches(&self) -> &[Tip] {
        &self.matched
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Score one descriptor against the pressed keys.
///
/// Walks the descriptor's keys, collecting the pressed ones, and stops as
/// soon as the count equals the number of pressed keys. On success the
/// descriptor's `relevance` and `matched` are updated and `true` is
/// returned; otherwise the descriptor is left as it was.
fn score(descriptor: &mut ShortcutDescriptor, pressed: &[String]) -> bool {
    let mut found = 0usize;
    // Pressed positions whose display must show the registered alias.
    let mut aliased: Vec<(usize, &str)> = Vec::new();

    for key in &descriptor.keys {
        if let Some(index) = locate(key, pressed) {
            found += 1;
            if pressed[index] != *key {
                aliased.push((index, key.as_str()));
            }
        }

        if found == pressed.len() {
            let mut combination = pressed.to_vec();
            for (index, key) in aliased {
                combination[index] = key.to_string();
            }

            descriptor.relevance = relevance(found, descriptor.keys.len());
            descriptor.matched = Some(combination);
            return true;
        }
    }

    false
}

/// Position of the pressed key satisfying `registered`, exact spelling
/// first, then through an alias.
fn locate(registered: &str, pressed: &[String]) -> Option<usize> {
    pressed
        .iter()
        .position(|p| p == registered)
        .or_else(|| {
            pressed
                .iter()
                .position(|p| alias::matches_token(registered, p))
        })
}

fn relevance(found: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (found as f64 / total as f64 * 100.0).round().min(100.0) as u8
}
