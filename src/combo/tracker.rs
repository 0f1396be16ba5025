//! Combination tracking — the live set of pressed keys.
//!
//! Hosts do not reliably deliver key-up for keys released while meta is
//! held, so non-modifier keys pressed under meta are shadowed and dropped
//! together when meta itself is released.

use crate::source::KeyEvent;

const META: &str = "meta";

/// Keys currently held, in press order, without duplicates.
#[derive(Debug, Default, Clone)]
pub struct Combination {
    keys: Vec<String>,
    meta_shadow: Vec<String>,
}

impl Combination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down. Returns `false` if the key was already held.
    pub fn press(&mut self, event: &KeyEvent) -> bool {
        if self.contains(&event.key) {
            return false;
        }

        if self.contains(META) && !event.modifier {
            self.meta_shadow.push(event.key.clone());
        }
        self.keys.push(event.key.clone());
        true
    }

    /// Record a key-up. Returns `false` if the key was not held.
    ///
    /// Releasing meta also force-releases every key pressed while it was
    /// down and forgets the shadow set.
    pub fn release(&mut self, event: &KeyEvent) -> bool {
        let Some(index) = self.position(&event.key) else {
            return false;
        };
        self.keys.remove(index);

        if event.key == META {
            let shadowed = std::mem::take(&mut self.meta_shadow);
            for key in &shadowed {
                self.force_release(key);
            }
            if !shadowed.is_empty() {
                tracing::debug!(keys = ?shadowed, "force-released keys held under meta");
            }
        }
        true
    }

    /// Forget every held key.
    pub fn reset(&mut self) {
        self.keys.clear();
        self.meta_shadow.clear();
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Non-modifier keys pressed while meta was held.
    pub fn meta_shadow(&self) -> &[String] {
        &self.meta_shadow
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    fn force_release(&mut self, key: &str) {
        if let Some(index) = self.position(key) {
            self.keys.remove(index);
        }
    }
}
