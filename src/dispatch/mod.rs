//! Tooltip dispatch — hands every matched list to an external renderer.
//!
//! The renderer is optional. Emissions while none is set, or while the
//! dispatch is inactive, are dropped silently.

pub mod sink;

pub use crate::combo::registry::Tip;
use crate::source::KeyEvent;

/// Displays tooltips for the shortcuts currently in progress.
pub trait Renderer {
    /// Show `tips`, replacing whatever was shown before. Called on every
    /// key-down and key-up while active, even when the list is unchanged.
    fn render(&mut self, tips: &[Tip], origin: &KeyEvent);

    /// Remove every displayed tooltip.
    fn clear(&mut self);
}

/// Forwards matched lists to the renderer while active.
#[derive(Default)]
pub struct TooltipDispatch {
    renderer: Option<Box<dyn Renderer + Send>>,
    active: bool,
}

impl TooltipDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the renderer, replacing any previous one.
    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer + Send>) {
        self.renderer = Some(renderer);
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Stop forwarding and tell the renderer to clear. No-op when already
    /// inactive.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn emit(&mut self, tips: &[Tip], origin: &KeyEvent) {
        if !self.active {
            return;
        }
        match self.renderer.as_mut() {
            Some(renderer) => renderer.render(tips, origin),
            None => tracing::trace!(tips = tips.len(), "no renderer set, dropping tips"),
        }
    }

    /// Ask the renderer to clear, regardless of state.
    pub fn clear(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.clear();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// What a [`Recorder`] saw.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Rendered {
        Tips(Vec<String>, String),
        Clear,
    }

    /// Renderer that records calls into a shared log.
    #[derive(Clone, Default)]
    pub struct Recorder {
        pub log: Arc<Mutex<Vec<Rendered>>>,
    }

    impl Recorder {
        pub fn take(&self) -> Vec<Rendered> {
            std::mem::take(&mut *self.log.lock().unwrap())
        }
    }

    impl Renderer for Recorder {
        fn render(&mut self, tips: &[Tip], origin: &KeyEvent) {
            let shortcuts = tips.iter().map(|t| t.shortcut.clone()).collect();
            self.log
                .lock()
                .unwrap()
                .push(Rendered::Tips(shortcuts, origin.key.clone()));
        }

        fn clear(&mut self) {
            self.log.lock().unwrap().push(Rendered::Clear);
        }
    }
}
