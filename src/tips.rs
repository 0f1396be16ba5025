//! Live shortcut tooltips — the owned matcher that ties the registry,
//! combination tracker, match filter and dispatch together.
//!
//! [`Tooltips`] is driven one [`InputEvent`] at a time and is the single
//! owner of all live state. Actual shortcut invocation belongs to an
//! external [`ShortcutDispatcher`]; this type only decides what to show.

use serde::{Deserialize, Serialize};

use crate::combo::filter::{FilterOutcome, MatchFilter};
use crate::combo::registry::{Registry, ShortcutList, Tip};
use crate::combo::tracker::Combination;
use crate::dispatch::{Renderer, TooltipDispatch};
use crate::source::{InputEvent, KeyEvent};

/// Which key phase a bound action fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAction {
    KeyPress,
    KeyDown,
    KeyUp,
}

/// The shortcut-detection library that actually fires bound actions.
pub trait ShortcutDispatcher {
    /// Bind shortcut strings, exactly as the user wrote them.
    fn bind(&mut self, shortcuts: &[String], action: Option<KeyAction>);

    /// Fire the action bound to `shortcut` as though it had been typed.
    fn trigger(&mut self, shortcut: &str);

    /// Forget every binding.
    fn reset(&mut self);
}

/// Dispatcher that does nothing, for display-only use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDispatcher;

impl ShortcutDispatcher for NoDispatcher {
    fn bind(&mut self, _shortcuts: &[String], _action: Option<KeyAction>) {}
    fn trigger(&mut self, _shortcut: &str) {}
    fn reset(&mut self) {}
}

/// Live tooltip state for one keyboard focus target.
pub struct Tooltips {
    registry: Registry,
    combo: Combination,
    filter: MatchFilter,
    dispatch: TooltipDispatch,
    dispatcher: Box<dyn ShortcutDispatcher + Send>,
}

impl Default for Tooltips {
    fn default() -> Self {
        Self::new()
    }
}

impl Tooltips {
    /// Inactive tooltips with no renderer and no dispatcher.
    pub fn new() -> Self {
        Self::with_dispatcher(Box::new(NoDispatcher))
    }

    pub fn with_dispatcher(dispatcher: Box<dyn ShortcutDispatcher + Send>) -> Self {
        Self {
            registry: Registry::new(),
            combo: Combination::new(),
            filter: MatchFilter::new(),
            dispatch: TooltipDispatch::new(),
            dispatcher,
        }
    }

    /// Register shortcuts for display and bind them with the dispatcher.
    pub fn bind_key(
        &mut self,
        shortcuts: impl Into<ShortcutList>,
        description: &str,
        action: Option<KeyAction>,
    ) {
        let shortcuts = shortcuts.into();
        self.dispatcher.bind(shortcuts.as_slice(), action);
        self.registry.register(shortcuts, description);
    }

    /// Forget every shortcut, here and in the dispatcher.
    pub fn unbind_all(&mut self) {
        self.registry.clear();
        self.filter.clear_matches();
        self.dispatcher.reset();
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer + Send>) {
        self.dispatch.set_renderer(renderer);
    }

    /// Start reacting to key events. Held-key state from before activation
    /// is discarded since its key-ups were never observed.
    pub fn activate(&mut self) {
        if self.dispatch.is_active() {
            return;
        }
        self.reset();
        self.dispatch.activate();
        tracing::info!(shortcuts = self.registry.len(), "tooltips on");
    }

    /// Stop reacting to key events and clear displayed tooltips.
    pub fn deactivate(&mut self) {
        if !self.dispatch.is_active() {
            return;
        }
        self.dispatch.deactivate();
        tracing::info!("tooltips off");
    }

    /// Flip the power state, returning the new state.
    pub fn toggle(&mut self) -> bool {
        if self.is_active() {
            self.deactivate();
        } else {
            self.activate();
        }
        self.is_active()
    }

    pub fn is_active(&self) -> bool {
        self.dispatch.is_active()
    }

    /// Forget held keys, the matched list, and the match lock.
    pub fn reset(&mut self) {
        self.combo.reset();
        self.filter.reset();
    }

    /// Behave as though a shortcut just fired: optionally reset, then
    /// suppress matching until the keyboard is fully released.
    pub fn trigger(&mut self, reset: bool) {
        if reset {
            self.reset();
        }
        self.filter.trigger();
    }

    /// A tooltip was picked by the user: fire its shortcut and clear the
    /// display.
    pub fn select(&mut self, tip: &Tip) {
        tracing::info!(shortcut = %tip.shortcut, "tooltip selected");
        self.trigger(true);
        self.dispatcher.trigger(&tip.unmodified);
        self.dispatch.clear();
    }

    /// Process one input event to completion.
    pub fn handle(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.key_down(key),
            InputEvent::KeyUp(key) => self.key_up(key),
            InputEvent::FocusGained | InputEvent::FocusLost | InputEvent::Reset => {
                tracing::debug!(?event, "resetting combination");
                self.reset();
            }
        }
    }

    pub fn key_down(&mut self, key: &KeyEvent) {
        if !self.is_active() {
            return;
        }
        self.combo.press(key);
        self.refresh(key);
    }

    pub fn key_up(&mut self, key: &KeyEvent) {
        if !self.is_active() {
            return;
        }
        self.combo.release(key);
        self.refresh(key);
    }

    fn refresh(&mut self, origin: &KeyEvent) {
        match self.filter.filter(&mut self.registry, &mut self.combo) {
            FilterOutcome::Triggered { shortcut } => {
                tracing::info!(%shortcut, "shortcut completed");
            }
            FilterOutcome::Locked | FilterOutcome::Matched => {}
        }
        tracing::debug!(
            key = %origin.key,
            combination = ?self.combo.keys(),
            tips = self.filter.matches().len(),
            "key transition"
        );
        self.dispatch.emit(self.filter.matches(), origin);
    }

    /// Tips from the most recent filter pass.
    pub fn matches(&self) -> &[Tip] {
        self.filter.matches()
    }

    /// Keys currently held, in press order.
    pub fn combination(&self) -> &[String] {
        self.combo.keys()
    }

    pub fn meta_shadow(&self) -> &[String] {
        self.combo.meta_shadow()
    }

    pub fn is_locked(&self) -> bool {
        self.filter.is_locked()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::dispatch::testing::{Recorder, Rendered};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Bind(Vec<String>, Option<KeyAction>),
        Trigger(String),
        Reset,
    }

    #[derive(Clone, Default)]
    struct Calls(Arc<Mutex<Vec<Call>>>);

    impl ShortcutDispatcher for Calls {
        fn bind(&mut self, shortcuts: &[String], action: Option<KeyAction>) {
            self.0
                .lock()
                .unwrap()
                .push(Call::Bind(shortcuts.to_vec(), action));
        }
        fn trigger(&mut self, shortcut: &str) {
            self.0.lock().unwrap().push(Call::Trigger(shortcut.into()));
        }
        fn reset(&mut self) {
            self.0.lock().unwrap().push(Call::Reset);
        }
    }

    fn active(bindings: &[&str]) -> (Tooltips, Recorder) {
        let recorder = Recorder::default();
        let mut tips = Tooltips::new();
        for b in bindings {
            tips.bind_key(*b, b, None);
        }
        tips.set_renderer(Box::new(recorder.clone()));
        tips.activate();
        (tips, recorder)
    }

    fn down(tips: &mut Tooltips, key: &str) {
        tips.handle(&InputEvent::KeyDown(KeyEvent::named(key)));
    }

    fn up(tips: &mut Tooltips, key: &str) {
        tips.handle(&InputEvent::KeyUp(KeyEvent::named(key)));
    }

    #[test]
    fn every_transition_is_rendered() {
        let (mut tips, recorder) = active(&["ctrl+k+v"]);
        down(&mut tips, "ctrl");
        up(&mut tips, "ctrl");

        assert_eq!(
            recorder.take(),
            vec![
                Rendered::Tips(vec!["ctrl+k+v".into()], "ctrl".into()),
                Rendered::Tips(vec![], "ctrl".into()),
            ]
        );
    }

    #[test]
    fn inactive_tooltips_ignore_keys() {
        let recorder = Recorder::default();
        let mut tips = Tooltips::new();
        tips.bind_key("ctrl+t", "Toggle", None);
        tips.set_renderer(Box::new(recorder.clone()));

        down(&mut tips, "ctrl");
        assert!(tips.combination().is_empty());
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn exact_match_renders_empty_and_locks() {
        let (mut tips, recorder) = active(&["ctrl+k+v", "ctrl+0"]);
        down(&mut tips, "ctrl");
        down(&mut tips, "k");
        recorder.take();

        down(&mut tips, "v");
        assert!(tips.combination().is_empty());
        assert!(tips.is_locked());
        assert_eq!(recorder.take(), vec![Rendered::Tips(vec![], "v".into())]);

        // Still physically holding ctrl; pressing 0 must not show tips.
        down(&mut tips, "0");
        assert!(tips.matches().is_empty());

        up(&mut tips, "0");
        assert!(!tips.is_locked());
    }

    #[test]
    fn meta_release_drops_shadowed_keys() {
        let (mut tips, _recorder) = active(&["meta+shift+v"]);
        down(&mut tips, "meta");
        down(&mut tips, "z");
        assert_eq!(tips.meta_shadow(), ["z"]);

        up(&mut tips, "meta");
        assert!(tips.combination().is_empty());
        assert!(tips.meta_shadow().is_empty());
    }

    #[test]
    fn focus_changes_reset() {
        let (mut tips, recorder) = active(&["ctrl+k+v"]);
        down(&mut tips, "ctrl");
        down(&mut tips, "k");
        recorder.take();

        tips.handle(&InputEvent::FocusLost);
        assert!(tips.combination().is_empty());
        assert!(tips.matches().is_empty());
        // Reset does not render.
        assert!(recorder.take().is_empty());

        down(&mut tips, "meta");
        down(&mut tips, "q");
        tips.handle(&InputEvent::FocusGained);
        assert!(tips.combination().is_empty());
        assert!(tips.meta_shadow().is_empty());
    }

    #[test]
    fn reset_from_any_state() {
        let (mut tips, _recorder) = active(&["ctrl+t"]);
        down(&mut tips, "ctrl");
        down(&mut tips, "t");
        down(&mut tips, "meta");
        down(&mut tips, "x");
        tips.reset();

        assert!(tips.combination().is_empty());
        assert!(tips.meta_shadow().is_empty());
        assert!(tips.matches().is_empty());
        assert!(!tips.is_locked());
    }

    #[test]
    fn deactivate_clears_renderer_and_is_idempotent() {
        let (mut tips, recorder) = active(&["ctrl+t"]);
        tips.deactivate();
        tips.deactivate();
        assert_eq!(recorder.take(), vec![Rendered::Clear]);
        assert!(!tips.is_active());
    }

    #[test]
    fn toggle_flips_power() {
        let (mut tips, _recorder) = active(&[]);
        assert!(!tips.toggle());
        assert!(tips.toggle());
    }

    #[test]
    fn activate_discards_stale_keys() {
        let (mut tips, _recorder) = active(&["ctrl+k+v"]);
        down(&mut tips, "ctrl");
        tips.deactivate();
        tips.activate();
        assert!(tips.combination().is_empty());
    }

    #[test]
    fn bind_key_forwards_to_dispatcher() {
        let calls = Calls::default();
        let mut tips = Tooltips::with_dispatcher(Box::new(calls.clone()));
        tips.bind_key(["meta+s", "ctrl+s"], "Save", Some(KeyAction::KeyDown));

        assert_eq!(tips.registry().len(), 2);
        assert_eq!(
            *calls.0.lock().unwrap(),
            vec![Call::Bind(
                vec!["meta+s".into(), "ctrl+s".into()],
                Some(KeyAction::KeyDown)
            )]
        );
    }

    #[test]
    fn select_fires_unmodified_shortcut_and_clears() {
        let calls = Calls::default();
        let recorder = Recorder::default();
        let mut tips = Tooltips::with_dispatcher(Box::new(calls.clone()));
        tips.bind_key("E", "Shifted e", None);
        tips.bind_key("shift+l", "Shift l", None);
        tips.set_renderer(Box::new(recorder.clone()));
        tips.activate();

        down(&mut tips, "shift");
        let tip = tips.matches()[0].clone();
        assert_eq!(tip.shortcut, "shift+e");
        recorder.take();

        tips.select(&tip);
        assert!(tips.combination().is_empty());
        assert!(tips.is_locked());
        assert_eq!(recorder.take(), vec![Rendered::Clear]);
        assert_eq!(
            calls.0.lock().unwrap().last(),
            Some(&Call::Trigger("E".into()))
        );
    }

    #[test]
    fn unbind_all_empties_registry() {
        let calls = Calls::default();
        let mut tips = Tooltips::with_dispatcher(Box::new(calls.clone()));
        tips.bind_key("ctrl+t", "Toggle", None);
        tips.activate();
        down(&mut tips, "ctrl");
        assert_eq!(tips.matches().len(), 1);

        tips.unbind_all();
        assert!(tips.registry().is_empty());
        assert!(tips.matches().is_empty());
        assert_eq!(calls.0.lock().unwrap().last(), Some(&Call::Reset));

        down(&mut tips, "t");
        assert!(tips.matches().is_empty());
    }

    #[test]
    fn option_alias_round_trips_for_display() {
        let (mut tips, _recorder) = active(&["meta+option+2"]);
        down(&mut tips, "Meta");
        down(&mut tips, "Alt");
        assert_eq!(tips.matches()[0].combination, vec!["meta", "option"]);
    }
}
