//! Key sources — the platform boundary that turns host key events into
//! [`InputEvent`] values for the tooltip session.

pub mod keycode;
pub mod script;

use tokio::sync::mpsc::UnboundedReceiver;

/// Key source error.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("key source already attached")]
    AlreadyAttached,
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A resolved key, as produced by a source adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Shortcut token, e.g. `"ctrl"` or `"k"`.
    pub key: String,
    /// Whether `key` is a modifier.
    pub modifier: bool,
}

impl KeyEvent {
    /// Event for a key already given as a token or host key name.
    pub fn named(name: &str) -> Self {
        let key = keycode::from_name(name);
        Self {
            modifier: keycode::is_modifier(&key),
            key,
        }
    }

    /// Event for a browser-style key code, if the code maps to a key.
    pub fn from_code(code: u32) -> Option<Self> {
        let key = keycode::from_code(code)?;
        Some(Self {
            modifier: keycode::is_modifier(&key),
            key,
        })
    }
}

/// Everything a source can deliver to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    /// The window gained focus; held-key state is unreliable.
    FocusGained,
    /// The window lost focus; key-ups may never arrive.
    FocusLost,
    /// Explicit reset request.
    Reset,
}

/// Result of a successful [`KeySource::attach`] call.
pub struct Attachment {
    /// Receiver for input events, in the order the host produced them.
    pub events: UnboundedReceiver<InputEvent>,
}

/// Delivers key-down/key-up and focus events from some host.
///
/// Adapters own whatever task or thread reads the host and push events on
/// the channel returned by `attach()`. The session reads that channel and
/// is the only consumer.
pub trait KeySource {
    /// Start delivering events.
    fn attach(&mut self) -> Result<Attachment, SourceError>;

    /// Stop delivering events. Calling it when not attached is a no-op.
    fn detach(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_event_flags_modifiers() {
        let ctrl = KeyEvent::named("Control");
        assert_eq!(ctrl.key, "ctrl");
        assert!(ctrl.modifier);

        let k = KeyEvent::named("k");
        assert!(!k.modifier);
    }

    #[test]
    fn lowercase_modifier_names_are_modifiers() {
        let command = KeyEvent::named("command");
        assert_eq!(command.key, "meta");
        assert!(command.modifier);

        let control = KeyEvent::named("control");
        assert_eq!(control.key, "ctrl");
        assert!(control.modifier);
    }

    #[test]
    fn code_event() {
        let meta = KeyEvent::from_code(91).unwrap();
        assert_eq!(meta.key, "meta");
        assert!(meta.modifier);
        assert!(KeyEvent::from_code(0).is_none());
    }
}
