//! keytip — live tooltips for keyboard shortcuts in progress.
//!
//! As keys go down and up, [`Tooltips`] works out which bound shortcuts
//! the held combination is heading toward and hands that list to a
//! [`Renderer`]. Completing a shortcut locks the display until the keyboard
//! is released; firing the shortcut itself is left to a
//! [`ShortcutDispatcher`].

pub mod combo;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod session;
pub mod source;
pub mod tips;

pub use combo::{ShortcutDescriptor, ShortcutKind, Tip};
pub use dispatch::Renderer;
pub use source::{InputEvent, KeyEvent, KeySource};
pub use tips::{KeyAction, ShortcutDispatcher, Tooltips};
