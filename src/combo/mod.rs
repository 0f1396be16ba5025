//! Combination matching — alias resolution, the shortcut registry, live
//! key tracking, and the match filter.

pub mod alias;
pub mod filter;
pub mod registry;
pub mod tracker;

pub use filter::{FilterOutcome, MatchFilter};
pub use registry::{Registry, ShortcutDescriptor, ShortcutKind, ShortcutList, Tip};
pub use tracker::Combination;
