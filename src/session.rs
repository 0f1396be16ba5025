//! Session loop — the single owner of tooltip state.
//!
//! Every input event is handled to completion, including its emission to
//! the renderer, before the next one is received. Sources on other tasks
//! or threads only ever talk to the session through the event channel.

use tokio::sync::mpsc::UnboundedReceiver;

use crate::source::{InputEvent, KeySource, SourceError};
use crate::tips::Tooltips;

/// Drive `tooltips` from `events` until the channel closes, then hand the
/// state back.
pub async fn run(mut tooltips: Tooltips, mut events: UnboundedReceiver<InputEvent>) -> Tooltips {
    let mut handled = 0usize;
    while let Some(event) = events.recv().await {
        tooltips.handle(&event);
        handled += 1;
    }
    tracing::debug!(events = handled, "input channel closed");
    tooltips
}

/// Attach `source`, activate `tooltips`, and run until the source is
/// exhausted. The source is detached and tooltips deactivated on return.
pub async fn run_source<S>(mut tooltips: Tooltips, source: &mut S) -> Result<Tooltips, SourceError>
where
    S: KeySource,
{
    let attachment = source.attach()?;
    tooltips.activate();

    let mut tooltips = run(tooltips, attachment.events).await;

    source.detach();
    tooltips.deactivate();
    Ok(tooltips)
}
