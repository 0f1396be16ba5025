//! Renderer sinks — text lines for terminals and MessagePack frames for
//! out-of-process tooltip displays.
//!
//! Both are best-effort: write failures are logged and the session keeps
//! running.

use std::io::Write;

use bytes::Bytes;
use futures::SinkExt;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::codec::{FramedWrite, LengthDelimitedCodec};

use super::{Renderer, Tip};
use crate::source::KeyEvent;

/// Frame sink error.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("encode failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Writes one line per emission.
///
/// Matched keys are bracketed inside each shortcut, e.g.
/// `[ctrl]+[k]+v 67% Open vault`.
pub struct TextSink<W> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "tooltip write failed");
        }
    }
}

impl<W: Write> Renderer for TextSink<W> {
    fn render(&mut self, tips: &[Tip], origin: &KeyEvent) {
        let body = if tips.is_empty() {
            "-".to_string()
        } else {
            tips.iter().map(format_tip).collect::<Vec<_>>().join(" | ")
        };
        self.write_line(&format!("{:>9} {body}", format!("[{}]", origin.key)));
    }

    fn clear(&mut self) {
        self.write_line("-- clear --");
    }
}

/// One tip as text, with pressed keys bracketed.
pub fn format_tip(tip: &Tip) -> String {
    format!(
        "{} {}% {}",
        highlight(&tip.shortcut, &tip.combination),
        tip.relevance,
        tip.description
    )
}

/// Bracket every token of `shortcut` that appears in `pressed`.
pub fn highlight(shortcut: &str, pressed: &[String]) -> String {
    let separator = if shortcut.contains(' ') { " " } else { "+" };
    if shortcut == "+" {
        return shortcut.to_string();
    }
    shortcut
        .split(separator)
        .map(|token| {
            if pressed.iter().any(|p| p == token) {
                format!("[{token}]")
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Message sent to an out-of-process renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Tips { origin: String, tips: Vec<Tip> },
    Clear,
}

/// Renderer that queues [`Frame`]s for [`pump_frames`].
pub struct FrameSink {
    tx: UnboundedSender<Frame>,
}

impl FrameSink {
    /// Create the sink and the receiver to hand to [`pump_frames`].
    pub fn channel() -> (Self, UnboundedReceiver<Frame>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, frame: Frame) {
        if self.tx.send(frame).is_err() {
            tracing::debug!("frame pump gone, dropping frame");
        }
    }
}

impl Renderer for FrameSink {
    fn render(&mut self, tips: &[Tip], origin: &KeyEvent) {
        self.send(Frame::Tips {
            origin: origin.key.clone(),
            tips: tips.to_vec(),
        });
    }

    fn clear(&mut self) {
        self.send(Frame::Clear);
    }
}

/// Write queued frames to `writer` as length-delimited MessagePack until
/// every [`FrameSink`] is dropped. Returns the number of frames written.
pub async fn pump_frames<W>(mut rx: UnboundedReceiver<Frame>, writer: W) -> Result<usize, FrameError>
where
    W: AsyncWrite + Unpin,
{
    let mut framed = FramedWrite::new(writer, LengthDelimitedCodec::new());
    let mut written = 0usize;

    while let Some(frame) = rx.recv().await {
        let encoded = rmp_serde::to_vec_named(&frame)?;
        framed.send(Bytes::from(encoded)).await?;
        written += 1;
    }

    SinkExt::<Bytes>::flush(&mut framed).await?;
    Ok(written)
}
