//! Scripted key source — replays key events from a line-oriented script.
//!
//! Grammar, one event per line:
//!
//! ```text
//! # comment
//! down ctrl        key-down of a token or host key name
//! up Control       key-up
//! down #75         key-down by browser key code
//! focus | blur     focus gained / lost
//! reset
//! ```
//!
//! Malformed lines are logged and skipped; they never stop the replay.
//! That includes lines that are not UTF-8 or longer than [`MAX_LINE`].

use std::sync::LazyLock;

use bytes::BytesMut;
use futures::StreamExt;
use regex::Regex;
use tokio::io::AsyncRead;
use tokio::task::JoinHandle;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Decoder, FramedRead};

use super::{Attachment, InputEvent, KeyEvent, KeySource, SourceError};

static KEY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(down|up)\s+(\S+)$").expect("key line pattern is valid")
});

static KEY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(\d+)$").expect("key code pattern is valid"));

/// Longest script line accepted, in bytes.
pub const MAX_LINE: usize = 4096;

/// One raw line from the script reader.
#[derive(Debug)]
enum ScriptLine {
    Text(String),
    Undecodable,
    TooLong,
}

/// Newline-delimited decoder that reports bad lines as items.
///
/// `FramedRead` stops for good after its decoder returns an error, so only
/// genuine I/O failures are returned as errors here.
struct ScriptCodec {
    inner: AnyDelimiterCodec,
}

impl ScriptCodec {
    fn new() -> Self {
        Self {
            inner: AnyDelimiterCodec::new_with_max_length(
                b"\n".to_vec(),
                b"\n".to_vec(),
                MAX_LINE,
            ),
        }
    }

    fn line(
        chunk: Result<Option<bytes::Bytes>, AnyDelimiterCodecError>,
    ) -> Result<Option<ScriptLine>, std::io::Error> {
        match chunk {
            Ok(Some(bytes)) => Ok(Some(match std::str::from_utf8(&bytes) {
                Ok(text) => ScriptLine::Text(text.trim_end_matches('\r').to_string()),
                Err(_) => ScriptLine::Undecodable,
            })),
            Ok(None) => Ok(None),
            Err(AnyDelimiterCodecError::MaxChunkLengthExceeded) => Ok(Some(ScriptLine::TooLong)),
            Err(AnyDelimiterCodecError::Io(e)) => Err(e),
        }
    }
}

impl Decoder for ScriptCodec {
    type Item = ScriptLine;
    type Error = std::io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<ScriptLine>, std::io::Error> {
        Self::line(self.inner.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<ScriptLine>, std::io::Error> {
        Self::line(self.inner.decode_eof(buf))
    }
}

/// Parse one script line. Blank lines and comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<InputEvent>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    match line {
        "focus" => return Ok(Some(InputEvent::FocusGained)),
        "blur" => return Ok(Some(InputEvent::FocusLost)),
        "reset" => return Ok(Some(InputEvent::Reset)),
        _ => {}
    }

    let caps = KEY_LINE
        .captures(line)
        .ok_or_else(|| format!("unrecognized event {line:?}"))?;
    let key = parse_key(&caps[2])?;

    Ok(Some(match &caps[1] {
        "down" => InputEvent::KeyDown(key),
        _ => InputEvent::KeyUp(key),
    }))
}

fn parse_key(token: &str) -> Result<KeyEvent, String> {
    let Some(caps) = KEY_CODE.captures(token) else {
        return Ok(KeyEvent::named(token));
    };

    let code: u32 = caps[1]
        .parse()
        .map_err(|_| format!("key code {token:?} out of range"))?;
    KeyEvent::from_code(code).ok_or_else(|| format!("key code {code} has no key"))
}

/// Key source reading a script from any async reader.
pub struct ScriptSource<R> {
    reader: Option<R>,
    task: Option<JoinHandle<()>>,
}

impl<R> ScriptSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            task: None,
        }
    }
}

impl<R> KeySource for ScriptSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    /// Spawn the reader task. Must be called inside a tokio runtime; a
    /// script can only be attached once.
    fn attach(&mut self) -> Result<Attachment, SourceError> {
        let reader = self.reader.take().ok_or(SourceError::AlreadyAttached)?;
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut lines = FramedRead::new(reader, ScriptCodec::new());
            let mut number = 0usize;

            while let Some(line) = lines.next().await {
                number += 1;
                let line = match line {
                    Ok(ScriptLine::Text(line)) => line,
                    Ok(ScriptLine::Undecodable) => {
                        tracing::warn!(line = number, "skipping script line that is not UTF-8");
                        continue;
                    }
                    Ok(ScriptLine::TooLong) => {
                        tracing::warn!(
                            line = number,
                            max = MAX_LINE,
                            "skipping over-long script line"
                        );
                        continue;
                    }
                    Err(e) => {
                        tracing::error!(line = number, error = %e, "script read failed");
                        return;
                    }
                };

                match parse_line(&line) {
                    Ok(Some(event)) => {
                        if tx.send(event).is_err() {
                            // Session dropped the receiver.
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(reason) => {
                        let e = SourceError::Parse {
                            line: number,
                            reason,
                        };
                        tracing::warn!(error = %e, "skipping malformed script line");
                    }
                }
            }
            tracing::debug!(lines = number, "script exhausted");
        });

        self.task = Some(task);
        Ok(Attachment { events: rx })
    }

    fn detach(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<R> Drop for ScriptSource<R> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(key: &str) -> InputEvent {
        InputEvent::KeyDown(KeyEvent::named(key))
    }

    fn up(key: &str) -> InputEvent {
        InputEvent::KeyUp(KeyEvent::named(key))
    }

    #[test]
    fn parses_key_lines() {
        assert_eq!(parse_line("down ctrl"), Ok(Some(down("ctrl"))));
        assert_eq!(parse_line("  up   Control "), Ok(Some(up("ctrl"))));
    }

    #[test]
    fn parses_key_codes() {
        assert_eq!(parse_line("down #75"), Ok(Some(down("k"))));
        assert_eq!(parse_line("up #17"), Ok(Some(up("ctrl"))));
    }

    #[test]
    fn hash_alone_is_a_key() {
        assert_eq!(parse_line("down #"), Ok(Some(down("#"))));
    }

    #[test]
    fn focus_and_reset_lines() {
        assert_eq!(parse_line("focus"), Ok(Some(InputEvent::FocusGained)));
        assert_eq!(parse_line("blur"), Ok(Some(InputEvent::FocusLost)));
        assert_eq!(parse_line("reset"), Ok(Some(InputEvent::Reset)));
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# press ctrl"), Ok(None));
    }

    #[test]
    fn malformed_lines_are_errors() {
        assert!(parse_line("press k").is_err());
        assert!(parse_line("down").is_err());
        assert!(parse_line("down #0").is_err());
        assert!(parse_line("down #99999999999").is_err());
    }

    #[tokio::test]
    async fn replays_script_in_order() {
        let script: &[u8] = b"down ctrl\n# comment\nbogus line\ndown k\nup k\nblur\n";
        let mut source = ScriptSource::new(script);
        let mut attachment = source.attach().unwrap();

        let mut events = Vec::new();
        while let Some(event) = attachment.events.recv().await {
            events.push(event);
        }

        assert_eq!(
            events,
            vec![down("ctrl"), down("k"), up("k"), InputEvent::FocusLost]
        );
    }

    async fn replay(script: Vec<u8>) -> Vec<InputEvent> {
        let mut source = ScriptSource::new(std::io::Cursor::new(script));
        let mut attachment = source.attach().unwrap();

        let mut events = Vec::new();
        while let Some(event) = attachment.events.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_skipped() {
        let events = replay(b"down ctrl\n\xff\xfe\ndown k\nup k\n".to_vec()).await;
        assert_eq!(events, vec![down("ctrl"), down("k"), up("k")]);
    }

    #[tokio::test]
    async fn over_long_line_is_skipped() {
        let mut script = b"down ctrl\n".to_vec();
        script.extend(std::iter::repeat_n(b'x', MAX_LINE * 2));
        script.extend_from_slice(b"\ndown k\nup k\n");

        let events = replay(script).await;
        assert_eq!(events, vec![down("ctrl"), down("k"), up("k")]);
    }

    #[tokio::test]
    async fn crlf_and_unterminated_last_line() {
        let events = replay(b"down ctrl\r\nup ctrl".to_vec()).await;
        assert_eq!(events, vec![down("ctrl"), up("ctrl")]);
    }

    #[tokio::test]
    async fn attach_twice_fails() {
        let script: &[u8] = b"";
        let mut source = ScriptSource::new(script);
        let _attachment = source.attach().unwrap();
        assert!(matches!(source.attach(), Err(SourceError::AlreadyAttached)));
    }

    #[tokio::test]
    async fn detach_is_idempotent() {
        let script: &[u8] = b"down a\n";
        let mut source = ScriptSource::new(script);
        source.detach();
        let _attachment = source.attach().unwrap();
        source.detach();
        source.detach();
    }
}
