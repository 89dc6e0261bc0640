//! Host navigation events.
//!
//! # Responsibilities
//! - Represent the host router's lifecycle events
//! - Collapse end / cancel / error into one terminal notification
//! - Parse the line format used by the replay binary
//! - Forward replay input to the observer service
//!
//! # Line Format
//! ```text
//! start  <id> <url>
//! end    <id> <url>
//! cancel <id> <url>
//! error  <id> <url>
//! ```

use std::fmt;
use std::io;
use std::str::FromStr;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::observer::events::Notification;
use crate::routing::group::NavigationId;

/// A lifecycle event as reported by the host router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Start { id: NavigationId, url: String },
    End { id: NavigationId, url: String },
    Cancel { id: NavigationId, url: String },
    Error { id: NavigationId, url: String },
}

impl NavigationEvent {
    pub fn id(&self) -> NavigationId {
        match self {
            Self::Start { id, .. }
            | Self::End { id, .. }
            | Self::Cancel { id, .. }
            | Self::Error { id, .. } => *id,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Start { url, .. }
            | Self::End { url, .. }
            | Self::Cancel { url, .. }
            | Self::Error { url, .. } => url,
        }
    }

    /// Convert to an observer notification, stamping starts with `timestamp`.
    pub fn into_notification(self, timestamp: u64) -> Notification {
        match self {
            Self::Start { id, url } => Notification::Start { timestamp, url, id },
            Self::End { id, url } | Self::Cancel { id, url } | Self::Error { id, url } => {
                Notification::Terminal { url, id }
            }
        }
    }
}

/// Error parsing a navigation event line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEventError {
    #[error("empty event line")]
    Empty,
    #[error("unknown event kind {0:?} (expected start, end, cancel or error)")]
    UnknownKind(String),
    #[error("missing navigation id")]
    MissingId,
    #[error("invalid navigation id {0:?}")]
    InvalidId(String),
    #[error("missing url")]
    MissingUrl,
    #[error("unexpected trailing input {0:?}")]
    Trailing(String),
}

impl FromStr for NavigationEvent {
    type Err = ParseEventError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let kind = parts.next().ok_or(ParseEventError::Empty)?;
        let raw_id = parts.next().ok_or(ParseEventError::MissingId)?;
        let id = raw_id
            .parse::<NavigationId>()
            .map_err(|_| ParseEventError::InvalidId(raw_id.to_string()))?;
        let url = parts.next().ok_or(ParseEventError::MissingUrl)?.to_string();
        if let Some(extra) = parts.next() {
            return Err(ParseEventError::Trailing(extra.to_string()));
        }

        match kind.to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start { id, url }),
            "end" => Ok(Self::End { id, url }),
            "cancel" => Ok(Self::Cancel { id, url }),
            "error" => Ok(Self::Error { id, url }),
            _ => Err(ParseEventError::UnknownKind(kind.to_string())),
        }
    }
}

impl fmt::Display for NavigationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Start { .. } => "start",
            Self::End { .. } => "end",
            Self::Cancel { .. } => "cancel",
            Self::Error { .. } => "error",
        };
        write!(f, "{} {} {}", kind, self.id(), self.url())
    }
}

/// Read replay lines from `input` and forward every parsed event to `tx`.
///
/// Blank lines and `#` comments are ignored. Malformed lines, including
/// invalid UTF-8, are logged and skipped. Stops at end of input or when the
/// receiver is gone, returning the number of events forwarded. A read error
/// ends the input and is returned.
pub async fn forward_lines<R>(mut input: R, tx: &mpsc::Sender<NavigationEvent>) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    let mut forwarded = 0usize;

    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::error!(line = line_no + 1, error = %e, "Failed to read event input");
                return Err(e);
            }
        }
        line_no += 1;

        let text = String::from_utf8_lossy(&buf);
        let line = text.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<NavigationEvent>() {
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    tracing::debug!("Observer service gone, stopping input");
                    break;
                }
                forwarded += 1;
            }
            Err(e) => tracing::warn!(line = line_no, error = %e, "Skipping malformed event line"),
        }
    }

    tracing::debug!(lines = line_no, forwarded, "Input closed");
    Ok(forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, AsyncReadExt, BufReader, ReadBuf};

    /// Reader that fails on every read.
    struct Broken;

    impl AsyncRead for Broken {
        fn poll_read(self: Pin<&mut Self>, _: &mut Context<'_>, _: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed abruptly")))
        }
    }

    fn drain(rx: &mut mpsc::Receiver<NavigationEvent>) -> Vec<NavigationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_forward_skips_blank_comment_and_malformed_lines() {
        let input: &[u8] = b"# replay\n\nstart 1 /a\nbogus line\n  \r\nend 1 /a\r\n";
        let (tx, mut rx) = mpsc::channel(16);

        assert_eq!(forward_lines(input, &tx).await.unwrap(), 2);
        assert_eq!(
            drain(&mut rx),
            vec![
                NavigationEvent::Start { id: 1, url: "/a".into() },
                NavigationEvent::End { id: 1, url: "/a".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_forward_continues_past_invalid_utf8() {
        let input: &[u8] = b"start 1 /a\n\xff\xfe bad\nstart 2 /b\n";
        let (tx, mut rx) = mpsc::channel(16);

        assert_eq!(forward_lines(input, &tx).await.unwrap(), 2);
        let ids: Vec<_> = drain(&mut rx).iter().map(NavigationEvent::id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_forward_handles_missing_trailing_newline() {
        let input: &[u8] = b"start 7 /last";
        let (tx, mut rx) = mpsc::channel(16);

        assert_eq!(forward_lines(input, &tx).await.unwrap(), 1);
        assert_eq!(drain(&mut rx), vec![NavigationEvent::Start { id: 7, url: "/last".into() }]);
    }

    #[tokio::test]
    async fn test_forward_returns_read_error_after_delivered_lines() {
        let input = BufReader::new((&b"start 1 /a\n"[..]).chain(Broken));
        let (tx, mut rx) = mpsc::channel(16);

        let err = forward_lines(input, &tx).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(drain(&mut rx), vec![NavigationEvent::Start { id: 1, url: "/a".into() }]);
    }

    #[tokio::test]
    async fn test_forward_stops_when_receiver_dropped() {
        let input: &[u8] = b"start 1 /a\nstart 2 /b\n";
        let (tx, rx) = mpsc::channel(16);
        drop(rx);

        assert_eq!(forward_lines(input, &tx).await.unwrap(), 0);
    }

    #[test]
    fn test_parse_all_kinds() {
        assert_eq!(
            "start 1 /a".parse::<NavigationEvent>().unwrap(),
            NavigationEvent::Start { id: 1, url: "/a".into() }
        );
        assert_eq!(
            "END 2 /b?x=1".parse::<NavigationEvent>().unwrap(),
            NavigationEvent::End { id: 2, url: "/b?x=1".into() }
        );
        assert!(matches!("cancel 3 /c".parse::<NavigationEvent>(), Ok(NavigationEvent::Cancel { id: 3, .. })));
        assert!(matches!("  error   4  /d ".parse::<NavigationEvent>(), Ok(NavigationEvent::Error { id: 4, .. })));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<NavigationEvent>(), Err(ParseEventError::Empty));
        assert_eq!("start".parse::<NavigationEvent>(), Err(ParseEventError::MissingId));
        assert_eq!(
            "start x /a".parse::<NavigationEvent>(),
            Err(ParseEventError::InvalidId("x".into()))
        );
        assert_eq!("start 1".parse::<NavigationEvent>(), Err(ParseEventError::MissingUrl));
        assert_eq!(
            "resolve 1 /a".parse::<NavigationEvent>(),
            Err(ParseEventError::UnknownKind("resolve".into()))
        );
        assert_eq!(
            "end 1 /a more".parse::<NavigationEvent>(),
            Err(ParseEventError::Trailing("more".into()))
        );
    }

    #[test]
    fn test_terminal_kinds_collapse() {
        for event in [
            NavigationEvent::End { id: 1, url: "/a".into() },
            NavigationEvent::Cancel { id: 1, url: "/a".into() },
            NavigationEvent::Error { id: 1, url: "/a".into() },
        ] {
            assert_eq!(
                event.into_notification(99),
                Notification::Terminal { url: "/a".into(), id: 1 }
            );
        }
    }

    #[test]
    fn test_start_carries_timestamp() {
        let event = NavigationEvent::Start { id: 5, url: "/a".into() };
        assert_eq!(event.to_string(), "start 5 /a");
        assert_eq!(
            event.into_notification(1234),
            Notification::Start { timestamp: 1234, url: "/a".into(), id: 5 }
        );
    }
}
