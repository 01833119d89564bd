//! Drives the core body handler from an upstream byte stream.
//!
//! Every chunk is appended to the response buffer and announced as
//! non-final; the end of the stream is announced as final. The buffered
//! bytes are returned untouched so the proxy can release them downstream.
//!
//! Buffering is bounded by `max_body_bytes`. Past the limit the handler is
//! dropped without a final notification and the remaining stream is handed
//! back to the caller to forward as-is.

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};

use labelstat_core::body::{Action, Outcome, ResponseBodyHandler};
use labelstat_core::error::{ErrorKind, LabelStatError, Result};
use labelstat_core::host::MetricHost;
use labelstat_core::registry::{MetricRegistry, Tags};

/// What the filter did with one upstream body.
#[derive(Debug)]
pub enum Filtered<S> {
    /// Whole body buffered and seen by the handler.
    Complete { body: Bytes, outcome: Outcome },
    /// Upstream sent no body bytes; the handler was never notified.
    Empty,
    /// Limit exceeded: `head` is what was buffered, `rest` is unread.
    Overflow { head: Bytes, rest: S },
}

impl<S> Filtered<S> {
    /// Handler decision, if the handler had any say.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Filtered::Complete { outcome, .. } => Some(outcome.clone()),
            Filtered::Empty => None,
            Filtered::Overflow { .. } => Some(Outcome::Skipped(ErrorKind::BodyTooLarge)),
        }
    }
}

/// Consume `stream`, feeding the handler as bytes arrive.
///
/// A stream error abandons the handler without a final notification, so no
/// counter is touched for that response.
pub async fn filter_stream<H, S, E>(
    registry: &MetricRegistry<H>,
    tags: Option<&Tags>,
    max_body_bytes: usize,
    mut stream: S,
) -> Result<Filtered<S>>
where
    H: MetricHost,
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut handler = ResponseBodyHandler::new(registry, tags);
    let mut buf = BytesMut::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk
            .map_err(|e| LabelStatError::Upstream(format!("response body stream failed: {e}")))?;
        if chunk.is_empty() {
            continue;
        }
        buf.extend_from_slice(&chunk);
        if buf.len() > max_body_bytes {
            let e = LabelStatError::BodyTooLarge(max_body_bytes);
            tracing::warn!(kind = e.kind().as_str(), "{e}, forwarding without inspection");
            return Ok(Filtered::Overflow {
                head: buf.freeze(),
                rest: stream,
            });
        }
        handler.on_response_body(&buf[..], buf.len(), false);
    }

    if buf.is_empty() {
        return Ok(Filtered::Empty);
    }

    if handler.on_response_body(&buf[..], buf.len(), true) == Action::Pause {
        return Err(LabelStatError::Internal("body handler paused after final chunk".into()));
    }

    Ok(Filtered::Complete {
        body: buf.freeze(),
        outcome: handler.outcome().clone(),
    })
}

/// Metric label for a filter outcome.
pub fn outcome_label(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Pending => "pending",
        Outcome::Recorded { .. } => "recorded",
        Outcome::Skipped(kind) => kind.as_str(),
    }
}
