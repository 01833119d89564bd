//! Per-response body handler.
//!
//! The host announces body bytes as they arrive: zero or more non-final
//! notifications followed by one final notification. The handler pauses the
//! response until the final one, then reads the whole body once, picks the
//! winning label and bumps its counter.
//!
//! State machine: `Accumulating -> Complete`. `Complete` is terminal; any
//! notification after it is ignored and the response is released.
//!
//! Nothing here can fail the response. Read, parse and metric errors are
//! logged and the response continues unmodified.

use crate::error::{ErrorKind, Result};
use crate::host::{BodySource, MetricHost};
use crate::protocol::predictions::{extract_prediction_set, select_winner};
use crate::registry::{MetricRegistry, Tags};

/// Pipeline control signal returned to the host after each notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Withhold the response until more body arrives.
    Pause,
    /// Release the response downstream.
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    Accumulating,
    Complete,
}

/// What the handler decided for this response.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Final notification not seen yet.
    Pending,
    /// Counter for `label` was incremented.
    Recorded { label: String, score: f64 },
    /// No counter was touched.
    Skipped(ErrorKind),
}

pub struct ResponseBodyHandler<'r, H> {
    registry: &'r MetricRegistry<H>,
    tags: Option<&'r Tags>,
    state: BodyState,
    body_size: usize,
    outcome: Outcome,
}

impl<'r, H: MetricHost> ResponseBodyHandler<'r, H> {
    pub fn new(registry: &'r MetricRegistry<H>, tags: Option<&'r Tags>) -> Self {
        Self {
            registry,
            tags,
            state: BodyState::Accumulating,
            body_size: 0,
            outcome: Outcome::Pending,
        }
    }

    pub fn state(&self) -> BodyState {
        self.state
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Cumulative body size announced so far.
    pub fn body_size(&self) -> usize {
        self.body_size
    }

    /// Handle one body-availability notification.
    ///
    /// `body_size` is the total number of bytes available so far, not the
    /// size of the newest chunk.
    pub fn on_response_body<S: BodySource + ?Sized>(
        &mut self,
        source: &S,
        body_size: usize,
        end_of_stream: bool,
    ) -> Action {
        if self.state == BodyState::Complete {
            return Action::Continue;
        }
        self.body_size = body_size;
        if !end_of_stream {
            tracing::debug!(body_size, "waiting for end of response body");
            return Action::Pause;
        }

        self.state = BodyState::Complete;
        self.outcome = match self.record(source) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(kind = e.kind().as_str(), "{e}");
                Outcome::Skipped(e.kind())
            }
        };
        Action::Continue
    }

    fn record<S: BodySource + ?Sized>(&self, source: &S) -> Result<Outcome> {
        let body = source.read_body(0, self.body_size)?;
        let set = extract_prediction_set(&body)?;
        let winner = select_winner(&set);

        if winner.is_established() {
            tracing::info!(label = %winner.label, score = winner.score, "highest label");
        }

        let handle = self.registry.get_or_create(&winner.label, self.tags)?;
        self.registry.increment(handle, 1)?;

        Ok(Outcome::Recorded {
            label: winner.label,
            score: winner.score,
        })
    }
}
