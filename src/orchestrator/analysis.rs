use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::annotation::{ResultView, ViewProfile};
use crate::domain::{AnalysisMode, AnalysisOutcome};
use crate::error::AnalysisError;
use crate::service::{validate_input, InferenceClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Requesting,
    Succeeded,
    Failed,
}

/// Handle for one dispatched request. Only the most recently issued ticket
/// can deliver a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub sequence: u64,
    pub mode: AnalysisMode,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request was issued, or this one was cancelled.
    Discarded,
}

/// A successful analysis together with the text it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRecord {
    pub sequence: u64,
    pub source: String,
    pub outcome: AnalysisOutcome,
}

impl AnalysisRecord {
    pub fn view(&self, profile: ViewProfile) -> ResultView<'_> {
        ResultView::build(&self.source, &self.outcome, profile)
    }
}

/// Validates input, issues exactly one request per action and keeps the
/// latest result or error.
pub struct AnalysisOrchestrator<C: InferenceClient> {
    client: Arc<C>,
    phase: Phase,
    busy: bool,
    issued: u64,
    record: Option<AnalysisRecord>,
    error: Option<AnalysisError>,
}

impl<C: InferenceClient> AnalysisOrchestrator<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            phase: Phase::Idle,
            busy: false,
            issued: 0,
            record: None,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn record(&self) -> Option<&AnalysisRecord> {
        self.record.as_ref()
    }

    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        self.record.as_ref().map(|record| &record.outcome)
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        self.error.as_ref()
    }

    pub fn view(&self, profile: ViewProfile) -> Option<ResultView<'_>> {
        self.record.as_ref().map(|record| record.view(profile))
    }

    /// Runs the whole cycle synchronously: validate, request, store.
    pub fn submit(
        &mut self,
        mode: AnalysisMode,
        text: &str,
    ) -> Result<&AnalysisRecord, AnalysisError> {
        let ticket = self.begin(mode, text)?;
        let response = self.dispatch(&ticket);
        self.complete(ticket, response);
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        self.record.as_ref().ok_or_else(|| AnalysisError::Transport {
            cause: "response was discarded".to_string(),
        })
    }

    /// Validates and, if the input passes, marks a request as in flight.
    /// Any previous result or error is dropped.
    pub fn begin(
        &mut self,
        mode: AnalysisMode,
        text: &str,
    ) -> Result<RequestTicket, AnalysisError> {
        if self.busy {
            debug!(%mode, "request rejected, another one is in flight");
            return Err(AnalysisError::Busy);
        }

        self.phase = Phase::Validating;
        self.record = None;
        self.error = None;

        if let Err(err) = validate_input(mode, text) {
            debug!(%mode, reason = %err, "input rejected before dispatch");
            self.phase = Phase::Failed;
            self.error = Some(err.clone());
            return Err(err);
        }

        self.issued += 1;
        self.busy = true;
        self.phase = Phase::Requesting;
        Ok(RequestTicket {
            sequence: self.issued,
            mode,
            text: text.to_string(),
        })
    }

    /// Performs the network call for `ticket`. Does not touch orchestrator
    /// state, so it may run away from the owner.
    pub fn dispatch(&self, ticket: &RequestTicket) -> Result<AnalysisOutcome> {
        info!(mode = %ticket.mode, sequence = ticket.sequence, "dispatching analysis");
        self.client.request(ticket.mode, &ticket.text)
    }

    /// Applies the response for `ticket` unless a newer request superseded it.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        response: Result<AnalysisOutcome>,
    ) -> Completion {
        if ticket.sequence != self.issued || !self.busy {
            warn!(
                sequence = ticket.sequence,
                latest = self.issued,
                "discarding stale analysis response"
            );
            return Completion::Discarded;
        }

        self.busy = false;
        match response {
            Ok(outcome) => {
                if let AnalysisOutcome::Entities(result) = &outcome {
                    info!(
                        sequence = ticket.sequence,
                        entities = result.entity_count(),
                        sentences = result.sentences.len(),
                        "analysis succeeded"
                    );
                } else {
                    info!(
                        sequence = ticket.sequence,
                        empty = outcome.is_empty(),
                        "prediction succeeded"
                    );
                }
                self.record = Some(AnalysisRecord {
                    sequence: ticket.sequence,
                    source: ticket.text,
                    outcome,
                });
                self.phase = Phase::Succeeded;
            }
            Err(cause) => {
                let err = AnalysisError::transport(&cause);
                warn!(
                    sequence = ticket.sequence,
                    cause = err.cause().unwrap_or_default(),
                    "analysis failed"
                );
                self.error = Some(err);
                self.phase = Phase::Failed;
            }
        }
        Completion::Applied
    }

    /// Abandons the in-flight request; its response will be discarded.
    pub fn cancel(&mut self) {
        if self.busy {
            debug!(sequence = self.issued, "cancelling in-flight analysis");
            self.issued += 1;
            self.busy = false;
        }
        self.phase = Phase::Idle;
    }

    /// Returns to `Idle`, forgetting any result or error.
    pub fn reset(&mut self) {
        self.cancel();
        self.record = None;
        self.error = None;
    }
}
