use cdpchat_core::logging::{LoggingConfig, PrivacyConfig, redact_query};
use cdpchat_core::{
    ChannelError, Config, EntryId, EntryStatus, NewEntry, Resolution, TranscriptError, TranscriptStore, TransitionFault,
};
use cdpchat_providers::{Answer, Channel, QueryRequest};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Identifies one outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    /// Text shown in place of an answer when a request fails
    pub error_message: String,
    pub privacy: PrivacyConfig,
}

impl DispatcherSettings {
    pub fn from_config(config: &Config) -> Self {
        let privacy = LoggingConfig::from(config.logging.clone()).privacy;
        Self { error_message: config.chat.error_message.clone(), privacy }
    }
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Why a submission was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// Draft is empty or whitespace only
    Empty,
    /// A request is still awaiting its response
    Busy,
}

impl fmt::Display for SubmitRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitRejection::Empty => write!(f, "nothing to send"),
            SubmitRejection::Busy => write!(f, "a question is already being answered"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Dispatched { user_id: EntryId, pending_id: EntryId, request_id: RequestId },
    Rejected(SubmitRejection),
}

impl SubmitOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, SubmitOutcome::Dispatched { .. })
    }
}

/// Completion of an outbound request, sent back from the request task
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchEvent {
    pub request_id: RequestId,
    pub entry_id: EntryId,
    pub result: Result<Answer, ChannelError>,
}

#[derive(Debug)]
struct InFlight {
    request_id: RequestId,
    entry_id: EntryId,
    cancel: CancellationToken,
}

/// Single-outstanding-request gate between the input and the channel.
///
/// `submit` appends the user entry and a pending bot entry, then spawns the
/// request. The response arrives as a [`DispatchEvent`] on the receiver returned
/// by [`Dispatcher::new`]; whoever owns the [`TranscriptStore`] hands it back to
/// [`Dispatcher::resolve`], which merges it and reopens the gate.
pub struct Dispatcher {
    channel: Arc<dyn Channel>,
    settings: DispatcherSettings,
    events: mpsc::UnboundedSender<DispatchEvent>,
    in_flight: Option<InFlight>,
    next_request: u64,
}

impl Dispatcher {
    pub fn new(
        channel: Arc<dyn Channel>, settings: DispatcherSettings,
    ) -> (Self, mpsc::UnboundedReceiver<DispatchEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { channel, settings, events, in_flight: None, next_request: 1 }, rx)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn settings(&self) -> &DispatcherSettings {
        &self.settings
    }

    pub fn describe_channel(&self) -> String {
        self.channel.describe()
    }

    /// Send `raw` to the answering engine.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, store: &mut TranscriptStore, raw: &str) -> SubmitOutcome {
        if raw.trim().is_empty() {
            tracing::trace!("empty submission ignored");
            return SubmitOutcome::Rejected(SubmitRejection::Empty);
        }
        if self.in_flight.is_some() || store.pending_id().is_some() {
            tracing::debug!("submission ignored while a request is in flight");
            return SubmitOutcome::Rejected(SubmitRejection::Busy);
        }

        let user_id = store.append(NewEntry::user(raw));
        let pending_id = store.append(NewEntry::pending_bot());
        let request_id = RequestId(self.next_request);
        self.next_request += 1;

        let cancel = CancellationToken::new();
        self.spawn_request(request_id, pending_id, QueryRequest::new(raw), cancel.clone());
        self.in_flight = Some(InFlight { request_id, entry_id: pending_id, cancel });

        tracing::info!(
            request = %request_id,
            entry = %pending_id,
            query = %redact_query(raw, &self.settings.privacy),
            "query dispatched"
        );
        SubmitOutcome::Dispatched { user_id, pending_id, request_id }
    }

    fn spawn_request(&self, request_id: RequestId, entry_id: EntryId, request: QueryRequest, cancel: CancellationToken) {
        let channel = Arc::clone(&self.channel);
        let events = self.events.clone();

        tokio::spawn(async move {
            // A panicking channel must still settle the entry, so the query runs in its own task.
            let query = tokio::spawn(async move { channel.query(request).await });
            let abort = query.abort_handle();

            tokio::select! {
                _ = cancel.cancelled() => {
                    abort.abort();
                    tracing::debug!(request = %request_id, "request abandoned");
                }
                joined = query => {
                    let result = joined.unwrap_or_else(|e| {
                        tracing::error!(request = %request_id, error = %e, "request task failed");
                        Err(ChannelError::transport(format!("request task failed: {}", e)))
                    });
                    if events.send(DispatchEvent { request_id, entry_id, result }).is_err() {
                        tracing::debug!(request = %request_id, "response dropped, conversation is gone");
                    }
                }
            }
        });
    }

    /// Merge a completed request into the transcript and clear the gate.
    ///
    /// An event that does not belong to the in-flight request is rejected and
    /// leaves both the gate and the store untouched.
    pub fn resolve(&mut self, store: &mut TranscriptStore, event: DispatchEvent) -> Result<EntryStatus, TranscriptError> {
        let matches = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.request_id == event.request_id && f.entry_id == event.entry_id);
        if !matches {
            tracing::error!(request = %event.request_id, entry = %event.entry_id, "stale dispatch event");
            return Err(TranscriptError::invalid(event.entry_id, TransitionFault::StaleRequest));
        }
        self.in_flight = None;

        let resolution = match event.result {
            Ok(answer) => {
                Resolution::Resolved { text: answer.text, citations: answer.citations, query_type: answer.query_type }
            }
            Err(err) => {
                tracing::warn!(request = %event.request_id, kind = err.kind(), error = %err, "query failed");
                Resolution::Failed { text: self.settings.error_message.clone() }
            }
        };

        let status = resolution.status();
        store.update_pending(event.entry_id, resolution)?;
        tracing::debug!(request = %event.request_id, entry = %event.entry_id, status = status.as_str(), "query settled");
        Ok(status)
    }

    /// Abandon a request still running. Its pending entry stays pending.
    pub fn shutdown(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            tracing::debug!(request = %in_flight.request_id, "cancelling in-flight request");
            in_flight.cancel.cancel();
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
