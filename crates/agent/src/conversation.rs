use crate::dispatcher::{DispatchEvent, Dispatcher, DispatcherSettings, SubmitOutcome};

use cdpchat_core::{Config, EntryId, EntryStatus, Error, Result, TranscriptChange, TranscriptEntry, TranscriptStore};
use cdpchat_providers::{Channel, ChannelFactory};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// One chat session: the transcript, the dispatcher that writes to it, and the
/// stream of request completions.
///
/// The conversation is the only writer of its store. Front ends read the
/// transcript and watch [`Conversation::subscribe`] for changes.
pub struct Conversation {
    store: TranscriptStore,
    dispatcher: Dispatcher,
    events: mpsc::UnboundedReceiver<DispatchEvent>,
}

impl Conversation {
    /// Conversation seeded with a welcome entry
    pub fn new(channel: Arc<dyn Channel>, settings: DispatcherSettings, welcome: impl Into<String>) -> Self {
        let (dispatcher, events) = Dispatcher::new(channel, settings);
        Self { store: TranscriptStore::seeded(welcome), dispatcher, events }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let channel = ChannelFactory::create_from_config(&config.channel)?;
        tracing::debug!(channel = %channel.describe(), "conversation created");
        Ok(Self::new(channel, DispatcherSettings::from_config(config), config.chat.welcome_message.clone()))
    }

    pub fn transcript(&self) -> &TranscriptStore {
        &self.store
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        self.store.list()
    }

    pub fn subscribe(&self) -> watch::Receiver<TranscriptChange> {
        self.store.subscribe()
    }

    pub fn is_in_flight(&self) -> bool {
        self.dispatcher.is_in_flight()
    }

    pub fn describe_channel(&self) -> String {
        self.dispatcher.describe_channel()
    }

    pub fn submit(&mut self, raw: &str) -> SubmitOutcome {
        self.dispatcher.submit(&mut self.store, raw)
    }

    /// Wait for the next request completion. Cancel safe.
    pub async fn next_event(&mut self) -> Option<DispatchEvent> {
        self.events.recv().await
    }

    pub fn apply(&mut self, event: DispatchEvent) -> Result<EntryStatus> {
        Ok(self.dispatcher.resolve(&mut self.store, event)?)
    }

    /// Submit and wait for the answer; returns the settled bot entry.
    pub async fn ask(&mut self, raw: &str) -> Result<&TranscriptEntry> {
        let pending_id = match self.submit(raw) {
            SubmitOutcome::Dispatched { pending_id, .. } => pending_id,
            SubmitOutcome::Rejected(reason) => return Err(Error::Other(format!("question not sent: {}", reason))),
        };

        while self.is_in_flight() {
            let event = self
                .next_event()
                .await
                .ok_or_else(|| Error::Other("request task ended without a response".to_string()))?;
            self.apply(event)?;
        }

        self.entry(pending_id)
    }

    fn entry(&self, id: EntryId) -> Result<&TranscriptEntry> {
        self.store
            .get(id)
            .ok_or_else(|| Error::Other(format!("entry {} missing from transcript", id)))
    }

    pub fn shutdown(&mut self) {
        self.dispatcher.shutdown();
    }
}
