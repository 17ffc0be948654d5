use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::client::EventSource;
use crate::types::Event;

pub type Deliveries = mpsc::UnboundedReceiver<Vec<Event>>;

/// Fetches the event list and hands it to whoever owns the receiving end
/// of the delivery channel.
///
/// Failures are logged and swallowed: a failed fetch delivers nothing, it
/// never delivers an error. There is no retry and no cancellation, and two
/// overlapping fetches are independent of each other.
#[derive(Clone)]
pub struct EventRepository {
    source: Arc<dyn EventSource>,
    deliveries: mpsc::UnboundedSender<Vec<Event>>,
}

impl EventRepository {
    pub fn new(source: Arc<dyn EventSource>) -> (Self, Deliveries) {
        let (deliveries, rx) = mpsc::unbounded_channel();
        (Self { source, deliveries }, rx)
    }

    /// Spawns one detached fetch. On success the events are sent exactly
    /// once; the handle is only useful for waiting on completion.
    pub fn fetch(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let Some(events) = this.load().await else {
                return;
            };
            let count = events.len();
            if this.deliveries.send(events).is_err() {
                debug!(count, "events fetched but nobody is listening anymore");
            }
        })
    }

    /// Runs the fetch inline and returns the events instead of delivering
    /// them.
    pub async fn load(&self) -> Option<Vec<Event>> {
        match self.source.fetch_events().await {
            Ok(response) => {
                info!(count = response.data.len(), "fetched events");
                Some(response.data)
            }
            Err(e) => {
                error!("error fetching events: {e}");
                None
            }
        }
    }
}
