use async_trait::async_trait;

use crate::error::Error;
use crate::types::EventsResponse;

#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self) -> Result<EventsResponse, Error>;
}
