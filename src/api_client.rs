use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::client::EventSource;
use crate::config::Settings;
use crate::error::{DecodeError, Error};
use crate::types::EventsResponse;

pub struct EventsApiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl EventsApiClient {
    pub fn new(settings: &Settings) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: settings.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EventSource for EventsApiClient {
    async fn fetch_events(&self) -> Result<EventsResponse, Error> {
        let response = self.client.get(&self.endpoint).send().await?;
        debug!(endpoint = %self.endpoint, status = %response.status(), "events response");

        // status is not checked, an error page surfaces as a decode failure
        let body = response.bytes().await?;
        serde_json::from_slice::<EventsResponse>(&body)
            .map_err(|e| DecodeError::new(&self.endpoint, e).into())
    }
}
