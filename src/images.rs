use reqwest::header::CONTENT_TYPE;
use tracing::warn;

use crate::config::Settings;
use crate::error::Error;
use crate::types::Fighter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FighterImages {
    pub flag: Option<Image>,
    pub portrait: Option<Image>,
}

/// Pulls the flag and portrait for a fighter. Each image fails on its own
/// and a failure just leaves that slot empty.
pub struct ImageFetcher {
    client: reqwest::Client,
}

impl ImageFetcher {
    pub fn new(settings: &Settings) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub async fn fighter_images(&self, fighter: &Fighter) -> FighterImages {
        let (flag, portrait) = tokio::join!(
            self.image(&fighter.country),
            self.image(&fighter.picture)
        );
        FighterImages { flag, portrait }
    }

    async fn image(&self, url: &str) -> Option<Image> {
        match self.try_image(url).await {
            Ok(Some(image)) => Some(image),
            Ok(None) => {
                warn!(url, "image unavailable");
                None
            }
            Err(e) => {
                warn!(url, "error fetching image: {e}");
                None
            }
        }
    }

    async fn try_image(&self, url: &str) -> Result<Option<Image>, Error> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(Image {
            content_type,
            bytes: bytes.to_vec(),
        }))
    }
}
