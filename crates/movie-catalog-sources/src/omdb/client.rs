use async_trait::async_trait;
use movie_catalog_config::OmdbConfig;
use movie_catalog_models::MovieMetadata;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::SourceError;
use crate::omdb::api::{self, PROVIDER};
use crate::traits::MetadataProvider;

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    plot: String,
}

impl OmdbClient {
    pub fn new(api_key: String, config: &OmdbConfig) -> Result<Self, SourceError> {
        if api_key.trim().is_empty() {
            return Err(SourceError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key,
            base_url: config.base_url.clone(),
            plot: config.plot.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    fn provider_name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_movie(&self, title: &str) -> Result<Option<MovieMetadata>, SourceError> {
        debug!(title, "Fetching movie from OMDb");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("t", title),
                ("plot", self.plot.as_str()),
                ("r", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // OMDb reports a bad key as 401 with a JSON error body
            if let Some(message) = api::parse_error_message(&body) {
                return Err(SourceError::Api {
                    provider: PROVIDER,
                    message,
                });
            }
            return Err(SourceError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let metadata = api::parse_movie_response(&body)?;
        match &metadata {
            Some(m) => info!(title = %m.title, imdb_id = %m.imdb_id, ratings = m.ratings.len(), "OMDb match"),
            None => info!(title, "OMDb has no movie with this title"),
        }
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let config = OmdbConfig::default();
        assert!(matches!(
            OmdbClient::new("  ".to_string(), &config),
            Err(SourceError::MissingApiKey)
        ));
        let client = OmdbClient::new("key".to_string(), &config).unwrap();
        assert_eq!(client.base_url(), "http://www.omdbapi.com/");
        assert_eq!(client.provider_name(), "OMDb");
    }
}
