use movie_catalog_config::FlagsConfig;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::SourceError;

const PROVIDER: &str = "restcountries";

#[derive(Debug, Deserialize)]
struct CountryFlags {
    png: Option<String>,
    svg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Country {
    flags: CountryFlags,
}

/// Resolves a country name to a flag image URL
#[derive(Clone)]
pub struct FlagLookup {
    client: Arc<Client>,
    base_url: String,
}

/// OMDb and restcountries disagree on a few names
pub fn lookup_name(country: &str) -> &str {
    match country.trim() {
        "United States" | "USA" => "United States of America",
        "UK" => "United Kingdom",
        other => other,
    }
}

/// Pick the flag URL out of a restcountries response body
pub fn parse_flag_response(body: &str) -> Result<Option<String>, SourceError> {
    let countries: Vec<Country> = serde_json::from_str(body)
        .map_err(|e| SourceError::invalid(PROVIDER, format!("malformed JSON: {}", e)))?;
    Ok(countries
        .into_iter()
        .next()
        .and_then(|c| c.flags.png.or(c.flags.svg)))
}

impl FlagLookup {
    pub fn new(config: &FlagsConfig, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self {
            client: Arc::new(client),
            base_url,
        })
    }

    pub fn request_url(&self, country: &str) -> String {
        format!("{}{}", self.base_url, urlencoding::encode(lookup_name(country)))
    }

    /// `Ok(None)` when the country is unknown to the service
    pub async fn flag_url(&self, country: &str) -> Result<Option<String>, SourceError> {
        let url = self.request_url(country);
        debug!(%url, "Looking up country flag");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_flag_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_name_aliases() {
        assert_eq!(lookup_name("United States"), "United States of America");
        assert_eq!(lookup_name(" France "), "France");
    }

    #[test]
    fn test_request_url_encodes_name() {
        let lookup = FlagLookup::new(
            &FlagsConfig {
                enabled: true,
                base_url: "https://restcountries.com/v3.1/name".to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            lookup.request_url("United States"),
            "https://restcountries.com/v3.1/name/United%20States%20of%20America"
        );
    }

    #[test]
    fn test_parse_flag_response() {
        let body = r#"[{"name":{"common":"France"},"flags":{"png":"https://flagcdn.com/w320/fr.png","svg":"https://flagcdn.com/fr.svg"}}]"#;
        assert_eq!(
            parse_flag_response(body).unwrap().as_deref(),
            Some("https://flagcdn.com/w320/fr.png")
        );
        assert_eq!(parse_flag_response("[]").unwrap(), None);
        assert!(parse_flag_response("{}").is_err());
    }
}
