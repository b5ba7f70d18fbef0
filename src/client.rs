//! # Generation Service Client
//!
//! Builds and issues requests to the remote variation-generation service,
//! one method per transformation family. Each call is stateless; any
//! non-success status is surfaced once as a request failure and never
//! retried here. Retry policy, if any, belongs to the caller.
//!
//! The service distinguishes "not requested" from "absent field": disabled
//! channels are always sent explicitly as the `"none"` sentinel (or JSON
//! `null` for the lick pattern), never omitted from the payload.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::CeolError;
use crate::variation::GenerationResponse;

/// Default request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sentinel for a variation channel that is not requested.
const DISABLED: &str = "none";

/// Style names the transformation service understands.
pub const KNOWN_STYLES: [&str; 5] = [
    "drone_minimalist",
    "groove_fusion",
    "ambient_chamber",
    "bebop_jazz",
    "baroque",
];

#[derive(Serialize)]
struct GenerateRequest<'a> {
    abc: &'a str,
    harmony_type: &'a str,
    melodic_type: &'a str,
    lick: Option<&'a str>,
    validate_anglo: bool,
}

#[derive(Serialize)]
struct SessionRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct StyleRequest<'a> {
    abc: &'a str,
    styles: &'a [String],
}

#[derive(Serialize)]
struct LuckyRequest<'a> {
    abc: &'a str,
    validate_anglo: bool,
}

/// Client for the variation-generation service.
pub struct VariationClient {
    http: reqwest::Client,
    base_url: String,
    validate_anglo: bool,
}

/// Builder for [`VariationClient`].
pub struct VariationClientBuilder {
    base_url: String,
    timeout: Duration,
    validate_anglo: bool,
}

impl VariationClientBuilder {
    /// Request timeout (default 30 s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ask the service to validate anglo-concertina playability
    /// (default false).
    pub fn validate_anglo(mut self, validate: bool) -> Self {
        self.validate_anglo = validate;
        self
    }

    pub fn build(self) -> Result<VariationClient, CeolError> {
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;
        Ok(VariationClient {
            http,
            base_url: self.base_url,
            validate_anglo: self.validate_anglo,
        })
    }
}

impl VariationClient {
    /// Client with default configuration.
    pub fn new(base_url: impl Into<String>) -> Result<Self, CeolError> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> VariationClientBuilder {
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        VariationClientBuilder {
            base_url,
            timeout: REQUEST_TIMEOUT,
            validate_anglo: false,
        }
    }

    /// Generate a melodic variation, leaving the harmony channel disabled.
    pub async fn melodic_variation(
        &self,
        abc: &str,
        melodic_type: &str,
        lick: Option<&str>,
    ) -> Result<GenerationResponse, CeolError> {
        info!(melodic_type, lick = lick.unwrap_or(DISABLED), "generating melodic variation");
        self.post(
            "/generate",
            &GenerateRequest {
                abc,
                harmony_type: DISABLED,
                melodic_type,
                lick,
                validate_anglo: self.validate_anglo,
            },
        )
        .await
    }

    /// Generate a harmony variation, leaving the melodic channel disabled.
    pub async fn harmony_variation(
        &self,
        abc: &str,
        harmony_type: &str,
    ) -> Result<GenerationResponse, CeolError> {
        info!(harmony_type, "generating harmony variation");
        self.post(
            "/generate",
            &GenerateRequest {
                abc,
                harmony_type,
                melodic_type: DISABLED,
                lick: None,
                validate_anglo: self.validate_anglo,
            },
        )
        .await
    }

    /// Generate a combined harmony + melodic variation.
    pub async fn combined_variation(
        &self,
        abc: &str,
        harmony_type: &str,
        melodic_type: &str,
        lick: Option<&str>,
    ) -> Result<GenerationResponse, CeolError> {
        info!(harmony_type, melodic_type, "generating combined variation");
        self.post(
            "/generate",
            &GenerateRequest {
                abc,
                harmony_type,
                melodic_type,
                lick,
                validate_anglo: self.validate_anglo,
            },
        )
        .await
    }

    /// Analyze the variations of a tune page on The Session.
    pub async fn analyze_session(&self, url: &str) -> Result<GenerationResponse, CeolError> {
        info!(url, "analyzing session tune");
        self.post("/analyze-session", &SessionRequest { url }).await
    }

    /// Transform the tune into the named styles, in order.
    pub async fn transform_styles(
        &self,
        abc: &str,
        styles: &[String],
    ) -> Result<GenerationResponse, CeolError> {
        info!(styles = ?styles, "generating style transformations");
        self.post("/transform-styles", &StyleRequest { abc, styles })
            .await
    }

    /// Ask the service for a handful of random variation combinations.
    pub async fn feeling_lucky(&self, abc: &str) -> Result<GenerationResponse, CeolError> {
        info!("generating feeling-lucky variations");
        self.post(
            "/feeling-lucky",
            &LuckyRequest {
                abc,
                validate_anglo: self.validate_anglo,
            },
        )
        .await
    }

    /// Probe the service's health endpoint.
    pub async fn health(&self) -> Result<(), CeolError> {
        let url = format!("{}/health", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CeolError::RequestFailed {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<GenerationResponse, CeolError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "issuing generation request");

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CeolError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let parsed: GenerationResponse = response.json().await?;
        debug!(fields = parsed.raw().len(), "generation response received");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, to_value};

    use super::*;

    #[test]
    fn test_harmony_payload_disables_melodic_channel_explicitly() {
        let body = GenerateRequest {
            abc: "X:1\nK:C\nabc",
            harmony_type: "simple_chord_changes",
            melodic_type: DISABLED,
            lick: None,
            validate_anglo: false,
        };
        assert_eq!(
            to_value(&body).unwrap(),
            json!({
                "abc": "X:1\nK:C\nabc",
                "harmony_type": "simple_chord_changes",
                "melodic_type": "none",
                "lick": null,
                "validate_anglo": false
            })
        );
    }

    #[test]
    fn test_melodic_payload_disables_harmony_channel_explicitly() {
        let body = GenerateRequest {
            abc: "X:1\nK:C\nabc",
            harmony_type: DISABLED,
            melodic_type: "long_roll",
            lick: Some("eAAB"),
            validate_anglo: false,
        };
        let value = to_value(&body).unwrap();
        assert_eq!(value["harmony_type"], "none");
        assert_eq!(value["lick"], "eAAB");
        // The keys are present even when disabled; the service tells
        // "not requested" apart from "absent field".
        assert!(value.as_object().unwrap().contains_key("melodic_type"));
        assert!(value.as_object().unwrap().contains_key("validate_anglo"));
    }

    #[test]
    fn test_style_payload_preserves_order() {
        let styles = vec!["baroque".to_string(), "bebop_jazz".to_string()];
        let body = StyleRequest {
            abc: "X:1\nK:C\nabc",
            styles: &styles,
        };
        assert_eq!(
            to_value(&body).unwrap(),
            json!({
                "abc": "X:1\nK:C\nabc",
                "styles": ["baroque", "bebop_jazz"]
            })
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let builder = VariationClient::builder("http://localhost:8000/");
        assert_eq!(builder.base_url, "http://localhost:8000");
    }
}
