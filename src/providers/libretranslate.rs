/*!
 * Client for LibreTranslate-compatible translation endpoints.
 */

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ProviderError;
use crate::providers::TranslationClient;

/// Translate request body
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    /// Text to translate
    q: &'a str,
    /// Source language code ("auto" for detection)
    source: &'a str,
    /// Target language code
    target: &'a str,
    /// Input format; subtitle text is always plain
    format: &'a str,
    /// API key, omitted when not configured
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

/// Translate request body for the bulk endpoint (array `q`)
#[derive(Debug, Serialize)]
struct TranslateBatchRequest<'a> {
    q: &'a [String],
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

/// Translate response body
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    /// Translated text
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Bulk translate response body
#[derive(Debug, Deserialize)]
struct TranslateBatchResponse {
    #[serde(rename = "translatedText")]
    translated_text: Vec<String>,
}

/// Error body returned by the service
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// LibreTranslate API client
#[derive(Debug, Clone)]
pub struct LibreTranslateClient {
    /// Base URL of the service
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// Optional API key
    api_key: Option<String>,
}

impl LibreTranslateClient {
    /// Create a new client against `endpoint` with a per-request timeout.
    pub fn new(endpoint: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self, ProviderError> {
        let url = Url::parse(endpoint)
            .map_err(|e| ProviderError::ConnectionError(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self {
            base_url: url.to_string().trim_end_matches('/').to_string(),
            client,
            api_key,
        })
    }

    /// Full URL of the translate endpoint
    fn translate_url(&self) -> String {
        format!("{}/translate", self.base_url)
    }

    /// Turn a non-success response into a ProviderError
    async fn error_from_response(response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => "unparseable error body".to_string(),
        };

        if status == 429 {
            ProviderError::RateLimitExceeded(message)
        } else {
            ProviderError::ApiError {
                status_code: status,
                message,
            }
        }
    }
}

#[async_trait]
impl TranslationClient for LibreTranslateClient {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ProviderError> {
        let request = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(self.translate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(body.translated_text)
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source: &str,
        target: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let request = TranslateBatchRequest {
            q: texts,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(self.translate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: TranslateBatchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(body.translated_text)
    }
}
