//! Weather insights API client
//!
//! The fetcher never fails loudly: transport errors, non-success statuses and
//! unparseable bodies are logged and reported as `None`. Shape checks happen
//! later, when the controller decodes the body into a
//! [`WeatherPayload`](crate::payload::WeatherPayload).

use std::future::Future;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Endpoint serving the latest processed weather summary
pub const DEFAULT_ENDPOINT: &str =
    "https://weather-backend-api-737404936819.asia-south1.run.app/weather";

/// Why a fetch produced no body
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(StatusCode),
    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Something that can produce the raw weather response body
///
/// `None` means no usable body: the request failed, the server answered with a
/// non-success status, or the body was not JSON.
pub trait WeatherSource: Send + Sync + 'static {
    fn fetch_weather(&self) -> impl Future<Output = Option<Value>> + Send;
}

/// [`WeatherSource`] backed by a single HTTP endpoint
#[derive(Clone, Debug)]
pub struct HttpWeatherSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpWeatherSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// GET the endpoint and parse the body as JSON, without any shape checks.
    pub async fn try_fetch(&self) -> Result<Value, FetchError> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl WeatherSource for HttpWeatherSource {
    async fn fetch_weather(&self) -> Option<Value> {
        match self.try_fetch().await {
            Ok(body) => Some(body),
            Err(error) => {
                tracing::warn!(endpoint = %self.endpoint, %error, "Error fetching weather data");
                None
            }
        }
    }
}
