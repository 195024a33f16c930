use crate::error::FetchError;
use crate::rate_provider::RateProvider;
use crate::snapshot::RateSnapshot;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for the OpenExchangeRates `latest.json` endpoint.
///
/// Holds the HTTP client and credential; one GET per `fetch` call, bounded by
/// the configured timeout. A timed-out request surfaces as a network error.
pub struct OpenExchangeRatesProvider {
    base_url: String,
    app_id: String,
    client: reqwest::Client,
}

impl OpenExchangeRatesProvider {
    pub fn new(base_url: &str, app_id: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent("fxr/0.1")
            .timeout(timeout)
            .build()?;
        Ok(OpenExchangeRatesProvider {
            base_url: base_url.to_string(),
            app_id: app_id.to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: String,
    /// Provider-side publication time, epoch seconds.
    timestamp: i64,
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for OpenExchangeRatesProvider {
    #[instrument(name = "RateFetch", skip(self), fields(base = %base))]
    async fn fetch(&self, base: &str) -> Result<RateSnapshot, FetchError> {
        let url = format!(
            "{}/api/latest.json?app_id={}&base={}",
            self.base_url, self.app_id, base
        );
        debug!("Requesting rate table from {}/api/latest.json", self.base_url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| FetchError::Parse(format!("unexpected response shape: {e}")))?;

        if data.base != base {
            return Err(FetchError::Parse(format!(
                "requested base {base} but provider returned {}",
                data.base
            )));
        }

        let fetched_at = Utc
            .timestamp_opt(data.timestamp, 0)
            .single()
            .ok_or_else(|| {
                FetchError::Parse(format!("invalid timestamp: {}", data.timestamp))
            })?;

        RateSnapshot::new(base, data.rates, fetched_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(5);

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/latest.json"))
            .and(query_param("app_id", "test-key"))
            .and(query_param("base", "USD"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let body = r#"{
            "base": "USD",
            "timestamp": 1700000000,
            "rates": {"USD": 1.0, "EUR": 0.9, "GBP": 0.8}
        }"#;
        let mock_server = create_mock_server(200, body).await;

        let provider =
            OpenExchangeRatesProvider::new(&mock_server.uri(), "test-key", TIMEOUT).unwrap();
        let snapshot = provider.fetch("USD").await.unwrap();

        assert_eq!(snapshot.base(), "USD");
        assert_eq!(snapshot.rate("EUR"), Some(0.9));
        assert_eq!(snapshot.fetched_at().timestamp(), 1700000000);
    }

    #[tokio::test]
    async fn test_provider_error_on_bad_status() {
        let mock_server = create_mock_server(401, r#"{"message": "invalid_app_id"}"#).await;

        let provider =
            OpenExchangeRatesProvider::new(&mock_server.uri(), "test-key", TIMEOUT).unwrap();
        let err = provider.fetch("USD").await.unwrap_err();

        assert!(matches!(err, FetchError::Provider { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_parse_error_on_malformed_body() {
        let mock_server = create_mock_server(200, r#"{"unexpected": true}"#).await;

        let provider =
            OpenExchangeRatesProvider::new(&mock_server.uri(), "test-key", TIMEOUT).unwrap();
        let err = provider.fetch("USD").await.unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_parse_error_on_negative_rate() {
        let body = r#"{
            "base": "USD",
            "timestamp": 1700000000,
            "rates": {"USD": 1.0, "EUR": -0.9}
        }"#;
        let mock_server = create_mock_server(200, body).await;

        let provider =
            OpenExchangeRatesProvider::new(&mock_server.uri(), "test-key", TIMEOUT).unwrap();
        let err = provider.fetch("USD").await.unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_parse_error_on_base_mismatch() {
        let body = r#"{
            "base": "EUR",
            "timestamp": 1700000000,
            "rates": {"EUR": 1.0}
        }"#;
        let mock_server = create_mock_server(200, body).await;

        let provider =
            OpenExchangeRatesProvider::new(&mock_server.uri(), "test-key", TIMEOUT).unwrap();
        let err = provider.fetch("USD").await.unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_network_error_when_provider_exceeds_timeout() {
        let body = r#"{
            "base": "USD",
            "timestamp": 1700000000,
            "rates": {"USD": 1.0, "EUR": 0.9}
        }"#;
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/latest.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let provider = OpenExchangeRatesProvider::new(
            &mock_server.uri(),
            "test-key",
            Duration::from_millis(200),
        )
        .unwrap();
        let err = provider.fetch("USD").await.unwrap_err();

        // A hung provider is indistinguishable from a transport failure.
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[tokio::test]
    async fn test_network_error_on_unreachable_host() {
        // Port 9 (discard) refuses connections on the loopback interface.
        let provider =
            OpenExchangeRatesProvider::new("http://127.0.0.1:9", "test-key", TIMEOUT).unwrap();
        let err = provider.fetch("USD").await.unwrap_err();

        assert!(matches!(err, FetchError::Network(_)));
    }
}
