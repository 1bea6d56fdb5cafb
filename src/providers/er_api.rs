use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::with_retry;
use crate::core::config::ErApiProviderConfig;
use crate::core::currency::{CurrencyCode, RateFetcher, RateSnapshot};

/// Fetches the latest rates from the open.er-api.com endpoint.
pub struct ErApiProvider {
    base_url: String,
    retries: usize,
    retry_delay_ms: u64,
    timeout: Duration,
}

impl ErApiProvider {
    pub fn new(config: &ErApiProviderConfig) -> Self {
        ErApiProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    rates: Option<HashMap<String, f64>>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

impl LatestRatesResponse {
    fn into_snapshot(self) -> Result<RateSnapshot> {
        if self.result != "success" {
            bail!(
                "Rate API returned result '{}' ({})",
                self.result,
                self.error_type.as_deref().unwrap_or("no error type")
            );
        }
        let rates = self
            .rates
            .ok_or_else(|| anyhow!("Rate API response has no rates"))?;

        let mut snapshot = RateSnapshot::new();
        for (code, rate) in rates {
            // Only the catalog is tracked, the API quotes far more currencies
            let Ok(code) = CurrencyCode::from_str(&code) else {
                continue;
            };
            if code.is_base() {
                continue;
            }
            if !rate.is_finite() || rate < 0.0 {
                bail!("Rate API returned invalid rate {} for {}", rate, code);
            }
            snapshot.insert(code, rate);
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl RateFetcher for ErApiProvider {
    #[instrument(name = "ErApiFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateSnapshot> {
        let url = format!("{}/v6/latest/{}", self.base_url, base);
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("cnyrate/1.0")
            .timeout(self.timeout)
            .build()?;
        let response = with_retry(
            || client.get(&url).send(),
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            bail!("HTTP error: {} for base currency: {}", response.status(), base);
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        let snapshot = data.into_snapshot()?;
        debug!(currencies = snapshot.len(), "Received rate snapshot");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v6/latest/CNY"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider_for(mock_server: &MockServer) -> ErApiProvider {
        ErApiProvider::new(&ErApiProviderConfig {
            base_url: mock_server.uri(),
            retries: 0,
            retry_delay_ms: 1,
            timeout_ms: 1_000,
        })
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "result": "success",
            "base_code": "CNY",
            "rates": {
                "CNY": 1,
                "USD": 0.1381,
                "EUR": 0.1274,
                "JPY": 20.91,
                "BRL": 0.75
            }
        }"#;

        let mock_server = create_mock_server(200, mock_response).await;
        let provider = provider_for(&mock_server);
        let snapshot = provider.fetch_rates(CurrencyCode::Cny).await.unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[&CurrencyCode::Usd], 0.1381);
        assert_eq!(snapshot[&CurrencyCode::Eur], 0.1274);
        assert_eq!(snapshot[&CurrencyCode::Jpy], 20.91);
        assert!(!snapshot.contains_key(&CurrencyCode::Cny));
    }

    #[tokio::test]
    async fn test_error_result_is_rejected() {
        let mock_response = r#"{"result": "error", "error-type": "unsupported-code"}"#;
        let mock_server = create_mock_server(200, mock_response).await;
        let provider = provider_for(&mock_server);

        let result = provider.fetch_rates(CurrencyCode::Cny).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Rate API returned result 'error' (unsupported-code)"
        );
    }

    #[tokio::test]
    async fn test_missing_rates_is_rejected() {
        let mock_server = create_mock_server(200, r#"{"result": "success"}"#).await;
        let provider = provider_for(&mock_server);

        let result = provider.fetch_rates(CurrencyCode::Cny).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Rate API response has no rates"
        );
    }

    #[tokio::test]
    async fn test_negative_rate_is_rejected() {
        let mock_response = r#"{"result": "success", "rates": {"USD": -0.5}}"#;
        let mock_server = create_mock_server(200, mock_response).await;
        let provider = provider_for(&mock_server);

        let result = provider.fetch_rates(CurrencyCode::Cny).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("invalid rate -0.5 for USD")
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_response = r#"{"result": "success", "rates": {"USD": "0.138"}}"#;
        let mock_server = create_mock_server(200, mock_response).await;
        let provider = provider_for(&mock_server);

        let result = provider.fetch_rates(CurrencyCode::Cny).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for CNY")
        );
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = create_mock_server(500, "").await;
        let provider = provider_for(&mock_server);

        let result = provider.fetch_rates(CurrencyCode::Cny).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for base currency: CNY"
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_response = r#"{"result": "success", "rates": {"GBP": 0.109}}"#;
        let mock_server = create_mock_server(200, mock_response).await;
        let provider = ErApiProvider::new(&ErApiProviderConfig {
            base_url: format!("{}/", mock_server.uri()),
            retries: 0,
            retry_delay_ms: 1,
            timeout_ms: 1_000,
        });

        let snapshot = provider.fetch_rates(CurrencyCode::Cny).await.unwrap();
        assert_eq!(snapshot[&CurrencyCode::Gbp], 0.109);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/latest/CNY"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"result": "success", "rates": {"USD": 0.138}}"#)
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;
        let provider = ErApiProvider::new(&ErApiProviderConfig {
            base_url: mock_server.uri(),
            retries: 0,
            retry_delay_ms: 1,
            timeout_ms: 100,
        });

        let started = std::time::Instant::now();
        let result = provider.fetch_rates(CurrencyCode::Cny).await;
        assert!(result.unwrap_err().to_string().starts_with("Request error"));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
