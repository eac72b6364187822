use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::core::config::ClientConfig;
use crate::core::error::{ForexError, Result};
use crate::core::pair::{CurrencyPair, SOURCE_CURRENCY};
use crate::core::quote::{FetchResult, QuoteMap, QuoteProvider, derive_rates};

const NOT_AVAILABLE: &str = "N/A";

/// Client for the currencylayer `live` endpoint.
pub struct QuoteClient {
    config: ClientConfig,
    supported: Vec<CurrencyPair>,
    http: reqwest::Client,
}

impl std::fmt::Debug for QuoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteClient")
            .field("base_url", &self.config.base_url)
            .field("supported", &self.supported)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize, Debug)]
struct LiveResponse {
    #[serde(default)]
    success: bool,
    terms: Option<String>,
    privacy: Option<String>,
    timestamp: Option<i64>,
    source: Option<String>,
    #[serde(default)]
    quotes: QuoteMap,
    error: Option<LiveError>,
}

#[derive(Deserialize, Debug)]
struct LiveError {
    info: Option<String>,
}

impl QuoteClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ForexError::Configuration(
                "API_KEY not found in environment variables".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("fxreport/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(QuoteClient {
            config,
            supported: CurrencyPair::supported(),
            http: builder.build()?,
        })
    }

    /// Returns a copy of the supported pair set.
    pub fn supported_pairs(&self) -> Vec<CurrencyPair> {
        self.supported.clone()
    }

    /// Checks every requested code against the supported set, reporting all
    /// offenders at once.
    pub fn validate<S: AsRef<str>>(&self, pairs: &[S]) -> Result<Vec<CurrencyPair>> {
        let mut valid = Vec::with_capacity(pairs.len());
        let mut invalid = Vec::new();

        for code in pairs {
            match CurrencyPair::parse(code.as_ref()) {
                Ok(pair) if self.supported.contains(&pair) => valid.push(pair),
                _ => invalid.push(code.as_ref().to_string()),
            }
        }

        if invalid.is_empty() {
            Ok(valid)
        } else {
            Err(ForexError::UnsupportedPair(invalid))
        }
    }

    /// Fetches the given pairs, validating them before any request goes out.
    pub async fn fetch<S: AsRef<str>>(&self, pairs: &[S]) -> Result<FetchResult> {
        let pairs = self.validate(pairs)?;
        self.fetch_validated(&pairs).await
    }

    pub async fn fetch_all(&self) -> Result<FetchResult> {
        let pairs = self.supported_pairs();
        self.fetch_validated(&pairs).await
    }

    #[instrument(
        name = "CurrencyLayerFetch",
        skip(self, pairs),
        fields(pairs = pairs.len())
    )]
    async fn fetch_validated(&self, pairs: &[CurrencyPair]) -> Result<FetchResult> {
        debug!("Requesting live quotes from {}", self.config.base_url);

        // The request URL carries the access key, so it is stripped from errors.
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("access_key", self.config.api_key.as_str()),
                ("source", SOURCE_CURRENCY),
                ("format", "1"),
            ])
            .send()
            .await
            .map_err(|e| ForexError::Http(e.without_url()))?;

        debug!(status = %response.status(), "Received provider response");
        let text = response
            .text()
            .await
            .map_err(|e| ForexError::Http(e.without_url()))?;
        debug!(body = %text, "Raw provider response");

        let data: LiveResponse =
            serde_json::from_str(&text).map_err(|e| ForexError::InvalidResponse(e.to_string()))?;

        if !data.success {
            let info = data
                .error
                .and_then(|e| e.info)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(ForexError::Provider(info));
        }

        let timestamp = data.timestamp.unwrap_or_else(|| Utc::now().timestamp());
        let rates = derive_rates(pairs, &data.quotes, timestamp);
        if rates.is_empty() {
            warn!("No rates found in API response");
        }

        Ok(FetchResult {
            success: data.success,
            terms: data.terms.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            privacy: data.privacy.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            timestamp,
            source: data.source.unwrap_or_else(|| SOURCE_CURRENCY.to_string()),
            rates,
            all_quotes: data.quotes,
        })
    }
}

#[async_trait]
impl QuoteProvider for QuoteClient {
    async fn fetch(&self, pairs: &[String]) -> Result<FetchResult> {
        QuoteClient::fetch(self, pairs).await
    }

    async fn fetch_all(&self) -> Result<FetchResult> {
        QuoteClient::fetch_all(self).await
    }

    fn supported_pairs(&self) -> Vec<CurrencyPair> {
        QuoteClient::supported_pairs(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LIVE_RESPONSE: &str = r#"{
        "success": true,
        "terms": "https://currencylayer.com/terms",
        "privacy": "https://currencylayer.com/privacy",
        "timestamp": 1700000000,
        "source": "USD",
        "quotes": {
            "USDAUD": 1.53,
            "USDCAD": 1.37,
            "USDCHF": 0.88,
            "USDEUR": 0.92,
            "USDGBP": 0.79,
            "USDJPY": 151.3,
            "USDNZD": 1.66,
            "USDZAR": 18.7
        }
    }"#;

    async fn create_mock_server(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/live"))
            .and(query_param("access_key", "test-key"))
            .and(query_param("source", "USD"))
            .and(query_param("format", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .expect(1)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn client_for(server: &MockServer) -> QuoteClient {
        let config =
            ClientConfig::new("test-key").with_base_url(format!("{}/api/live", server.uri()));
        QuoteClient::new(config).unwrap()
    }

    fn pair(code: &str) -> CurrencyPair {
        CurrencyPair::parse(code).unwrap()
    }

    #[test]
    fn test_missing_api_key_fails_construction() {
        let err = QuoteClient::new(ClientConfig::new("")).unwrap_err();
        assert!(matches!(err, ForexError::Configuration(_)));
    }

    #[test]
    fn test_supported_pairs_returns_copy() {
        let client = QuoteClient::new(ClientConfig::new("key")).unwrap();
        let mut pairs = client.supported_pairs();
        pairs.clear();
        assert_eq!(client.supported_pairs().len(), 8);
    }

    #[tokio::test]
    async fn test_fetch_all_derives_every_supported_pair() {
        let mock_server = create_mock_server(LIVE_RESPONSE).await;
        let client = client_for(&mock_server);

        let result = client.fetch_all().await.unwrap();

        assert!(result.success);
        assert_eq!(result.timestamp, 1_700_000_000);
        assert_eq!(result.source, "USD");
        assert_eq!(result.terms, "https://currencylayer.com/terms");
        assert_eq!(result.rates.len(), 8);
        assert_eq!(result.all_quotes.len(), 8);

        for (pair, entry) in &result.rates {
            let quoted = result.all_quotes[&pair.quote_key()];
            if pair.is_direct() {
                assert_eq!(entry.rate, quoted);
            } else {
                assert_eq!(entry.rate, 1.0 / quoted);
                assert!((entry.rate * quoted - 1.0).abs() < 1e-12);
            }
            assert_eq!(entry.timestamp, 1_700_000_000);
        }
    }

    #[tokio::test]
    async fn test_fetch_single_pair() {
        let mock_server = create_mock_server(LIVE_RESPONSE).await;
        let client = client_for(&mock_server);

        let result = client.fetch(&["EURUSD"]).await.unwrap();

        assert_eq!(result.rates.len(), 1);
        assert_eq!(result.rates[&pair("EURUSD")].rate, 1.0 / 0.92);
        // Raw quotes are kept whole regardless of the pairs requested.
        assert_eq!(result.all_quotes.len(), 8);
    }

    #[tokio::test]
    async fn test_unsupported_pair_makes_no_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LIVE_RESPONSE))
            .expect(0)
            .mount(&mock_server)
            .await;
        let client = client_for(&mock_server);

        let err = client
            .fetch(&["EURUSD", "XYZABC", "EURGBP"])
            .await
            .unwrap_err();

        match err {
            ForexError::UnsupportedPair(invalid) => assert_eq!(invalid, vec!["XYZABC", "EURGBP"]),
            other => panic!("Expected UnsupportedPair, got {other:?}"),
        }
        mock_server.verify().await;
    }

    #[tokio::test]
    async fn test_provider_error_carries_message() {
        let mock_response = r#"{
            "success": false,
            "error": {
                "code": 101,
                "info": "You have not supplied a valid API Access Key."
            }
        }"#;
        let mock_server = create_mock_server(mock_response).await;
        let client = client_for(&mock_server);

        let err = client.fetch_all().await.unwrap_err();
        assert!(matches!(err, ForexError::Provider(_)));
        assert_eq!(
            err.to_string(),
            "API returned error: You have not supplied a valid API Access Key."
        );
    }

    #[tokio::test]
    async fn test_provider_error_without_info() {
        let mock_server = create_mock_server(r#"{"success": false}"#).await;
        let client = client_for(&mock_server);

        let err = client.fetch_all().await.unwrap_err();
        assert_eq!(err.to_string(), "API returned error: Unknown error");
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let mock_server = create_mock_server("<html>Bad Gateway</html>").await;
        let client = client_for(&mock_server);

        let err = client.fetch_all().await.unwrap_err();
        assert!(matches!(err, ForexError::InvalidResponse(_)));
        assert!(err.to_string().contains("Invalid JSON response from API"));
    }

    #[tokio::test]
    async fn test_missing_quote_drops_only_that_pair() {
        let mock_response = r#"{
            "success": true,
            "timestamp": 1700000000,
            "quotes": {"USDEUR": 0.92, "USDJPY": 151.3}
        }"#;
        let mock_server = create_mock_server(mock_response).await;
        let client = client_for(&mock_server);

        let result = client
            .fetch(&["EURUSD", "USDJPY", "USDCHF"])
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.rates.len(), 2);
        assert!(result.rates.contains_key(&pair("EURUSD")));
        assert!(result.rates.contains_key(&pair("USDJPY")));
        assert!(!result.rates.contains_key(&pair("USDCHF")));
        assert_eq!(result.terms, "N/A");
        assert_eq!(result.privacy, "N/A");
        assert_eq!(result.source, "USD");
    }

    #[tokio::test]
    async fn test_missing_timestamp_falls_back_to_now() {
        let mock_server = create_mock_server(r#"{"success": true, "quotes": {}}"#).await;
        let client = client_for(&mock_server);

        let before = Utc::now().timestamp();
        let result = client.fetch_all().await.unwrap();

        assert!(result.timestamp >= before);
        assert!(result.rates.is_empty());
        assert!(result.all_quotes.is_empty());
    }

    #[tokio::test]
    async fn test_connection_failure_hides_access_key() {
        let config =
            ClientConfig::new("SECRETKEY123").with_base_url("http://127.0.0.1:1/api/live");
        let client = QuoteClient::new(config).unwrap();

        let err = client.fetch_all().await.unwrap_err();

        assert!(matches!(err, ForexError::Http(_)), "got {err:?}");
        assert!(!err.to_string().contains("SECRETKEY123"));
        assert!(!format!("{err:?}").contains("SECRETKEY123"));
    }

    #[tokio::test]
    async fn test_request_timeout_is_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/live"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(LIVE_RESPONSE)
                    .set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let mut config = ClientConfig::new("SECRETKEY123")
            .with_base_url(format!("{}/api/live", mock_server.uri()));
        config.timeout = Some(std::time::Duration::from_millis(200));
        let client = QuoteClient::new(config).unwrap();

        let err = client.fetch_all().await.unwrap_err();

        match &err {
            ForexError::Http(e) => assert!(e.is_timeout(), "expected timeout, got {e:?}"),
            other => panic!("Expected Http error, got {other:?}"),
        }
        assert!(!format!("{err:?}").contains("SECRETKEY123"));
    }
}
