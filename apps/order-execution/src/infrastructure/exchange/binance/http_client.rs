//! Signed HTTP client with retry.

use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::api_types::BinanceErrorResponse;
use super::config::BinanceConfig;
use super::error::BinanceError;
use super::signer::HmacSigner;
use crate::resilience::{AttemptError, RetryError, RetryPolicy, retry_with_backoff};

/// API key header.
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// HTTP client for the Binance REST API.
///
/// Every attempt is signed afresh (new `timestamp`, new `signature`); the
/// order parameters themselves are identical across attempts.
#[derive(Debug, Clone)]
pub struct BinanceHttpClient {
    client: Client,
    api_key: String,
    signer: HmacSigner,
    base_url: Url,
    recv_window_ms: u64,
    retry: RetryPolicy,
}

impl BinanceHttpClient {
    /// Create a new HTTP client from config.
    ///
    /// # Errors
    ///
    /// `MissingCredentials` if the key or secret is empty, `Request` if the
    /// base URL is invalid or the client cannot be built.
    pub fn new(config: &BinanceConfig) -> Result<Self, BinanceError> {
        if !config.has_credentials() {
            return Err(BinanceError::MissingCredentials);
        }

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BinanceError::Request(format!("invalid base URL '{}': {e}", config.base_url)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BinanceError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            signer: HmacSigner::new(config.api_secret.clone()),
            base_url,
            recv_window_ms: config.recv_window_ms,
            retry: config.retry.clone(),
        })
    }

    /// Send a signed request, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the final [`RetryError`] once the request cannot succeed.
    pub async fn send_signed<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, RetryError<BinanceError>> {
        retry_with_backoff(&self.retry, cancel, |attempt| {
            self.attempt(method.clone(), path, params, attempt)
        })
        .await
    }

    /// One signed request.
    async fn attempt<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        attempt: u32,
    ) -> Result<T, AttemptError<BinanceError>> {
        let payload = self
            .signed_payload(params, Utc::now().timestamp_millis())
            .map_err(AttemptError::Permanent)?;
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| AttemptError::Permanent(BinanceError::Request(e.to_string())))?;

        tracing::debug!(method = %method, path, attempt, "sending exchange request");

        let request = if method == Method::POST {
            self.client
                .post(url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(payload)
        } else {
            url.set_query(Some(&payload));
            self.client.request(method, url)
        };

        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| BinanceError::from(e).into_attempt_error())?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Transient(BinanceError::Network(e.to_string())))?;

        if status.is_success() {
            return serde_json::from_str(&body)
                .map_err(|e| AttemptError::Permanent(BinanceError::Decode(e.to_string())));
        }

        let error = if status.is_server_error() {
            BinanceError::Server {
                status: status.as_u16(),
                body,
            }
        } else {
            match serde_json::from_str::<BinanceErrorResponse>(&body) {
                Ok(api) => BinanceError::Api {
                    status: status.as_u16(),
                    code: Some(api.code),
                    message: api.msg,
                },
                Err(_) => BinanceError::Api {
                    status: status.as_u16(),
                    code: None,
                    message: if body.trim().is_empty() {
                        status.canonical_reason().unwrap_or("unknown").to_string()
                    } else {
                        body
                    },
                },
            }
        };

        Err(error.into_attempt_error())
    }

    /// `params&timestamp=..&recvWindow=..&signature=..`, form-encoded.
    fn signed_payload(
        &self,
        params: &[(&'static str, String)],
        timestamp_ms: i64,
    ) -> Result<String, BinanceError> {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            query.append_pair(key, value);
        }
        query.append_pair("timestamp", &timestamp_ms.to_string());
        query.append_pair("recvWindow", &self.recv_window_ms.to_string());
        let unsigned = query.finish();

        let signature = self.signer.sign(&unsigned)?;
        Ok(format!("{unsigned}&signature={signature}"))
    }
}
