//! OpenBao Transit client for token verifiers.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Connection settings for an OpenBao instance.
#[derive(Debug, Clone)]
pub struct OpenBaoConfig {
    /// Server address, e.g. `http://localhost:8200`.
    pub addr: String,

    /// Authentication token.
    pub token: String,

    /// Transit key used for HMAC operations.
    pub transit_key: String,
}

/// Computes and checks keyed verifiers for token secrets.
#[automock]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verifier to store for `input`.
    async fn sign(&self, input: &[u8]) -> Result<String, OpenBaoError>;

    /// Whether `verifier` was produced from `input`.
    async fn verify(&self, input: &[u8], verifier: &str) -> Result<bool, OpenBaoError>;
}

/// HTTP client for OpenBao Transit HMAC operations.
#[derive(Debug, Clone)]
pub struct OpenBaoClient {
    config: OpenBaoConfig,
    http: Client,
}

impl OpenBaoClient {
    #[must_use]
    pub fn new(config: OpenBaoConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn url(&self, operation: &str) -> String {
        format!(
            "{}/v1/transit/{operation}/{}",
            self.config.addr.trim_end_matches('/'),
            self.config.transit_key
        )
    }

    async fn transit<B, T>(&self, operation: &str, body: &B) -> Result<T, OpenBaoError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.url(operation))
            .header("X-Vault-Token", &self.config.token)
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            return Err(OpenBaoError::UnexpectedResponse(format!(
                "{operation} request failed with status {status}: {text}"
            )));
        }

        let envelope: TransitResponse<T> = response.json().await?;

        Ok(envelope.data)
    }
}

#[async_trait]
impl TokenVerifier for OpenBaoClient {
    async fn sign(&self, input: &[u8]) -> Result<String, OpenBaoError> {
        let data: HmacData = self
            .transit("hmac", &HmacRequest {
                input: BASE64.encode(input),
            })
            .await?;

        Ok(data.hmac)
    }

    async fn verify(&self, input: &[u8], verifier: &str) -> Result<bool, OpenBaoError> {
        let data: VerifyData = self
            .transit("verify", &VerifyRequest {
                input: BASE64.encode(input),
                hmac: verifier,
            })
            .await?;

        Ok(data.valid)
    }
}

#[derive(Debug, Serialize)]
struct HmacRequest {
    input: String,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    input: String,
    hmac: &'a str,
}

#[derive(Debug, Deserialize)]
struct TransitResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct HmacData {
    hmac: String,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    valid: bool,
}

/// Errors talking to OpenBao.
#[derive(Debug, Error)]
pub enum OpenBaoError {
    /// Transport or body decoding failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("unexpected response from OpenBao: {0}")]
    UnexpectedResponse(String),
}
