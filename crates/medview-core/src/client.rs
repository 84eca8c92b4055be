use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use crate::config::EndpointConfig;
use crate::error::{Error, Result};
use crate::id::PatientId;

/// A successful response: status code and parsed body.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub status: u16,
    pub body: Value,
}

/// Anything that can produce the raw profile document for a patient.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, id: &PatientId) -> Result<Fetched>;
}

/// HTTP client for the ORDS patient profile endpoint.
///
/// One GET per call, no retries. The underlying connection pool is reused
/// across calls.
pub struct OrdsClient {
    http: reqwest::Client,
    config: EndpointConfig,
}

impl OrdsClient {
    pub fn new(config: EndpointConfig) -> Result<Self> {
        if !config.verify_tls() {
            tracing::warn!(
                endpoint = %config.endpoint(),
                "TLS certificate verification is disabled"
            );
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.verify_tls())
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    async fn get(&self, url: Url) -> Result<Fetched> {
        tracing::debug!(url = %url, "Fetching patient profile");

        let mut req = self.http.get(url.clone()).header(ACCEPT, "application/json");
        if let Some(creds) = self.config.credentials() {
            req = req.basic_auth(&creds.username, Some(&creds.password));
        }

        let resp = req.send().await.map_err(|e| classify(&e, &url))?;
        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(url = %url, status = status.as_u16(), "Patient profile request failed");
            return Err(Error::http_status(status.as_u16(), url.as_str()));
        }

        let body = resp.bytes().await.map_err(|e| classify(&e, &url))?;
        let body: Value = serde_json::from_slice(&body).inspect_err(|e| {
            tracing::debug!(url = %url, error = %e, "Response body is not valid JSON");
        })?;

        tracing::info!(url = %url, status = status.as_u16(), "Patient profile fetched");
        Ok(Fetched {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RecordSource for OrdsClient {
    async fn fetch(&self, id: &PatientId) -> Result<Fetched> {
        let url = self.config.patient_url(id)?;
        self.get(url).await
    }
}

/// One-off fetch with a throwaway client. Returns the parsed body only.
pub async fn fetch(id: &PatientId, config: &EndpointConfig) -> Result<Value> {
    let client = OrdsClient::new(config.clone())?;
    Ok(client.fetch(id).await?.body)
}

fn classify(err: &reqwest::Error, url: &Url) -> Error {
    let error = if err.is_timeout() {
        Error::timeout(url.as_str())
    } else if err.is_connect() {
        Error::connection(url.as_str(), error_chain(err))
    } else {
        Error::other(error_chain(err))
    };
    tracing::debug!(url = %url, kind = %error.kind(), error = %err, "Patient profile request failed");
    error
}

/// `err` and its sources joined with `: `.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}
