use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::document::Document;
use crate::error::{Result, SubmitError};
use crate::http::pool::create_http_client;
use crate::http::rate_limiter::RateGate;
use crate::http::transport::{HttpTransport, OutboundRequest, ReqwestTransport, SubmissionOutcome};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const SIGNATURE_HEADER: &str = "Signature";

/// Posts documents to a single endpoint, never more often than its gate allows.
#[derive(Clone)]
pub struct SubmissionClient {
    gate: RateGate,
    endpoint: Url,
    transport: Arc<dyn HttpTransport>,
}

impl SubmissionClient {
    /// Build a gate and a pooled reqwest transport from `config`.
    /// Must be called from within a Tokio runtime.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let endpoint = parse_endpoint(&config.endpoint)?;
        let client = create_http_client(&config.http)?;
        let gate = RateGate::new(config.request_limit, config.window())?;

        info!(
            endpoint = %endpoint,
            limit = config.request_limit,
            window = ?config.window(),
            "Submission client ready"
        );

        Ok(Self {
            gate,
            endpoint,
            transport: Arc::new(ReqwestTransport::new(client)),
        })
    }

    pub fn with_transport(
        gate: RateGate,
        endpoint: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        Ok(Self {
            gate,
            endpoint: parse_endpoint(endpoint)?,
            transport,
        })
    }

    /// Submit one document.
    ///
    /// Waits for a permit first, so the call can block for up to one window.
    /// Serialization runs after the permit is taken, so a serialization
    /// error would still spend it. `Document` only holds strings, dates and
    /// lists, which always serialize, so in practice that path is not taken.
    /// Non-2xx responses come back as outcomes; nothing is retried.
    pub async fn submit(&self, document: &Document, signature: &str) -> Result<SubmissionOutcome> {
        self.gate.acquire().await?;

        let stats = self.gate.stats();
        let result = self.send(document, signature).await;
        match &result {
            Ok(outcome) => {
                stats.inc_submissions_ok();
                info!(status = outcome.status, doc_id = %document.doc_id, "Response status code: {}", outcome.status);
                debug!(body = %outcome.body, "Response body");
            }
            Err(e) => {
                stats.inc_submissions_failed();
                warn!(doc_id = %document.doc_id, "Submission failed: {}", e);
            }
        }
        result
    }

    async fn send(&self, document: &Document, signature: &str) -> Result<SubmissionOutcome> {
        let body = serde_json::to_string(document)?;

        let request = OutboundRequest {
            url: self.endpoint.clone(),
            headers: vec![
                ("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()),
                (SIGNATURE_HEADER.to_string(), signature.to_string()),
            ],
            body,
        };

        debug!(url = %request.url, bytes = request.body.len(), "Sending HTTP request");

        self.transport.post(request).await
    }

    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn shutdown(&self) {
        self.gate.shutdown();
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    Url::parse(endpoint)
        .map_err(|e| SubmitError::InvalidConfiguration(format!("Invalid endpoint {}: {}", endpoint, e)))
}
