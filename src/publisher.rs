//! Pushgateway HTTP publisher
//!
//! Builds the grouping URL from the resolved job/instance and issues the
//! single outbound POST for one invocation. No retry and no timeout beyond
//! the transport defaults.

use reqwest::{header, Client, ClientBuilder};
use tracing::{debug, instrument};

use crate::error::PublishError;

/// Pushgateway HTTP client
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
    content_type: String,
}

impl GatewayClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Pushgateway metrics API URL (e.g. "http://127.0.0.1:9091/metrics")
    /// * `content_type` - Content type of the POST body
    pub fn new(base_url: &str, content_type: &str) -> Result<Self, PublishError> {
        let client = ClientBuilder::new()
            .build()
            .map_err(PublishError::HttpClientInit)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            content_type: content_type.to_string(),
        })
    }

    /// Build the grouping URL for a job/instance pair
    ///
    /// The job segment is always present, even when the job is empty; the
    /// instance segment is appended only for a non-empty instance.
    pub fn push_url(&self, job: &str, instance: &str) -> String {
        let mut url = format!("{}/job/{}", self.base_url, job);
        if !instance.is_empty() {
            url.push_str("/instance/");
            url.push_str(instance);
        }
        url
    }

    /// Push a serialized payload to the Pushgateway
    ///
    /// Issues exactly one POST and reads the full response body. Returns
    /// the body verbatim on a 2xx status; any transport failure, unreadable
    /// body, or non-2xx status is a terminal error.
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    pub async fn push(
        &self,
        job: &str,
        instance: &str,
        body: String,
    ) -> Result<String, PublishError> {
        let url = self.push_url(job, instance);

        debug!(url = %url, "Posting metrics to Pushgateway");

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, &self.content_type)
            .body(body)
            .send()
            .await
            .map_err(PublishError::from)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(PublishError::HttpResponse)?;

        if !status.is_success() {
            return Err(PublishError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}
