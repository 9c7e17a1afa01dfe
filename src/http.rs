use reqwest::{header, Response, Url};
use tracing::{debug, error, instrument, warn};

use crate::{
    client::Netinfo,
    error::{ClientError, ResponseError},
};

/// HTTP transport scoped to a single feed request.
///
/// Each call opens its own session and drops it on return, so no pooled
/// connection outlives the request, including when the caller's future is
/// cancelled mid-flight.
pub(crate) struct TransportSession {
    client: reqwest::Client,
}

impl TransportSession {
    pub(crate) fn open(config: &Netinfo) -> Result<Self, ClientError> {
        let mut builder = reqwest::ClientBuilder::new()
            .https_only(config.https_only)
            .pool_max_idle_per_host(0);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        debug!("Opened transport session");
        Ok(Self { client })
    }

    #[instrument(skip(self, url), fields(url = %url))]
    pub(crate) async fn get_text(&self, url: Url) -> Result<String, ClientError> {
        let res = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!("Network error occurred: {}", e);
                ClientError::from(e)
            })?;

        let res = check_status(res).await?;
        debug!("HTTP request completed with status: {}", res.status());

        Ok(res.text().await?)
    }
}

impl Drop for TransportSession {
    fn drop(&mut self) {
        debug!("Closed transport session");
    }
}

async fn check_status(res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    error!(
        "Received HTTP error: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    );

    let body_text = res.text().await.unwrap_or_default();
    Err(ResponseError::http_status(status, body_text).into())
}
