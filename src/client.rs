use std::time::Duration;

use bon::Builder;
use reqwest::Url;
use tracing::debug;

use crate::{error::ClientError, paths};

/// Netinfo feed client.
///
/// Holds configuration only; every request opens and closes its own HTTP
/// session, so a `Netinfo` can be shared freely between tasks.
#[derive(Clone, Debug, Builder)]
pub struct Netinfo {
    #[builder(into, default = paths::BASE_URL.to_string())]
    pub(crate) base_url: String,
    pub(crate) timeout: Option<Duration>,
    #[builder(default = true)]
    pub(crate) https_only: bool,
    #[builder(into)]
    pub(crate) user_agent: Option<String>,
}

impl Default for Netinfo {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Netinfo {
    /// Build a client from `NETINFO_BASE_URL` and `NETINFO_TIMEOUT_SECS`.
    ///
    /// Unset variables fall back to the defaults.
    pub fn load_from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var("NETINFO_BASE_URL").ok();
        let timeout = std::env::var("NETINFO_TIMEOUT_SECS")
            .ok()
            .map(|secs| {
                secs.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                    ClientError::InvalidConfig(format!(
                        "NETINFO_TIMEOUT_SECS must be a whole number of seconds, got '{secs}'"
                    ))
                })
            })
            .transpose()?;

        let client = Self::builder()
            .maybe_base_url(base_url)
            .maybe_timeout(timeout)
            .build();
        client.base()?;

        debug!(base_url = %client.base_url, ?timeout, "Loaded netinfo client from environment");
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn base(&self) -> Result<Url, ClientError> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
            .map_err(|e| ClientError::InvalidConfig(format!("Invalid base URL '{}': {e}", self.base_url)))
    }

    pub(crate) fn status_url(&self, culture_code: &str) -> Result<Url, ClientError> {
        let path = paths::status_path(culture_code);
        self.base()?
            .join(&path)
            .map_err(|e| ClientError::InvalidConfig(format!("Invalid path '{path}': {e}")))
    }
}
