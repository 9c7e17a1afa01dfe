use tracing::{error, info, instrument};

use crate::{
    client::Netinfo,
    error::ClientError,
    http::TransportSession,
    models::Status,
    region::{resolve_timezone, RegionInfo},
};

impl Netinfo {
    /// Fetch and parse the current status feed for `region`.
    ///
    /// Regions without a netinfo timezone fail with
    /// [`ClientError::UnsupportedRegion`] before any request is made.
    #[instrument(skip(self, region), fields(culture_code = region.culture_code()))]
    pub async fn status(&self, region: &impl RegionInfo) -> Result<Status, ClientError> {
        let tz = resolve_timezone(region)?;
        let url = self.status_url(region.culture_code())?;

        let session = TransportSession::open(self)?;
        let body = session.get_text(url).await?;
        drop(session);

        match Status::decode(&body, &tz, region.culture_code()) {
            Ok(status) => {
                info!(
                    operational = status.operational_statuses.len(),
                    maintenances = status.temporary_maintenances.len(),
                    "Fetched netinfo status"
                );
                Ok(status)
            }
            Err(e) => {
                error!("Failed to map netinfo feed: {}", e);
                Err(e.into())
            }
        }
    }
}

/// Fetch the status feed for `region` with a default [`Netinfo`] client.
pub async fn get_status(region: &impl RegionInfo) -> Result<Status, ClientError> {
    Netinfo::default().status(region).await
}
