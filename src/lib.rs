pub mod api;
pub mod client;
pub mod date;
pub mod error;
mod http;
pub mod models;
pub mod paths;
pub mod region;
mod serde_utils;

pub use api::status::get_status;

pub mod prelude {
    pub use crate::client::Netinfo;
    pub use crate::error::ClientError;
    pub use crate::models::{EventStatus, PlatformOutage, PlatformStatus, PlatformType, Status};
    pub use crate::region::{Region, RegionInfo};
}
