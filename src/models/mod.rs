mod outage;
mod platform;
mod status;

pub use outage::{EventStatus, PlatformOutage};
pub use platform::{PlatformStatus, PlatformType};
pub use status::Status;
