use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Per-region lookup consumed by the status fetcher.
///
/// Implemented by whatever region registry the host application keeps. A region
/// without a netinfo timezone does not publish the status feed.
pub trait RegionInfo {
    /// Culture code used in the feed URL, e.g. `ja_JP`.
    fn culture_code(&self) -> &str;

    /// IANA timezone the feed's local timestamps are written in.
    fn netinfo_timezone(&self) -> Option<&str>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub culture_code: String,
    pub timezone: Option<String>,
}

impl Region {
    pub fn new(culture_code: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            culture_code: culture_code.into(),
            timezone: Some(timezone.into()),
        }
    }

    pub fn without_netinfo(culture_code: impl Into<String>) -> Self {
        Self {
            culture_code: culture_code.into(),
            timezone: None,
        }
    }
}

impl RegionInfo for Region {
    fn culture_code(&self) -> &str {
        &self.culture_code
    }

    fn netinfo_timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }
}

impl<T: RegionInfo + ?Sized> RegionInfo for &T {
    fn culture_code(&self) -> &str {
        (**self).culture_code()
    }

    fn netinfo_timezone(&self) -> Option<&str> {
        (**self).netinfo_timezone()
    }
}

/// Resolve the region's timezone, or report the region as unsupported.
///
/// Unknown identifiers are treated the same as a missing one.
pub(crate) fn resolve_timezone(region: &impl RegionInfo) -> Result<Tz, ClientError> {
    region
        .netinfo_timezone()
        .and_then(|name| Tz::from_str(name).ok())
        .ok_or_else(|| ClientError::unsupported_region(region.culture_code()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_timezone() {
        let region = Region::new("ja_JP", "Asia/Tokyo");
        assert_eq!(resolve_timezone(&region).unwrap(), chrono_tz::Asia::Tokyo);
    }

    #[test]
    fn test_missing_timezone_is_unsupported() {
        let region = Region::without_netinfo("ko_KR");
        let err = resolve_timezone(&region).unwrap_err();
        assert!(err.is_unsupported_region());
        assert!(err.to_string().contains("ko_KR"));
    }

    #[test]
    fn test_unknown_timezone_is_unsupported() {
        let region = Region::new("xx_XX", "Mars/Olympus_Mons");
        assert!(resolve_timezone(&region).unwrap_err().is_unsupported_region());
    }
}
