use serde::{Deserialize, Serialize};
use serde_repr::Serialize_repr;
use strum::{Display, EnumString};

use crate::{error::DataError, serde_utils::ordinal_from_string_or_number};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize_repr, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum PlatformType {
    Normal = 0,
    Offline = 1,
}

impl TryFrom<u64> for PlatformType {
    type Error = DataError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Normal),
            1 => Ok(Self::Offline),
            other => Err(DataError::unknown_value("platform type", other.to_string())),
        }
    }
}

impl From<PlatformType> for u8 {
    fn from(value: PlatformType) -> Self {
        value as u8
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlatformStatus {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub platform_type: PlatformType,
}

impl PlatformStatus {
    pub fn is_offline(&self) -> bool {
        self.platform_type == PlatformType::Offline
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlatformStatus {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", deserialize_with = "ordinal_from_string_or_number")]
    platform_type: u64,
}

impl TryFrom<RawPlatformStatus> for PlatformStatus {
    type Error = DataError;

    fn try_from(raw: RawPlatformStatus) -> Result<Self, Self::Error> {
        Ok(Self {
            name: raw.name,
            platform_type: raw.platform_type.try_into()?,
        })
    }
}
