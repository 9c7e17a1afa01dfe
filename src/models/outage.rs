use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_repr::Serialize_repr;
use strum::{Display, EnumString};

use crate::{
    date::DateParser,
    error::DataError,
    serde_utils::{non_empty_string, ordinal_from_string_or_number, required_nullable},
};

/// Lifecycle of an outage record.
///
/// The ordinal is the wire value. The names for 1 and 2 are inferred from how
/// the feed uses them and may not match the publisher's own wording.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize_repr, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum EventStatus {
    Planned = 0,
    Identified = 1,
    Ongoing = 2,
    Ended = 3,
}

impl TryFrom<u64> for EventStatus {
    type Error = DataError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Planned),
            1 => Ok(Self::Identified),
            2 => Ok(Self::Ongoing),
            3 => Ok(Self::Ended),
            other => Err(DataError::unknown_value("event status", other.to_string())),
        }
    }
}

impl From<EventStatus> for u8 {
    fn from(value: EventStatus) -> Self {
        value as u8
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlatformOutage {
    pub platform: Vec<String>,
    pub platform_image: Option<String>,
    pub software_title: String,
    pub message: String,
    pub free_write: String,
    pub begin: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub utc_del_time: Option<DateTime<Utc>>,
    pub event_status: EventStatus,
    pub services: Vec<String>,
    pub update_date: Option<DateTime<Tz>>,
}

impl PlatformOutage {
    pub fn affects(&self, platform: impl AsRef<str>) -> bool {
        self.platform.iter().any(|p| p == platform.as_ref())
    }

    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.event_status != EventStatus::Ended && self.begin <= at && at < self.end
    }

    pub fn is_ended(&self) -> bool {
        self.event_status == EventStatus::Ended
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlatformOutage {
    platform: Vec<String>,
    #[serde(deserialize_with = "required_nullable")]
    platform_image: Option<String>,
    software_title: String,
    message: String,
    free_write: String,
    begin: String,
    end: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    utc_del_time: Option<String>,
    #[serde(deserialize_with = "ordinal_from_string_or_number")]
    event_status: u64,
    #[serde(default)]
    services: Option<Vec<String>>,
    #[serde(default, deserialize_with = "non_empty_string")]
    update_date: Option<String>,
}

impl RawPlatformOutage {
    pub(crate) fn into_outage(
        self,
        tz: &Tz,
        parser: &DateParser,
    ) -> Result<PlatformOutage, DataError> {
        let local = |field: &'static str, raw: &str| {
            parser
                .parse_in(raw, tz)
                .map_err(|e| DataError::invalid_date(field, e))
        };

        Ok(PlatformOutage {
            begin: local("begin", &self.begin)?,
            end: local("end", &self.end)?,
            utc_del_time: self
                .utc_del_time
                .as_deref()
                .map(|raw| {
                    parser
                        .parse_utc(raw)
                        .map_err(|e| DataError::invalid_date("utc_del_time", e))
                })
                .transpose()?,
            update_date: self
                .update_date
                .as_deref()
                .map(|raw| local("update_date", raw))
                .transpose()?,
            event_status: self.event_status.try_into()?,
            platform: self.platform,
            platform_image: self.platform_image,
            software_title: self.software_title,
            message: self.message,
            free_write: self.free_write,
            services: self.services.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, TimeZone};
    use chrono_tz::Asia::Tokyo;
    use serde_json::{json, Value};

    fn outage_json() -> Value {
        json!({
            "platform": ["Nintendo Switch"],
            "platform_image": null,
            "software_title": "Splatoon 3",
            "message": "Online play is unavailable.",
            "free_write": "",
            "begin": "2023-01-01 12 :00",
            "end": "2023-01-01 13:00",
            "event_status": "2"
        })
    }

    fn build(value: Value) -> Result<PlatformOutage, DataError> {
        let raw: RawPlatformOutage = serde_json::from_value(value)?;
        raw.into_outage(&Tokyo, &DateParser::for_culture("ja_JP"))
    }

    #[test]
    fn test_event_status_ordinals() {
        for (ordinal, expected) in [
            (0, EventStatus::Planned),
            (1, EventStatus::Identified),
            (2, EventStatus::Ongoing),
            (3, EventStatus::Ended),
        ] {
            assert_eq!(EventStatus::try_from(ordinal).unwrap(), expected);
            assert_eq!(u64::from(u8::from(expected)), ordinal);
        }
        assert!(matches!(
            EventStatus::try_from(4),
            Err(DataError::UnknownValue { .. })
        ));
    }

    #[test]
    fn test_outage_from_minimal_record() {
        let outage = build(outage_json()).unwrap();
        assert_eq!(
            outage.begin,
            Tokyo.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(outage.begin.to_rfc3339(), "2023-01-01T12:00:00+09:00");
        assert_eq!(outage.event_status, EventStatus::Ongoing);
        assert!(outage.services.is_empty());
        assert!(outage.platform_image.is_none());
        assert!(outage.utc_del_time.is_none());
        assert!(outage.update_date.is_none());
    }

    #[test]
    fn test_utc_del_time_is_anchored_to_utc() {
        let mut value = outage_json();
        value["utc_del_time"] = json!("2023-01-02 03 :00");
        let outage = build(value).unwrap();
        let deleted = outage.utc_del_time.unwrap();
        assert_eq!(deleted.offset().fix().local_minus_utc(), 0);
        assert_eq!(deleted, Utc.with_ymd_and_hms(2023, 1, 2, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_optional_fields_when_present() {
        let mut value = outage_json();
        value["services"] = json!(["Online play", "eShop"]);
        value["update_date"] = json!("2023-01-01 12 :30");
        value["platform_image"] = json!("switch.png");
        let outage = build(value).unwrap();
        assert_eq!(outage.services, vec!["Online play", "eShop"]);
        assert_eq!(
            outage.update_date.unwrap(),
            Tokyo.with_ymd_and_hms(2023, 1, 1, 12, 30, 0).unwrap()
        );
        assert_eq!(outage.platform_image.as_deref(), Some("switch.png"));
    }

    #[test]
    fn test_empty_optional_dates_are_absent() {
        let mut value = outage_json();
        value["utc_del_time"] = json!("");
        value["update_date"] = Value::Null;
        let outage = build(value).unwrap();
        assert!(outage.utc_del_time.is_none());
        assert!(outage.update_date.is_none());
    }

    #[test]
    fn test_null_services_is_empty() {
        let mut value = outage_json();
        value["services"] = Value::Null;
        let outage = build(value).unwrap();
        assert!(outage.services.is_empty());
    }

    #[test]
    fn test_twelve_hour_clock_in_feed() {
        let mut value = outage_json();
        value["begin"] = json!("January 1, 2023 12:00 PM");
        value["end"] = json!("2023年1月1日(日) 午後1:00");
        let outage = build(value).unwrap();
        assert_eq!(outage.begin.to_rfc3339(), "2023-01-01T12:00:00+09:00");
        assert_eq!(outage.end.to_rfc3339(), "2023-01-01T13:00:00+09:00");
    }

    #[test]
    fn test_missing_required_key_is_named() {
        for key in [
            "platform",
            "platform_image",
            "software_title",
            "message",
            "free_write",
            "begin",
            "end",
            "event_status",
        ] {
            let mut value = outage_json();
            value.as_object_mut().unwrap().remove(key);
            let err = build(value).unwrap_err();
            assert!(matches!(err, DataError::Json(_)), "{key}: {err}");
            assert!(err.to_string().contains(key), "{key}: {err}");
        }
    }

    #[test]
    fn test_unknown_event_status_is_rejected() {
        let mut value = outage_json();
        value["event_status"] = json!(7);
        assert!(matches!(
            build(value),
            Err(DataError::UnknownValue { entity: "event status", .. })
        ));
    }

    #[test]
    fn test_unparseable_dates_are_rejected() {
        let mut value = outage_json();
        value["end"] = json!("soon");
        assert!(matches!(
            build(value),
            Err(DataError::InvalidDate { field: "end", .. })
        ));

        let mut value = outage_json();
        value["update_date"] = json!("yesterday-ish");
        assert!(matches!(
            build(value),
            Err(DataError::InvalidDate { field: "update_date", .. })
        ));
    }

    #[test]
    fn test_activity_window() {
        let outage = build(outage_json()).unwrap();
        let inside = Utc.with_ymd_and_hms(2023, 1, 1, 3, 30, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2023, 1, 1, 4, 0, 0).unwrap();
        assert!(outage.is_active_at(inside));
        assert!(!outage.is_active_at(after));
        assert!(outage.affects("Nintendo Switch"));
        assert!(!outage.affects("Wii U"));
    }
}
