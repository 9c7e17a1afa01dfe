use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    date::DateParser,
    error::{ClientError, DataError},
    region::{resolve_timezone, RegionInfo},
};

use super::{
    outage::{EventStatus, PlatformOutage, RawPlatformOutage},
    platform::{PlatformStatus, RawPlatformStatus},
};

/// One parsed snapshot of a region's netinfo feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Status {
    pub lang: Option<String>,
    pub categories: Vec<PlatformStatus>,
    pub operational_statuses: Vec<PlatformOutage>,
    pub temporary_maintenances: Vec<PlatformOutage>,
}

impl Status {
    /// Decode a feed document for `region`.
    pub fn from_json(body: &str, region: &impl RegionInfo) -> Result<Self, ClientError> {
        let tz = resolve_timezone(region)?;
        Ok(Self::decode(body, &tz, region.culture_code())?)
    }

    pub(crate) fn decode(body: &str, tz: &Tz, culture_code: &str) -> Result<Self, DataError> {
        let raw = serde_json::from_str::<RawStatus>(body)?;
        raw.into_status(tz, &DateParser::for_culture(culture_code))
    }

    /// Same as [`Status::from_json`] for an already decoded document.
    pub fn from_value(value: Value, region: &impl RegionInfo) -> Result<Self, ClientError> {
        let tz = resolve_timezone(region)?;
        let raw = serde_json::from_value::<RawStatus>(value)?;
        Ok(raw.into_status(&tz, &DateParser::for_culture(region.culture_code()))?)
    }

    /// Active incidents first, then scheduled maintenances.
    pub fn outages(&self) -> impl Iterator<Item = &PlatformOutage> {
        self.operational_statuses
            .iter()
            .chain(&self.temporary_maintenances)
    }

    pub fn outages_for_platform<'a>(
        &'a self,
        platform: &'a str,
    ) -> impl Iterator<Item = &'a PlatformOutage> + 'a {
        self.outages().filter(move |o| o.affects(platform))
    }

    /// Whether any operational incident has not been marked as ended.
    pub fn is_degraded(&self) -> bool {
        self.operational_statuses
            .iter()
            .any(|o| o.event_status != EventStatus::Ended)
    }

    pub fn offline_categories(&self) -> impl Iterator<Item = &PlatformStatus> {
        self.categories.iter().filter(|c| c.is_offline())
    }
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(default)]
    lang: Option<String>,
    categories: Vec<RawPlatformStatus>,
    operational_statuses: Vec<RawPlatformOutage>,
    temporary_maintenances: Vec<RawPlatformOutage>,
}

impl RawStatus {
    fn into_status(self, tz: &Tz, parser: &DateParser) -> Result<Status, DataError> {
        debug!(
            categories = self.categories.len(),
            operational_statuses = self.operational_statuses.len(),
            temporary_maintenances = self.temporary_maintenances.len(),
            "mapping netinfo feed"
        );

        Ok(Status {
            lang: self.lang,
            categories: self
                .categories
                .into_iter()
                .map(PlatformStatus::try_from)
                .collect::<Result<_, _>>()?,
            operational_statuses: self
                .operational_statuses
                .into_iter()
                .map(|raw| raw.into_outage(tz, parser))
                .collect::<Result<_, _>>()?,
            temporary_maintenances: self
                .temporary_maintenances
                .into_iter()
                .map(|raw| raw.into_outage(tz, parser))
                .collect::<Result<_, _>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::PlatformType,
        region::Region,
    };
    use chrono::{TimeZone, Utc};
    use chrono_tz::Asia::Tokyo;
    use serde_json::json;

    fn tokyo() -> Region {
        Region::new("ja_JP", "Asia/Tokyo")
    }

    fn outage(title: &str, platform: &str, status: u8) -> Value {
        json!({
            "platform": [platform],
            "platform_image": null,
            "software_title": title,
            "message": format!("{title} is affected"),
            "free_write": "",
            "begin": "2023-01-01 12 :00",
            "end": "2023-01-01 13 :00",
            "event_status": status,
        })
    }

    fn feed() -> Value {
        json!({
            "lang": "ja",
            "categories": [
                { "name": "Nintendo Switch", "type": 0 },
                { "name": "Wii U", "type": 1 },
                { "name": "Nintendo 3DS", "type": 0 }
            ],
            "operational_statuses": [
                outage("Splatoon 3", "Nintendo Switch", 2),
                outage("Mario Kart 8", "Wii U", 3)
            ],
            "temporary_maintenances": [
                outage("eShop", "Nintendo 3DS", 0),
                outage("Friend list", "Nintendo Switch", 0),
                outage("Nintendo Account", "Wii U", 1)
            ]
        })
    }

    #[test]
    fn test_preserves_feed_order() {
        let status = Status::from_value(feed(), &tokyo()).unwrap();
        assert_eq!(status.lang.as_deref(), Some("ja"));

        let names: Vec<_> = status
            .categories
            .iter()
            .map(|c| c.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, ["Nintendo Switch", "Wii U", "Nintendo 3DS"]);

        let titles: Vec<_> = status
            .temporary_maintenances
            .iter()
            .map(|o| o.software_title.as_str())
            .collect();
        assert_eq!(titles, ["eShop", "Friend list", "Nintendo Account"]);
        assert_eq!(status.operational_statuses.len(), 2);
    }

    #[test]
    fn test_json_text_and_value_agree() {
        let text = serde_json::to_string(&feed()).unwrap();
        let from_text = Status::from_json(&text, &tokyo()).unwrap();
        let from_value = Status::from_value(feed(), &tokyo()).unwrap();
        assert_eq!(from_text, from_value);
    }

    #[test]
    fn test_expected_fields() {
        let status = Status::from_value(feed(), &tokyo()).unwrap();
        let first = &status.operational_statuses[0];
        assert_eq!(first.event_status, EventStatus::Ongoing);
        assert_eq!(first.begin, Tokyo.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap());
        assert_eq!(first.end, Tokyo.with_ymd_and_hms(2023, 1, 1, 13, 0, 0).unwrap());
        assert_eq!(status.categories[1].platform_type, PlatformType::Offline);
    }

    #[test]
    fn test_missing_top_level_arrays_are_malformed() {
        for key in ["categories", "operational_statuses", "temporary_maintenances"] {
            let mut value = feed();
            value.as_object_mut().unwrap().remove(key);
            let err = Status::from_value(value, &tokyo()).unwrap_err();
            assert!(err.is_malformed_feed(), "{key}: {err}");
            assert!(err.to_string().contains(key), "{key}: {err}");

            let mut value = feed();
            value[key] = Value::Null;
            assert!(Status::from_value(value, &tokyo()).unwrap_err().is_malformed_feed());
        }
    }

    #[test]
    fn test_missing_lang_is_allowed() {
        let mut value = feed();
        value.as_object_mut().unwrap().remove("lang");
        assert!(Status::from_value(value, &tokyo()).unwrap().lang.is_none());
    }

    #[test]
    fn test_one_bad_record_fails_whole_status() {
        let mut value = feed();
        value["temporary_maintenances"][2]["event_status"] = json!("9");
        let err = Status::from_value(value, &tokyo()).unwrap_err();
        assert!(matches!(
            err,
            ClientError::MalformedFeed(DataError::UnknownValue { .. })
        ));

        let mut value = feed();
        value["categories"][0]["type"] = json!(5);
        assert!(Status::from_value(value, &tokyo()).unwrap_err().is_malformed_feed());
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = Status::from_json("<html>maintenance</html>", &tokyo()).unwrap_err();
        assert!(err.is_malformed_feed());
    }

    #[test]
    fn test_unsupported_region_is_checked_first() {
        let err = Status::from_value(feed(), &Region::without_netinfo("ko_KR")).unwrap_err();
        assert!(err.is_unsupported_region());
    }

    #[test]
    fn test_query_helpers() {
        let status = Status::from_value(feed(), &tokyo()).unwrap();
        assert!(status.is_degraded());
        assert_eq!(status.outages().count(), 5);

        let switch: Vec<_> = status
            .outages_for_platform("Nintendo Switch")
            .map(|o| o.software_title.as_str())
            .collect();
        assert_eq!(switch, ["Splatoon 3", "Friend list"]);

        let offline: Vec<_> = status
            .offline_categories()
            .filter_map(|c| c.name.as_deref())
            .collect();
        assert_eq!(offline, ["Wii U"]);

        let noon_in_tokyo = Utc.with_ymd_and_hms(2023, 1, 1, 3, 15, 0).unwrap();
        let active: Vec<_> = status
            .outages()
            .filter(|o| o.is_active_at(noon_in_tokyo))
            .map(|o| o.software_title.as_str())
            .collect();
        assert_eq!(active, ["Splatoon 3", "eShop", "Friend list", "Nintendo Account"]);
    }

    #[test]
    fn test_not_degraded_when_all_ended() {
        let mut value = feed();
        value["operational_statuses"] = json!([outage("Splatoon 3", "Nintendo Switch", 3)]);
        assert!(!Status::from_value(value, &tokyo()).unwrap().is_degraded());
    }
}
