//! Lenient parsing of the date strings found in the netinfo feed.
//!
//! The feed writes local timestamps as loosely formatted strings such as
//! `2023-01-01 12 :00`, `2023/1/1 9:00`, `January 10, 2023 1:00 PM` or
//! `10 janvier 2023 13h00`. [`DateParser`] turns them into absolute,
//! timezone-aware [`DateTime`]s for a target zone.
//!
//! Parsing runs in stages: explicit offsets first, then relative fragments
//! (`tomorrow 10:00`, `in 3 hours`), then localized words are rewritten by
//! [`locale`] and the result is matched against date and time layouts ordered
//! by the culture's day/month convention.

mod locale;
mod relative;

use std::fmt::Debug;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tracing::debug;

use crate::error::DateTimeError;

use self::relative::Relative;

/// Order of the day and month fields in numeric `A/B/YYYY` dates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateOrder {
    MonthFirst,
    #[default]
    DayFirst,
}

impl DateOrder {
    /// Cultures that write the month first, e.g. `en_US` or `en-US`.
    pub fn for_culture(culture_code: &str) -> Self {
        let country = culture_code
            .rsplit(['_', '-'])
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        match country.as_str() {
            "US" | "PH" | "FM" | "MH" => Self::MonthFirst,
            _ => Self::DayFirst,
        }
    }

    fn numeric_date_formats(self) -> &'static [&'static str] {
        match self {
            Self::MonthFirst => &["%m/%d/%Y", "%m-%d-%Y"],
            Self::DayFirst => &["%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y"],
        }
    }
}

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M %z",
];

/// Year-first layouts, unambiguous in every culture.
const YMD_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y年%m月%d日"];

/// Layouts with a month name, which [`locale`] has already rewritten in English.
const NAMED_DATE_FORMATS: &[&str] = &["%B %d %Y", "%d %B %Y", "%Y %B %d"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

/// How a date and a time may sit next to each other.
const JOINERS: &[(&str, bool)] = &[(" ", false), ("T", false), ("", false), (" ", true)];

/// Rewrite the feed's `"HH :MM"` separator quirk into `"HH:MM"`.
pub fn normalize(raw: &str) -> String {
    raw.trim().replace(" :", ":")
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DateParser {
    order: DateOrder,
    reference: Option<DateTime<Utc>>,
}

impl DateParser {
    pub fn new(order: DateOrder) -> Self {
        Self {
            order,
            reference: None,
        }
    }

    pub fn for_culture(culture_code: &str) -> Self {
        Self::new(DateOrder::for_culture(culture_code))
    }

    /// Anchor relative fragments such as `tomorrow` to `reference` instead of
    /// the current time.
    pub fn with_reference(mut self, reference: DateTime<Utc>) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn order(&self) -> DateOrder {
        self.order
    }

    /// Parse `raw` as a wall-clock time in `tz`.
    ///
    /// Strings carrying an explicit offset or zone abbreviation are converted
    /// into `tz` instead. Local times skipped by a DST transition are rejected;
    /// repeated ones resolve to the earlier instant.
    pub fn parse_in<Z>(&self, raw: &str, tz: &Z) -> Result<DateTime<Z>, DateTimeError>
    where
        Z: TimeZone + Debug,
    {
        let input = normalize(raw);
        if input.is_empty() {
            return Err(DateTimeError::parse_error(raw, "empty date string"));
        }

        if let Some(fixed) = parse_with_offset(&input) {
            return Ok(fixed.with_timezone(tz));
        }

        if let Some(relative) = relative::recognise(&input) {
            return self.resolve_relative(raw, relative, tz);
        }

        let canonical = locale::canonicalize(&input);
        let naive = self
            .parse_naive(&canonical.text)
            .ok_or_else(|| DateTimeError::parse_error(raw, "unrecognised date format"))?;

        localize(raw, &naive, canonical.offset, tz)
    }

    /// Parse `raw` anchored to UTC, whatever the region.
    pub fn parse_utc(&self, raw: &str) -> Result<DateTime<Utc>, DateTimeError> {
        self.parse_in(raw, &Utc)
    }

    fn reference(&self) -> DateTime<Utc> {
        self.reference.unwrap_or_else(Utc::now)
    }

    fn resolve_relative<Z>(
        &self,
        raw: &str,
        relative: Relative<'_>,
        tz: &Z,
    ) -> Result<DateTime<Z>, DateTimeError>
    where
        Z: TimeZone + Debug,
    {
        let reference = self.reference();
        let out_of_range = || DateTimeError::parse_error(raw, "relative date out of range");

        match relative {
            Relative::Now => Ok(reference.with_timezone(tz)),
            Relative::Shift(delta) => reference
                .checked_add_signed(delta)
                .map(|shifted| shifted.with_timezone(tz))
                .ok_or_else(out_of_range),
            Relative::Day { days, rest } => {
                let delta = Duration::try_days(days).ok_or_else(out_of_range)?;
                if rest.is_empty() {
                    return reference
                        .checked_add_signed(delta)
                        .map(|shifted| shifted.with_timezone(tz))
                        .ok_or_else(out_of_range);
                }

                let date = reference
                    .with_timezone(tz)
                    .date_naive()
                    .checked_add_signed(delta)
                    .ok_or_else(out_of_range)?;
                let canonical = locale::canonicalize(rest);
                let time = parse_time(&canonical.text)
                    .ok_or_else(|| DateTimeError::parse_error(raw, "unrecognised time of day"))?;

                localize(raw, &date.and_time(time), canonical.offset, tz)
            }
        }
    }

    fn date_formats(&self) -> impl Iterator<Item = &'static str> {
        YMD_DATE_FORMATS
            .iter()
            .chain(NAMED_DATE_FORMATS)
            .chain(self.order.numeric_date_formats())
            .copied()
    }

    fn parse_naive(&self, input: &str) -> Option<NaiveDateTime> {
        let datetime = NaiveDateTime::parse_from_str(input, "%Y年%m月%d日%H時%M分")
            .ok()
            .or_else(|| {
                self.date_formats().find_map(|date| {
                    JOINERS.iter().find_map(|&(joiner, time_first)| {
                        TIME_FORMATS.iter().find_map(|time| {
                            let fmt = if time_first {
                                format!("{time}{joiner}{date}")
                            } else {
                                format!("{date}{joiner}{time}")
                            };
                            NaiveDateTime::parse_from_str(input, &fmt).ok()
                        })
                    })
                })
            });
        if datetime.is_some() {
            return datetime;
        }

        self.date_formats()
            .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .inspect(|_| debug!(input, "parsed date without time component as midnight"))
    }
}

fn parse_time(input: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(input, fmt).ok())
}

/// Pin a wall-clock time to `tz`, or to `offset` when the string named one.
fn localize<Z>(
    raw: &str,
    naive: &NaiveDateTime,
    offset: Option<FixedOffset>,
    tz: &Z,
) -> Result<DateTime<Z>, DateTimeError>
where
    Z: TimeZone + Debug,
{
    let local = match offset {
        Some(offset) => offset
            .from_local_datetime(naive)
            .single()
            .map(|fixed| fixed.with_timezone(tz)),
        None => tz.from_local_datetime(naive).earliest(),
    };

    local.ok_or_else(|| DateTimeError::NonexistentLocalTime {
        input: raw.to_string(),
        timezone: format!("{tz:?}"),
    })
}

fn parse_with_offset(input: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(input).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(input, fmt).ok())
    })
}
