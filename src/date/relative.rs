use chrono::Duration;

/// A date expressed relative to the parser's reference instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Relative<'a> {
    Now,
    Shift(Duration),
    /// A day offset plus whatever text followed the keyword (usually a time).
    Day { days: i64, rest: &'a str },
}

const TODAY: &[&str] = &[
    "today", "aujourd'hui", "heute", "hoy", "oggi", "vandaag", "hoje", "今日", "本日",
];
const TOMORROW: &[&str] = &[
    "tomorrow", "demain", "morgen", "mañana", "manana", "domani", "amanhã", "amanha", "明日",
];
const YESTERDAY: &[&str] = &[
    "yesterday", "hier", "gestern", "ayer", "ieri", "gisteren", "ontem", "昨日",
];
const NOW: &[&str] = &["now", "maintenant", "jetzt", "ahora", "adesso", "nu", "agora", "今"];

pub(super) fn recognise(text: &str) -> Option<Relative<'_>> {
    let text = text.trim();
    let lower = text.to_lowercase();
    if NOW.contains(&lower.as_str()) {
        return Some(Relative::Now);
    }

    let (first, rest) = match text.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (text, ""),
    };
    let first = first.to_lowercase();
    let days = if TODAY.contains(&first.as_str()) {
        0
    } else if TOMORROW.contains(&first.as_str()) {
        1
    } else if YESTERDAY.contains(&first.as_str()) {
        -1
    } else {
        return shift(&lower).map(Relative::Shift);
    };

    Some(Relative::Day { days, rest })
}

/// `in 3 hours` / `3 hours ago`.
fn shift(lower: &str) -> Option<Duration> {
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    let (sign, amount, unit) = match tokens.as_slice() {
        ["in", amount, unit] => (1, *amount, *unit),
        [amount, unit, "ago"] => (-1, *amount, *unit),
        _ => return None,
    };
    let amount: i64 = amount.parse().ok()?;
    let unit = unit.trim_end_matches('s');
    let duration = match unit {
        "second" | "sec" => Duration::try_seconds(amount),
        "minute" | "min" => Duration::try_minutes(amount),
        "hour" | "hr" => Duration::try_hours(amount),
        "day" => Duration::try_days(amount),
        "week" => Duration::try_weeks(amount),
        _ => None,
    }?;
    Some(if sign < 0 { -duration } else { duration })
}
