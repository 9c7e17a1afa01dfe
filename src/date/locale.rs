//! Token-level rewriting of localized date strings into a form chrono can read.
//!
//! Month names in the supported languages become English abbreviations, weekday
//! names and filler words are dropped, ordinal suffixes are stripped, meridiem
//! markers become `AM`/`PM`, and a trailing zone abbreviation is lifted out as a
//! fixed offset.

use chrono::FixedOffset;

const ENGLISH_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTH_NAMES: &[(&str, usize)] = &[
    // en
    ("january", 1), ("jan", 1), ("february", 2), ("feb", 2), ("march", 3), ("mar", 3),
    ("april", 4), ("apr", 4), ("may", 5), ("june", 6), ("jun", 6), ("july", 7), ("jul", 7),
    ("august", 8), ("aug", 8), ("september", 9), ("sept", 9), ("sep", 9), ("october", 10),
    ("oct", 10), ("november", 11), ("nov", 11), ("december", 12), ("dec", 12),
    // fr
    ("janvier", 1), ("janv", 1), ("février", 2), ("fevrier", 2), ("févr", 2), ("fevr", 2),
    ("mars", 3), ("avril", 4), ("avr", 4), ("mai", 5), ("juin", 6), ("juillet", 7),
    ("juil", 7), ("août", 8), ("aout", 8), ("septembre", 9), ("octobre", 10),
    ("novembre", 11), ("décembre", 12), ("decembre", 12), ("déc", 12),
    // de
    ("januar", 1), ("jänner", 1), ("jän", 1), ("februar", 2), ("märz", 3), ("maerz", 3),
    ("mär", 3), ("juni", 6), ("juli", 7), ("oktober", 10), ("okt", 10), ("dezember", 12),
    ("dez", 12),
    // es
    ("enero", 1), ("ene", 1), ("febrero", 2), ("marzo", 3), ("abril", 4), ("abr", 4),
    ("mayo", 5), ("junio", 6), ("julio", 7), ("agosto", 8), ("ago", 8), ("septiembre", 9),
    ("setiembre", 9), ("octubre", 10), ("noviembre", 11), ("diciembre", 12), ("dic", 12),
    // it
    ("gennaio", 1), ("gen", 1), ("febbraio", 2), ("aprile", 4), ("maggio", 5), ("mag", 5),
    ("giugno", 6), ("giu", 6), ("luglio", 7), ("lug", 7), ("settembre", 9), ("set", 9),
    ("ottobre", 10), ("ott", 10), ("dicembre", 12),
    // nl
    ("januari", 1), ("februari", 2), ("maart", 3), ("mrt", 3), ("mei", 5),
    ("augustus", 8), ("december", 12),
    // pt
    ("janeiro", 1), ("fevereiro", 2), ("fev", 2), ("março", 3), ("marco", 3), ("maio", 5),
    ("junho", 6), ("julho", 7), ("setembro", 9), ("outubro", 10), ("out", 10),
    ("novembro", 11), ("dezembro", 12),
];

const WEEKDAY_NAMES: &[&str] = &[
    "monday", "mon", "tuesday", "tue", "tues", "wednesday", "wed", "thursday", "thu",
    "thurs", "friday", "fri", "saturday", "sat", "sunday", "sun",
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
    "montag", "dienstag", "mittwoch", "donnerstag", "freitag", "samstag", "sonntag",
    "lunes", "martes", "miércoles", "miercoles", "jueves", "viernes", "sábado", "sabado",
    "domingo",
    "lunedì", "lunedi", "martedì", "martedi", "mercoledì", "mercoledi", "giovedì",
    "giovedi", "venerdì", "venerdi", "sabato", "domenica",
    "maandag", "dinsdag", "woensdag", "donderdag", "vrijdag", "zaterdag", "zondag",
    "segunda-feira", "terça-feira", "terca-feira", "quarta-feira", "quinta-feira",
    "sexta-feira",
];

const FILLER_WORDS: &[&str] = &[
    "at", "on", "the", "of", "à", "le", "um", "uhr", "den", "de", "del", "el", "alle", "om",
    "às", "as",
];

const ZONE_ABBREVIATIONS: &[(&str, i32)] = &[
    ("utc", 0), ("gmt", 0), ("z", 0), ("wet", 0), ("bst", 1), ("cet", 1), ("cest", 2),
    ("eet", 2), ("eest", 3), ("jst", 9), ("kst", 9), ("aest", 10), ("aedt", 11),
    ("nzst", 12), ("nzdt", 13), ("est", -5), ("edt", -4), ("cdt", -5), ("mst", -7),
    ("mdt", -6), ("pst", -8), ("pdt", -7),
];

const ORDINAL_SUFFIXES: &[&str] = &["st", "nd", "rd", "th", "er", "e", "º", "°", "."];

/// Weekday characters used inside `(火)`-style annotations.
const CJK_WEEKDAYS: &str = "月火水木金土日祝曜";

#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct Canonical {
    pub text: String,
    pub offset: Option<FixedOffset>,
}

pub(super) fn canonicalize(input: &str) -> Canonical {
    let input = strip_bracketed_weekday(input).replace([',', '，'], " ");

    let mut out: Vec<String> = Vec::new();
    let mut offset = None;
    let mut pending_meridiem: Option<&'static str> = None;

    for token in input.split_whitespace() {
        let (token, cjk_meridiem) = split_cjk_meridiem(token);
        if cjk_meridiem.is_some() {
            pending_meridiem = cjk_meridiem;
        }
        if token.is_empty() {
            continue;
        }

        let lower = token.to_lowercase();
        let key = lower.trim_end_matches('.');

        if let Some(meridiem) = meridiem(&lower) {
            // German "am 10. Januar" uses "am" as a preposition.
            if key == "am" && !out.last().is_some_and(|t| looks_like_time(t)) {
                continue;
            }
            push_meridiem(&mut out, meridiem);
            continue;
        }
        if FILLER_WORDS.contains(&key) || WEEKDAY_NAMES.contains(&key) {
            continue;
        }
        if let Some(month) = month_number(key) {
            out.push(ENGLISH_MONTHS[month - 1].to_string());
            continue;
        }
        if let Some(fixed) = zone_offset(key) {
            offset = Some(fixed);
            continue;
        }

        let (body, attached) = split_attached_meridiem(&lower, token);
        out.push(strip_ordinal(&hour_marker(body)));
        if let Some(meridiem) = attached.or_else(|| pending_meridiem.take()) {
            push_meridiem(&mut out, meridiem);
        }
    }

    Canonical {
        text: out.join(" "),
        offset,
    }
}

fn month_number(key: &str) -> Option<usize> {
    MONTH_NAMES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, month)| *month)
}

fn meridiem(lower: &str) -> Option<&'static str> {
    match lower.replace('.', "").as_str() {
        "am" => Some("AM"),
        "pm" => Some("PM"),
        _ => None,
    }
}

fn push_meridiem(out: &mut Vec<String>, meridiem: &'static str) {
    // "1 PM" carries no minutes; chrono needs them.
    if let Some(last) = out.last_mut() {
        if !last.is_empty() && last.len() <= 2 && last.chars().all(|c| c.is_ascii_digit()) {
            last.push_str(":00");
        }
    }
    out.push(meridiem.to_string());
}

fn looks_like_time(token: &str) -> bool {
    token.contains(':') || (token.len() <= 2 && token.chars().all(|c| c.is_ascii_digit()))
}

fn split_cjk_meridiem(token: &str) -> (&str, Option<&'static str>) {
    if let Some(rest) = token.strip_prefix("午前") {
        (rest, Some("AM"))
    } else if let Some(rest) = token.strip_prefix("午後") {
        (rest, Some("PM"))
    } else {
        (token, None)
    }
}

/// `1:00pm` -> (`1:00`, PM).
fn split_attached_meridiem<'a>(lower: &str, token: &'a str) -> (&'a str, Option<&'static str>) {
    for (suffix, meridiem) in [("am", "AM"), ("pm", "PM")] {
        if lower.len() > suffix.len()
            && lower.ends_with(suffix)
            && lower.is_char_boundary(lower.len() - suffix.len())
        {
            let body = &token[..token.len() - suffix.len()];
            if body.chars().all(|c| c.is_ascii_digit() || c == ':') {
                return (body, Some(meridiem));
            }
        }
    }
    (token, None)
}

/// French-style `13h00` / `13h` -> `13:00`.
fn hour_marker(token: &str) -> String {
    if let Some((hours, minutes)) = token.split_once(['h', 'H']) {
        let hours_ok = (1..=2).contains(&hours.len()) && hours.chars().all(|c| c.is_ascii_digit());
        let minutes_ok = minutes.is_empty()
            || (minutes.len() == 2 && minutes.chars().all(|c| c.is_ascii_digit()));
        if hours_ok && minutes_ok {
            let minutes = if minutes.is_empty() { "00" } else { minutes };
            return format!("{hours}:{minutes}");
        }
    }
    token.to_string()
}

/// `10th` / `1er` / `10.` -> `10`.
fn strip_ordinal(token: &str) -> String {
    let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && ORDINAL_SUFFIXES.contains(&&token.to_lowercase()[digits..]) {
        return token[..digits].to_string();
    }
    token.to_string()
}

fn zone_offset(key: &str) -> Option<FixedOffset> {
    if let Some(&(_, hours)) = ZONE_ABBREVIATIONS.iter().find(|(name, _)| *name == key) {
        return FixedOffset::east_opt(hours * 3600);
    }
    numeric_offset(key)
}

/// `+09:00`, `+0900` or `+09`.
fn numeric_offset(key: &str) -> Option<FixedOffset> {
    let (sign, rest) = match key.as_bytes().first()? {
        b'+' => (1, &key[1..]),
        b'-' => (-1, &key[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) || !matches!(digits.len(), 2 | 4) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits.get(2..).filter(|m| !m.is_empty()).map_or(Ok(0), str::parse).ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn strip_bracketed_weekday(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find(['(', '（']) {
        let open_len = rest[start..].chars().next().map_or(1, char::len_utf8);
        let after = &rest[start + open_len..];
        match after.find([')', '）']) {
            Some(end)
                if !after[..end].is_empty()
                    && after[..end].chars().count() <= 3
                    && after[..end].chars().all(|c| CJK_WEEKDAYS.contains(c)) =>
            {
                out.push_str(&rest[..start]);
                let close_len = after[end..].chars().next().map_or(1, char::len_utf8);
                rest = &after[end + close_len..];
            }
            _ => {
                out.push_str(&rest[..start + open_len]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
