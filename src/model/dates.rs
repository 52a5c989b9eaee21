// File: src/model/dates.rs
//! Calendar arithmetic and locale-aware header formatting.
//!
//! Everything here is pure: "today" is always an argument, never read from
//! the clock, so callers decide which day the offsets are relative to.
use crate::error::JournalError;
use chrono::{Datelike, Days, Locale, NaiveDate, Weekday};
use std::fmt::Write;

pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Last,
    Nearest,
}

/// `next friday`, `last mon`, `thursday`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayExpression {
    pub direction: Direction,
    pub weekday: Weekday,
}

impl WeekdayExpression {
    pub fn offset_from(&self, base: NaiveDate) -> i64 {
        nearest_weekday(base, self.weekday, self.direction)
    }
}

/// Shift `base` by `n` whole days. `None` only when the result leaves the
/// calendar range chrono can represent.
pub fn add_days(base: NaiveDate, n: i64) -> Option<NaiveDate> {
    let days = Days::new(n.unsigned_abs());
    if n >= 0 {
        base.checked_add_days(days)
    } else {
        base.checked_sub_days(days)
    }
}

/// Signed day count from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Smallest-magnitude `k` such that `base + k` falls on `weekday`.
///
/// `Next` restricts to `k > 0`, `Last` to `k < 0`. `Nearest` allows either
/// sign and returns 0 when `base` already is that weekday.
pub fn nearest_weekday(base: NaiveDate, weekday: Weekday, direction: Direction) -> i64 {
    let forward = (weekday.num_days_from_monday() as i64 - base.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    match direction {
        Direction::Next => {
            if forward == 0 {
                7
            } else {
                forward
            }
        }
        Direction::Last => {
            if forward == 0 {
                -7
            } else {
                forward - 7
            }
        }
        // 7 is odd, so forward and backward distances never tie.
        Direction::Nearest => {
            if forward <= 3 {
                forward
            } else {
                forward - 7
            }
        }
    }
}

/// Map `0..=6` (Sunday first, as most UIs count) onto chrono weekdays.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Full names, Sunday first to line up with [`weekday_from_index`].
const WEEKDAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Full names or three-letter abbreviations, any case.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    let lower = s.to_lowercase();
    let index = WEEKDAY_NAMES
        .iter()
        .position(|name| *name == lower || (lower.len() == 3 && name.starts_with(lower.as_str())))?;
    weekday_from_index(index as u8)
}

/// Accepts `en-US`, `en_US` or `de`; unknown names fall back to `en_US`.
pub fn resolve_locale(name: &str) -> Locale {
    let normalized = name.trim().replace('-', "_");
    if let Ok(locale) = Locale::try_from(normalized.as_str()) {
        return locale;
    }
    // Bare language codes: "de" -> "de_DE"
    if !normalized.is_empty() && !normalized.contains('_') {
        let guess = format!("{}_{}", normalized.to_lowercase(), normalized.to_uppercase());
        if let Ok(locale) = Locale::try_from(guess.as_str()) {
            return locale;
        }
    }
    log::debug!("Unknown locale '{}', falling back to en_US", name);
    Locale::en_US
}

/// Render `date` with a strftime `pattern` in `locale`.
///
/// Unknown specifiers are copied through literally; page headers are best
/// effort and one bad token should not cost the whole header.
pub fn format_date(date: NaiveDate, pattern: &str, locale: &str) -> String {
    let (out, unknown) = render(date, pattern, resolve_locale(locale));
    for token in unknown {
        log::warn!("Leaving unsupported date token '{}' in header", token);
    }
    out
}

/// Like [`format_date`], but reports the first unsupported token instead.
pub fn try_format_date(date: NaiveDate, pattern: &str, locale: &str) -> Result<String, JournalError> {
    let (out, unknown) = render(date, pattern, resolve_locale(locale));
    match unknown.into_iter().next() {
        Some(token) => Err(JournalError::Format { token }),
        None => Ok(out),
    }
}

fn render(date: NaiveDate, pattern: &str, locale: Locale) -> (String, Vec<String>) {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut unknown = Vec::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut spec = String::from('%');
        while let Some(&m) = chars.peek() {
            if matches!(m, '-' | '_' | '0' | '#' | ':' | '.') || m.is_ascii_digit() {
                spec.push(m);
                chars.next();
            } else {
                break;
            }
        }
        if let Some(letter) = chars.next() {
            spec.push(letter);
        }

        // A date has no time or zone, so specifiers like %H fail at write
        // time rather than at parse time; both count as unsupported.
        let mut piece = String::new();
        if write!(piece, "{}", date.format_localized(&spec, locale)).is_ok() {
            out.push_str(&piece);
        } else {
            out.push_str(&spec);
            unknown.push(spec);
        }
    }
    (out, unknown)
}
