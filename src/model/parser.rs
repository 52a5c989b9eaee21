// File: src/model/parser.rs
//! Quick-input parsing: a leading date expression, memo text and flags.
//!
//! Only the head of the input is ever read as a date. `"task let's do this
//! today"` is a memo because `task` is not a date, and the trailing `today`
//! is never looked at.
use crate::config::Config;
use crate::error::JournalError;
use crate::model::dates::{self, Direction, WeekdayExpression};
use crate::model::input::Input;
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static SIGNED_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").unwrap());
static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
// Dash-joined digit groups such as "22-12". "1.5" and "3/4" stay memo text.
static DATE_SHAPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+(-\d+)+$").unwrap());

/// Leading date expression and whatever text follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOffset<'s> {
    pub offset: i64,
    pub residual: &'s str,
}

/// Parses raw user input relative to a fixed "today".
///
/// Holds no mutable state; one parser can serve any number of requests.
#[derive(Debug, Clone)]
pub struct InputParser {
    today: NaiveDate,
    sigil: char,
}

impl InputParser {
    pub fn new(config: &Config) -> Self {
        Self::with_today(config, Local::now().date_naive())
    }

    pub fn with_today(config: &Config, today: NaiveDate) -> Self {
        Self {
            today,
            sigil: config.flag_sigil,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Resolve the leading date expression of `text`.
    ///
    /// Grammars, first match wins: signed integer, ISO date, `today` /
    /// `yesterday` / `tomorrow`, then an optional `next` / `last` followed by
    /// a weekday name. `UnresolvedDate` means "not a date, treat as text".
    /// A head token that looks like a date but is not a valid one (`22-12`,
    /// `2026-02-30`) is `UnresolvedInput` instead, since guessing would open
    /// the wrong page.
    pub fn resolve_offset<'s>(&self, text: &'s str) -> Result<ResolvedOffset<'s>, JournalError> {
        let text = text.trim();
        let words = split_words(text);
        let Some(&(_, first_end, first)) = words.first() else {
            return Err(JournalError::UnresolvedDate(String::new()));
        };
        let lower = first.to_lowercase();

        // 1. Signed integer
        if SIGNED_INTEGER.is_match(first) {
            let offset = first
                .trim_start_matches('+')
                .parse::<i64>()
                .map_err(|_| JournalError::UnresolvedInput(first.to_string()))?;
            return Ok(ResolvedOffset {
                offset,
                residual: rest_after(text, first_end),
            });
        }

        // 2. ISO date
        if ISO_DATE.is_match(first) {
            let date = NaiveDate::parse_from_str(first, "%Y-%m-%d")
                .map_err(|_| JournalError::UnresolvedInput(first.to_string()))?;
            return Ok(ResolvedOffset {
                offset: dates::days_between(self.today, date),
                residual: rest_after(text, first_end),
            });
        }
        if DATE_SHAPED.is_match(first) {
            log::debug!("Rejecting ambiguous date-like token '{}'", first);
            return Err(JournalError::UnresolvedInput(first.to_string()));
        }

        // 3. Relative keywords
        let keyword = match lower.as_str() {
            "today" => Some(0),
            "yesterday" => Some(-1),
            "tomorrow" => Some(1),
            _ => None,
        };
        if let Some(offset) = keyword {
            return Ok(ResolvedOffset {
                offset,
                residual: rest_after(text, first_end),
            });
        }

        // 4. Weekday expression
        if let Some((expr, end)) = parse_weekday_expression(&words) {
            return Ok(ResolvedOffset {
                offset: expr.offset_from(self.today),
                residual: rest_after(text, end),
            });
        }

        Err(JournalError::UnresolvedDate(first.to_string()))
    }

    /// Turn raw input into an [`Input`].
    pub fn tokenize(&self, raw: &str) -> Result<Input, JournalError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(JournalError::EmptyInput);
        }

        let (offset, rest) = match self.resolve_offset(trimmed) {
            Ok(resolved) => (Some(resolved.offset), resolved.residual),
            Err(JournalError::UnresolvedDate(_)) => (None, trimmed),
            Err(e) => return Err(e),
        };

        // Memo words keep the spacing the user typed between them; a dropped
        // flag leaves a single space behind.
        let mut flags = BTreeSet::new();
        let mut memo = String::new();
        let mut prev_end: Option<usize> = None;
        for (start, end, word) in split_words(rest) {
            if let Some(name) = word.strip_prefix(self.sigil)
                && !name.is_empty()
            {
                flags.insert(name.to_string());
                prev_end = None;
                continue;
            }
            let text = match word.strip_prefix('\\') {
                Some(escaped) if escaped.starts_with(self.sigil) => escaped,
                _ => word,
            };
            if !memo.is_empty() {
                match prev_end {
                    Some(gap_start) => memo.push_str(&rest[gap_start..start]),
                    None => memo.push(' '),
                }
            }
            memo.push_str(text);
            prev_end = Some(end);
        }

        if offset.is_none() && memo.is_empty() {
            return Err(JournalError::UnresolvedInput(trimmed.to_string()));
        }

        let input = Input {
            offset,
            memo: if memo.is_empty() { None } else { Some(memo) },
            flags,
        };
        log::debug!("Tokenized '{}' into {:?}", trimmed, input);
        Ok(input)
    }
}

fn parse_weekday_expression(words: &[(usize, usize, &str)]) -> Option<(WeekdayExpression, usize)> {
    let (_, first_end, first) = *words.first()?;
    let direction = match first.to_lowercase().as_str() {
        "next" => Some(Direction::Next),
        "last" => Some(Direction::Last),
        _ => None,
    };
    match direction {
        Some(direction) => {
            let (_, end, name) = *words.get(1)?;
            let weekday = dates::parse_weekday(name)?;
            Some((WeekdayExpression { direction, weekday }, end))
        }
        None => {
            let weekday = dates::parse_weekday(first)?;
            Some((
                WeekdayExpression {
                    direction: Direction::Nearest,
                    weekday,
                },
                first_end,
            ))
        }
    }
}

fn rest_after(text: &str, end: usize) -> &str {
    text[end..].trim_start()
}

/// Whitespace-separated words with their byte spans in `input`.
fn split_words(input: &str) -> Vec<(usize, usize, &str)> {
    let mut parts = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, c) in input.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                parts.push((s, idx, &input[s..idx]));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        parts.push((s, input.len(), &input[s..]));
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> InputParser {
        // Monday
        InputParser::with_today(&Config::default(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
    }

    #[test]
    fn test_split_words_spans() {
        let words = split_words("  next   friday call");
        assert_eq!(words, vec![(2, 6, "next"), (9, 15, "friday"), (16, 20, "call")]);
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn test_resolve_signed_integers() {
        let p = parser();
        assert_eq!(p.resolve_offset("-1").unwrap().offset, -1);
        assert_eq!(p.resolve_offset("+25").unwrap().offset, 25);
        assert_eq!(p.resolve_offset("0").unwrap().offset, 0);
        assert_eq!(p.resolve_offset("  12  ").unwrap().offset, 12);
        assert_eq!(
            p.resolve_offset("99999999999999999999"),
            Err(JournalError::UnresolvedInput("99999999999999999999".to_string()))
        );
    }

    #[test]
    fn test_resolve_keeps_residual() {
        let p = parser();
        let r = p.resolve_offset("+3 call the plumber").unwrap();
        assert_eq!(r.offset, 3);
        assert_eq!(r.residual, "call the plumber");

        let r = p.resolve_offset("next friday   pay rent").unwrap();
        assert_eq!(r.offset, 4);
        assert_eq!(r.residual, "pay rent");
    }

    #[test]
    fn test_resolve_keywords_and_weekdays() {
        let p = parser();
        assert_eq!(p.resolve_offset("Today").unwrap().offset, 0);
        assert_eq!(p.resolve_offset("YESTERDAY").unwrap().offset, -1);
        assert_eq!(p.resolve_offset("tomorrow").unwrap().offset, 1);
        assert_eq!(p.resolve_offset("monday").unwrap().offset, 0);
        assert_eq!(p.resolve_offset("last monday").unwrap().offset, -7);
        assert_eq!(p.resolve_offset("next Mon").unwrap().offset, 7);
        assert_eq!(p.resolve_offset("sun").unwrap().offset, -1);
        assert_eq!(p.resolve_offset("last sunday").unwrap().offset, -1);
    }

    #[test]
    fn test_resolve_rejects_non_dates() {
        let p = parser();
        assert!(matches!(p.resolve_offset(""), Err(JournalError::UnresolvedDate(_))));
        assert!(matches!(p.resolve_offset("next"), Err(JournalError::UnresolvedDate(_))));
        assert!(matches!(
            p.resolve_offset("last call with bob"),
            Err(JournalError::UnresolvedDate(_))
        ));
        assert_eq!(
            p.resolve_offset("22-12"),
            Err(JournalError::UnresolvedInput("22-12".to_string()))
        );
        assert_eq!(
            p.resolve_offset("2026-02-30"),
            Err(JournalError::UnresolvedInput("2026-02-30".to_string()))
        );
    }

    #[test]
    fn test_tokenize_extracts_flags_anywhere() {
        let p = parser();
        let input = p.tokenize("tomorrow #task buy #shopping milk").unwrap();
        assert_eq!(input.offset, Some(1));
        assert_eq!(input.memo.as_deref(), Some("buy milk"));
        assert!(input.has_flag("task"));
        assert!(input.has_flag("shopping"));
        assert_eq!(input.flags.len(), 2);
    }

    #[test]
    fn test_tokenize_keeps_memo_spacing() {
        let p = parser();
        let input = p.tokenize("today pay   rent\tnow").unwrap();
        assert_eq!(input.memo.as_deref(), Some("pay   rent\tnow"));

        let input = p.tokenize("a  #x  b   c").unwrap();
        assert_eq!(input.memo.as_deref(), Some("a b   c"));
        assert!(input.has_flag("x"));
    }

    #[test]
    fn test_only_dash_groups_are_date_shaped() {
        let p = parser();
        assert!(matches!(p.resolve_offset("1.5 kg flour"), Err(JournalError::UnresolvedDate(_))));
        assert!(matches!(p.resolve_offset("3/4 done"), Err(JournalError::UnresolvedDate(_))));
        assert_eq!(
            p.tokenize("1.5 kg flour").unwrap().memo.as_deref(),
            Some("1.5 kg flour")
        );
        assert_eq!(
            p.resolve_offset("+22-12"),
            Err(JournalError::UnresolvedInput("+22-12".to_string()))
        );
    }

    #[test]
    fn test_tokenize_escaped_sigil_and_bare_sigil() {
        let p = parser();
        let input = p.tokenize("\\#1 priority # today").unwrap();
        assert_eq!(input.offset, None);
        assert_eq!(input.memo.as_deref(), Some("#1 priority # today"));
        assert!(!input.has_flags());
    }

    #[test]
    fn test_tokenize_flags_only_fails_without_date() {
        let p = parser();
        assert_eq!(
            p.tokenize("#task"),
            Err(JournalError::UnresolvedInput("#task".to_string()))
        );
        let input = p.tokenize("today #task").unwrap();
        assert_eq!(input.offset, Some(0));
        assert_eq!(input.memo, None);
        assert!(input.has_flags());
    }
}
