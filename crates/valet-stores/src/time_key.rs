//! Wall-clock keys for the schedule and alarm stores.
//!
//! A `TimeKey` is the canonical `"HH:MM" + AM/PM` string both stores are
//! keyed by: zero-padded 12-hour clock, uppercase meridiem, no separator
//! (`07:05PM`). The watchers format "now" the same way and compare by
//! string equality, so every producer of a key must go through this type.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use valet_foundation::StoreError;

/// Strict canonical form: `^(0[1-9]|1[0-2]):[0-5][0-9](AM|PM)$`
static KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2]):[0-5][0-9](AM|PM)$").expect("valid key pattern"));

/// Loose form found in recognized speech: `7:30 pm`, `07:30PM`, `8:00 p.m.`
static SPOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}):([0-5][0-9])\s*([ap])\.?\s?m\.?").expect("valid spoken pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeKey(String);

impl TimeKey {
    /// Parse a string already in canonical form.
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        let trimmed = s.trim();
        if KEY_RE.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(StoreError::InvalidTimeKey(s.to_string()))
        }
    }

    /// Find the first spoken time in free text and normalize it: zero-pad
    /// the hour, uppercase the meridiem, drop the inner space. Returns the
    /// key and the text with the matched span removed, so command handlers
    /// can treat the remainder as the activity description.
    pub fn extract(text: &str) -> Option<(Self, String)> {
        let caps = SPOKEN_RE.captures(text)?;
        let whole = caps.get(0)?;
        let hour: u32 = caps[1].parse().ok()?;
        if !(1..=12).contains(&hour) {
            return None;
        }
        let meridiem = if caps[3].eq_ignore_ascii_case("a") {
            "AM"
        } else {
            "PM"
        };
        let key = Self(format!("{:02}:{}{}", hour, &caps[2], meridiem));

        let mut remainder = String::with_capacity(text.len());
        remainder.push_str(&text[..whole.start()]);
        remainder.push_str(&text[whole.end()..]);
        Some((key, remainder))
    }

    /// Format a wall-clock instant the way the stores are keyed: `%I:%M%p`
    /// with the zero-padded hour and uppercase meridiem.
    pub fn from_local(now: NaiveDateTime) -> Self {
        Self(now.format("%I:%M%p").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parse_accepts_canonical_keys() {
        assert_eq!(TimeKey::parse("07:05PM").unwrap().as_str(), "07:05PM");
        assert_eq!(TimeKey::parse("12:59AM").unwrap().as_str(), "12:59AM");
    }

    #[test]
    fn parse_rejects_non_canonical_keys() {
        for bad in ["7:05PM", "13:00PM", "07:60PM", "07:05 PM", "07:05pm", ""] {
            assert!(TimeKey::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn extract_normalizes_spoken_times() {
        let (key, rest) = TimeKey::extract("remind me to take medicine at 7:05 pm").unwrap();
        assert_eq!(key.as_str(), "07:05PM");
        assert_eq!(rest, "remind me to take medicine at ");

        let (key, _) = TimeKey::extract("set alarm at 11:30 a.m.").unwrap();
        assert_eq!(key.as_str(), "11:30AM");

        let (key, _) = TimeKey::extract("wake me at 12:00PM sharp").unwrap();
        assert_eq!(key.as_str(), "12:00PM");
    }

    #[test]
    fn extract_rejects_invalid_hours() {
        assert!(TimeKey::extract("meet at 13:30 pm").is_none());
        assert!(TimeKey::extract("meet at 0:30 am").is_none());
        assert!(TimeKey::extract("no time here").is_none());
    }

    #[test]
    fn from_local_matches_store_key_format() {
        let evening = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(19, 5, 0)
            .unwrap();
        assert_eq!(TimeKey::from_local(evening).as_str(), "07:05PM");

        let past_midnight = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 7, 0)
            .unwrap();
        assert_eq!(TimeKey::from_local(past_midnight).as_str(), "12:07AM");
    }

    #[test]
    fn from_local_round_trips_through_parse() {
        let noon = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let key = TimeKey::from_local(noon);
        assert_eq!(TimeKey::parse(key.as_str()).unwrap(), key);
    }
}
