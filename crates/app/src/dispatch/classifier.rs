//! Utterance classification.
//!
//! An ordered rule table of `(predicate, parser)` pairs. Rules are
//! evaluated top to bottom and the first matching predicate wins, so
//! precedence is fixed by construction. Anything that matches no rule
//! belongs to the fallback fan-out handled by the dispatch loop.

use crate::collab::MusicTarget;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// "remind me to take medicine at 7:05 pm"
    Remind { text: String },
    /// "set alarm at 6:45 am"
    SetAlarm { text: String },
    /// "open chrome" / "open the rust-lang website"
    Open { target: String, website: bool },
    Close,
    /// Opens a multi-turn session asking for the song.
    PlayMusic { target: MusicTarget },
    /// Opens two chained sessions: recipient, then body.
    SendMessage,
    SearchGoogle { query: String },
    Search { query: String },
    CheckBattery,
    CheckVolume,
    SetVolume { percent: Option<u8> },
    CheckBrightness,
    SetBrightness { percent: Option<u8> },
    PlayPause,
}

enum Predicate {
    Prefix(&'static str),
    AnyPrefix(&'static [&'static str]),
    Contains(&'static str),
    AnyContains(&'static [&'static str]),
}

impl Predicate {
    fn matches(&self, text: &str) -> bool {
        match self {
            Predicate::Prefix(p) => text.starts_with(p),
            Predicate::AnyPrefix(ps) => ps.iter().any(|p| text.starts_with(p)),
            Predicate::Contains(s) => text.contains(s),
            Predicate::AnyContains(ss) => ss.iter().any(|s| text.contains(s)),
        }
    }
}

struct Rule {
    predicate: Predicate,
    parse: fn(&str) -> Command,
}

static RULES: &[Rule] = &[
    Rule {
        predicate: Predicate::AnyPrefix(&["remind me", "tell me"]),
        parse: |text| Command::Remind {
            text: text.to_string(),
        },
    },
    Rule {
        predicate: Predicate::Prefix("set alarm"),
        parse: |text| Command::SetAlarm {
            text: text.to_string(),
        },
    },
    Rule {
        predicate: Predicate::Prefix("open"),
        parse: parse_open,
    },
    Rule {
        predicate: Predicate::Contains("close"),
        parse: |_| Command::Close,
    },
    // Spotify before the generic rule: "play music on spotify" also
    // contains "play music".
    Rule {
        predicate: Predicate::AnyContains(&["play some music", "play music on spotify"]),
        parse: |_| Command::PlayMusic {
            target: MusicTarget::Spotify,
        },
    },
    Rule {
        predicate: Predicate::AnyContains(&["play music", "play music on youtube"]),
        parse: |_| Command::PlayMusic {
            target: MusicTarget::YouTube,
        },
    },
    Rule {
        predicate: Predicate::Contains("send message"),
        parse: |_| Command::SendMessage,
    },
    Rule {
        predicate: Predicate::AnyContains(&["check battery percentage", "check battery level", "check battery"]),
        parse: |_| Command::CheckBattery,
    },
    Rule {
        predicate: Predicate::Contains("search in google"),
        parse: |text| Command::SearchGoogle {
            query: text.replace("search in google", "").trim().to_string(),
        },
    },
    Rule {
        predicate: Predicate::Prefix("search"),
        parse: |text| Command::Search {
            query: text["search".len()..].trim().to_string(),
        },
    },
    Rule {
        predicate: Predicate::Contains("check volume"),
        parse: |_| Command::CheckVolume,
    },
    Rule {
        predicate: Predicate::Contains("set volume"),
        parse: |text| Command::SetVolume {
            percent: parse_percent(text),
        },
    },
    Rule {
        predicate: Predicate::Contains("check brightness"),
        parse: |_| Command::CheckBrightness,
    },
    Rule {
        predicate: Predicate::Contains("set brightness"),
        parse: |text| Command::SetBrightness {
            percent: parse_percent(text),
        },
    },
    Rule {
        predicate: Predicate::AnyContains(&["play", "stop", "pause"]),
        parse: |_| Command::PlayPause,
    },
];

/// First matching rule wins; `None` routes to the fallback fan-out.
pub fn classify(text: &str) -> Option<Command> {
    RULES
        .iter()
        .find(|rule| rule.predicate.matches(text))
        .map(|rule| (rule.parse)(text))
}

fn parse_open(text: &str) -> Command {
    let website = text.contains("website");
    let target = text
        .split_whitespace()
        .filter(|word| {
            !matches!(
                *word,
                "open" | "website" | "named" | "app" | "application" | "the"
            )
        })
        .collect::<Vec<_>>()
        .join(" ");
    Command::Open { target, website }
}

/// First whitespace token that parses as a percentage, "%" tolerated.
fn parse_percent(text: &str) -> Option<u8> {
    text.split_whitespace()
        .filter_map(|word| word.trim_end_matches('%').parse::<u8>().ok())
        .find(|p| *p <= 100)
}
