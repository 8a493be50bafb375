//! Keyword signal extraction.
//!
//! Derives a handful of booleans characterising a request from plain
//! substring and tag-membership tests. Matching is case-sensitive and
//! unnormalised: the markers are Japanese words and are matched as written.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{AnalysisRequest, AnalysisResult, Goal};

/// A named characteristic of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// New venture or fundraising.
    Startup,
    /// Individual or side business.
    Personal,
    /// Established company, often about efficiency.
    Corporate,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Startup, Signal::Personal, Signal::Corporate];

    pub fn label(&self) -> &'static str {
        match self {
            Signal::Startup => "isStartup",
            Signal::Personal => "isPersonal",
            Signal::Corporate => "isCorporate",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Truth value of every signal for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalProfile {
    pub startup: bool,
    pub personal: bool,
    pub corporate: bool,
}

impl SignalProfile {
    pub fn is(&self, signal: Signal) -> bool {
        match signal {
            Signal::Startup => self.startup,
            Signal::Personal => self.personal,
            Signal::Corporate => self.corporate,
        }
    }

    fn set(&mut self, signal: Signal, value: bool) {
        match signal {
            Signal::Startup => self.startup = value,
            Signal::Personal => self.personal = value,
            Signal::Corporate => self.corporate = value,
        }
    }

    /// Signals that are true, in declaration order.
    pub fn active(&self) -> Vec<Signal> {
        Signal::ALL.into_iter().filter(|s| self.is(*s)).collect()
    }
}

/// Disjunction defining one signal over a request.
struct RequestSignalRule {
    signal: Signal,
    text_markers: &'static [&'static str],
    goals: &'static [Goal],
}

const REQUEST_RULES: &[RequestSignalRule] = &[
    RequestSignalRule {
        signal: Signal::Startup,
        text_markers: &["創業", "資金"],
        goals: &[Goal::Finance, Goal::Bizplan],
    },
    RequestSignalRule {
        signal: Signal::Personal,
        text_markers: &["副業", "個人"],
        goals: &[Goal::Sns],
    },
    RequestSignalRule {
        signal: Signal::Corporate,
        text_markers: &["法人", "効率"],
        goals: &[Goal::Efficiency],
    },
];

/// Disjunction defining one signal over an existing result, used when
/// content is generated after the request is gone.
struct ResultSignalRule {
    signal: Signal,
    theme_markers: &'static [&'static str],
    goal_markers: &'static [&'static str],
    tags: &'static [&'static str],
}

const RESULT_RULES: &[ResultSignalRule] = &[
    ResultSignalRule {
        signal: Signal::Startup,
        theme_markers: &["創業", "スタートアップ"],
        goal_markers: &["スタートアップ"],
        tags: &["急成長"],
    },
    ResultSignalRule {
        signal: Signal::Personal,
        theme_markers: &["個人", "副業", "自宅"],
        goal_markers: &["個人", "副業", "自宅"],
        tags: &[],
    },
    ResultSignalRule {
        signal: Signal::Corporate,
        theme_markers: &["法人", "効率"],
        goal_markers: &["法人", "効率"],
        tags: &["業務改善"],
    },
];

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| haystack.contains(marker))
}

/// Computes the signal profile of a request. Total: no input fails.
pub fn extract(request: &AnalysisRequest) -> SignalProfile {
    let mut profile = SignalProfile::default();
    for rule in REQUEST_RULES {
        let hit = contains_any(&request.free_text, rule.text_markers)
            || rule.goals.iter().any(|goal| request.has_goal(*goal));
        profile.set(rule.signal, hit);
    }
    profile
}

/// Recovers a signal profile from a result's theme, refined goal and tags.
pub fn extract_from_result(result: &AnalysisResult) -> SignalProfile {
    let theme = result.theme.as_deref().unwrap_or_default();
    let mut profile = SignalProfile::default();
    for rule in RESULT_RULES {
        let hit = contains_any(theme, rule.theme_markers)
            || contains_any(&result.refined_goal, rule.goal_markers)
            || rule.tags.iter().any(|tag| result.tags.iter().any(|t| t == tag));
        profile.set(rule.signal, hit);
    }
    profile
}
