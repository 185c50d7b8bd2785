//! Session tags and the fixed per-weekend session order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named phase of a race weekend that opens, closes and is scored on its own.
///
/// Variant order is the running order of a sprint weekend, so the derived
/// `Ord` sorts sessions chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Session {
    QualifyingSprint,
    RaceSprint,
    QualifyingMain,
    RaceMain,
}

const STANDARD_WEEKEND: [Session; 2] = [Session::QualifyingMain, Session::RaceMain];

const SPRINT_WEEKEND: [Session; 4] = [
    Session::QualifyingSprint,
    Session::RaceSprint,
    Session::QualifyingMain,
    Session::RaceMain,
];

/// Ordered sessions for an event, derived from its sprint flag.
pub fn sessions_for(is_sprint: bool) -> &'static [Session] {
    if is_sprint {
        &SPRINT_WEEKEND
    } else {
        &STANDARD_WEEKEND
    }
}

impl Session {
    pub fn as_str(&self) -> &'static str {
        match self {
            Session::QualifyingSprint => "QualifyingSprint",
            Session::RaceSprint => "RaceSprint",
            Session::QualifyingMain => "QualifyingMain",
            Session::RaceMain => "RaceMain",
        }
    }

    /// Whether this session only runs on sprint weekends.
    pub fn is_sprint_session(&self) -> bool {
        matches!(self, Session::QualifyingSprint | Session::RaceSprint)
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Session {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QualifyingSprint" => Ok(Session::QualifyingSprint),
            "RaceSprint" => Ok(Session::RaceSprint),
            "QualifyingMain" => Ok(Session::QualifyingMain),
            "RaceMain" => Ok(Session::RaceMain),
            other => Err(format!("unknown session: {}", other)),
        }
    }
}
