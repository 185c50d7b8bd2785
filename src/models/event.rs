//! Calendar event model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::{sessions_for, DriverId, EventId, Session};

/// Lifecycle of a race weekend as set by the administrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Open,
    Closed,
    Finished,
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upcoming" => Ok(EventStatus::Upcoming),
            "open" => Ok(EventStatus::Open),
            "closed" => Ok(EventStatus::Closed),
            "finished" => Ok(EventStatus::Finished),
            other => Err(format!("unknown event status: {}", other)),
        }
    }
}

/// A race weekend on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Calendar round number
    pub id: EventId,

    /// Grand Prix name
    pub name: String,

    /// Race day
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Sprint weekends run four sessions instead of two
    #[serde(default)]
    pub sprint: bool,

    #[serde(default)]
    pub status: EventStatus,

    /// Open/closed flag per session; a missing key means open
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub session_status: BTreeMap<Session, bool>,

    /// Official top-5 per session, 1st place first
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub results: BTreeMap<Session, Vec<DriverId>>,
}

impl Event {
    pub fn new(id: EventId, name: impl Into<String>, sprint: bool) -> Self {
        Self {
            id,
            name: name.into(),
            date: None,
            sprint,
            status: EventStatus::default(),
            session_status: BTreeMap::new(),
            results: BTreeMap::new(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder method to attach an official result.
    pub fn with_result(mut self, session: Session, top5: &[&str]) -> Self {
        self.results
            .insert(session, top5.iter().map(|d| DriverId::from(*d)).collect());
        self
    }

    /// Sessions this weekend runs, in running order.
    pub fn sessions(&self) -> &'static [Session] {
        sessions_for(self.sprint)
    }

    pub fn has_session(&self, session: Session) -> bool {
        self.sessions().contains(&session)
    }

    /// Predictions are accepted while a session is open.
    pub fn is_session_open(&self, session: Session) -> bool {
        self.session_status.get(&session).copied().unwrap_or(true)
    }

    pub fn result_for(&self, session: Session) -> Option<&[DriverId]> {
        self.results.get(&session).map(Vec::as_slice)
    }

    /// Whether any session of this event has an official result.
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}
