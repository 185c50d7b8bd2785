//! Derived standings and community models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{DriverId, EventId, Session, UserId};

/// Direction of a member's rank change since the previous scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMovement {
    Up,
    Down,
    Unchanged,
}

impl RankMovement {
    /// Lower rank numbers are better.
    pub fn between(previous: u32, current: u32) -> Self {
        match current.cmp(&previous) {
            std::cmp::Ordering::Less => RankMovement::Up,
            std::cmp::Ordering::Greater => RankMovement::Down,
            std::cmp::Ordering::Equal => RankMovement::Unchanged,
        }
    }
}

impl std::fmt::Display for RankMovement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankMovement::Up => write!(f, "▲"),
            RankMovement::Down => write!(f, "▼"),
            RankMovement::Unchanged => write!(f, "="),
        }
    }
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub display_name: String,
    pub points: u32,
    pub previous_rank: u32,
    pub movement: RankMovement,
    /// Scoring passes this member finished in first place
    pub weeks_at_one: u32,
}

/// Exact/partial hit counts for one scored session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScore {
    pub exact: u32,
    pub partial: u32,
    pub points: u32,
}

impl SessionScore {
    pub fn add(&mut self, other: SessionScore) {
        self.exact += other.exact;
        self.partial += other.partial;
        self.points += other.points;
    }
}

/// A member's points from one event, per scored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventScore {
    pub event_id: EventId,
    pub event_name: String,
    pub sessions: BTreeMap<Session, SessionScore>,
    pub total: SessionScore,
}

/// Candidate → number of members who picked it, for one session.
pub type SessionTally = BTreeMap<DriverId, u32>;

/// Session → candidate tally for one event.
pub type EventTally = BTreeMap<Session, SessionTally>;

/// Consensus share of one candidate in one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusShare {
    pub driver_id: DriverId,
    pub count: u32,
    /// 0.0 to 100.0
    pub percent: f64,
}

/// Consensus meter data for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityReport {
    pub event_id: EventId,
    /// Distinct members with at least one prediction for the event
    pub participants: u32,
    pub sessions: BTreeMap<Session, Vec<ConsensusShare>>,
}

/// Outcome of a completed scoring pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringPassSummary {
    pub users_scored: usize,
    pub events_scored: usize,
    pub sessions_scored: usize,
    pub leader: Option<UserId>,
    pub completed_at: DateTime<Utc>,
}
