//! League member model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// A league member and the standings fields owned by the scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    pub display_name: String,

    /// Cumulative points, recomputed from scratch by every scoring pass
    #[serde(default)]
    pub points: u32,

    /// 1-based dense leaderboard position
    #[serde(default)]
    pub rank: u32,

    /// Rank after each completed scoring pass, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rank_history: Vec<u32>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A fresh member with no points, placed at `rank`.
    pub fn new(id: UserId, display_name: impl Into<String>, rank: u32) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            points: 0,
            rank,
            rank_history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    pub fn with_history(mut self, history: Vec<u32>) -> Self {
        self.rank_history = history;
        self
    }
}
