//! A member's top-5 pick for one session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DriverId, EntityId, EventId, PredictionId, Session, UserId};

/// Number of finishing positions a prediction covers.
pub const PICK_SLOTS: usize = 5;

/// Ordered top-5 guess for a (user, event, session) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Derived from the (user, event, session) triple
    pub id: PredictionId,

    pub user_id: UserId,

    pub event_id: EventId,

    pub session: Session,

    /// Picks in finishing order; `None` marks an empty slot
    #[serde(default)]
    pub picks: Vec<Option<DriverId>>,

    pub submitted_at: DateTime<Utc>,
}

impl Prediction {
    pub fn new(
        user_id: UserId,
        event_id: EventId,
        session: Session,
        picks: Vec<Option<DriverId>>,
    ) -> Self {
        let id = Self::key(&user_id, event_id, session);
        Self {
            id,
            user_id,
            event_id,
            session,
            picks,
            submitted_at: Utc::now(),
        }
    }

    /// Convenience constructor with every slot filled.
    pub fn from_picks(user_id: &str, event_id: EventId, session: Session, picks: &[&str]) -> Self {
        Self::new(
            UserId::from(user_id),
            event_id,
            session,
            picks.iter().map(|p| Some(DriverId::from(*p))).collect(),
        )
    }

    /// Deterministic id for a triple; a resubmission maps to the same key.
    pub fn key(user_id: &UserId, event_id: EventId, session: Session) -> PredictionId {
        EntityId::generate(&[user_id.as_str(), &event_id.to_string(), session.as_str()])
    }

    /// Pick at a 0-based slot, treating missing, null and blank entries as empty.
    pub fn pick(&self, slot: usize) -> Option<&DriverId> {
        self.picks
            .get(slot)
            .and_then(Option::as_ref)
            .filter(|id| !id.is_blank())
    }

    /// Scored slots, in order. Entries past the fifth are never scored.
    pub fn slots(&self) -> impl Iterator<Item = Option<&DriverId>> + '_ {
        (0..PICK_SLOTS).map(move |slot| self.pick(slot))
    }

    /// All five slots filled.
    pub fn is_complete(&self) -> bool {
        self.slots().all(|p| p.is_some())
    }
}
