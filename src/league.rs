//! League operations against the document store.
//!
//! Administrative writes (calendar, results, session flags, members) and
//! member writes (predictions) go through here, as does the scoring pass:
//! 1. Load calendar, predictions and users
//! 2. Recompute points and ranks for every member
//! 3. Replace the users collection in one write
//!
//! If any load fails the pass stops before writing, so the stored standings
//! stay as they were. Every read that precedes a rewrite is strict: a line
//! that no longer parses aborts the operation instead of being dropped.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculate::{self, community, ranking};
use crate::config::LeagueConfig;
use crate::models::{
    CommunityReport, DriverId, Event, EventId, EventScore, LeaderboardEntry, Prediction,
    ScoringPassSummary, Session, User, UserId, PICK_SLOTS,
};
use crate::storage::{self, ReadMode, StorageConfig, StorageError};

/// Errors returned by league operations.
#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Event {0} not found")]
    EventNotFound(EventId),

    #[error("User {0} not found")]
    UserNotFound(UserId),

    #[error("Event {event_id} has no {session} session")]
    SessionNotInEvent { event_id: EventId, session: Session },

    #[error("{session} for event {event_id} is closed for predictions")]
    SessionClosed { event_id: EventId, session: Session },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Entry point for every league read and write.
#[derive(Debug, Clone)]
pub struct League {
    storage: StorageConfig,
    history_limit: Option<usize>,
}

impl League {
    pub fn new(storage: StorageConfig, config: &LeagueConfig) -> Self {
        Self {
            storage,
            history_limit: config.rank_history_limit,
        }
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    // ── Calendar ────────────────────────────────────────────────

    pub fn calendar(&self) -> Result<Vec<Event>, LeagueError> {
        Ok(storage::read_calendar(&self.storage, ReadMode::Lenient)?)
    }

    pub fn event(&self, event_id: EventId) -> Result<Event, LeagueError> {
        self.calendar()?
            .into_iter()
            .find(|e| e.id == event_id)
            .ok_or(LeagueError::EventNotFound(event_id))
    }

    /// Add an event, or replace the event with the same id.
    pub fn upsert_event(&self, event: Event) -> Result<(), LeagueError> {
        for session in event.results.keys().chain(event.session_status.keys()) {
            if !event.has_session(*session) {
                return Err(LeagueError::SessionNotInEvent {
                    event_id: event.id,
                    session: *session,
                });
            }
        }

        let mut calendar = storage::read_calendar(&self.storage, ReadMode::Strict)?;
        match calendar.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => *existing = event,
            None => calendar.push(event),
        }
        storage::write_calendar(&self.storage, &calendar)?;
        Ok(())
    }

    /// Store the official top five for a session. Scoring is a separate step.
    pub fn enter_results(
        &self,
        event_id: EventId,
        session: Session,
        top5: Vec<DriverId>,
    ) -> Result<Event, LeagueError> {
        if top5.len() != PICK_SLOTS || top5.iter().any(DriverId::is_blank) {
            return Err(LeagueError::InvalidInput(format!(
                "official result needs exactly {} drivers",
                PICK_SLOTS
            )));
        }

        let event = self.update_event(event_id, |event| {
            Self::check_session(event, session)?;
            event.results.insert(session, top5);
            Ok(())
        })?;
        info!("Entered {} result for event {}", session, event_id);
        Ok(event)
    }

    pub fn set_session_open(
        &self,
        event_id: EventId,
        session: Session,
        open: bool,
    ) -> Result<Event, LeagueError> {
        let event = self.update_event(event_id, |event| {
            Self::check_session(event, session)?;
            event.session_status.insert(session, open);
            Ok(())
        })?;
        info!(
            "{} for event {} is now {}",
            session,
            event_id,
            if open { "open" } else { "closed" }
        );
        Ok(event)
    }

    fn update_event<F>(&self, event_id: EventId, apply: F) -> Result<Event, LeagueError>
    where
        F: FnOnce(&mut Event) -> Result<(), LeagueError>,
    {
        let mut calendar = storage::read_calendar(&self.storage, ReadMode::Strict)?;
        let event = calendar
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or(LeagueError::EventNotFound(event_id))?;
        apply(event)?;
        let updated = event.clone();
        storage::write_calendar(&self.storage, &calendar)?;
        Ok(updated)
    }

    fn check_session(event: &Event, session: Session) -> Result<(), LeagueError> {
        if event.has_session(session) {
            Ok(())
        } else {
            Err(LeagueError::SessionNotInEvent {
                event_id: event.id,
                session,
            })
        }
    }

    // ── Members ─────────────────────────────────────────────────

    pub fn users(&self) -> Result<Vec<User>, LeagueError> {
        Ok(storage::read_users(&self.storage, ReadMode::Lenient)?)
    }

    /// Create a member with no points, ranked after everyone else.
    pub fn register_user(&self, display_name: &str) -> Result<User, LeagueError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(LeagueError::InvalidInput(
                "display name must not be empty".to_string(),
            ));
        }

        let mut users = storage::read_users(&self.storage, ReadMode::Strict)?;
        let user = User::new(
            UserId::new(Uuid::new_v4().to_string()),
            display_name,
            users.len() as u32 + 1,
        );
        users.push(user.clone());
        storage::write_users(&self.storage, &users)?;

        info!("Registered {} as {}", user.display_name, user.id);
        Ok(user)
    }

    /// Remove a member and every prediction they made.
    ///
    /// Returns the number of predictions removed.
    pub fn delete_user(&self, user_id: &UserId) -> Result<usize, LeagueError> {
        let mut users = storage::read_users(&self.storage, ReadMode::Strict)?;
        let before = users.len();
        users.retain(|u| &u.id != user_id);
        if users.len() == before {
            return Err(LeagueError::UserNotFound(user_id.clone()));
        }

        let mut predictions = storage::read_predictions(&self.storage, ReadMode::Strict)?;
        let predictions_before = predictions.len();
        predictions.retain(|p| &p.user_id != user_id);
        let removed = predictions_before - predictions.len();

        // Users first: a prediction left behind for a missing user is never scored.
        storage::write_users(&self.storage, &users)?;
        storage::write_predictions(&self.storage, &predictions)?;

        info!("Deleted user {} and {} predictions", user_id, removed);
        Ok(removed)
    }

    // ── Predictions ─────────────────────────────────────────────

    /// Save a member's picks, replacing any earlier pick for the same session.
    pub fn submit_prediction(
        &self,
        user_id: &UserId,
        event_id: EventId,
        session: Session,
        picks: Vec<Option<DriverId>>,
    ) -> Result<Prediction, LeagueError> {
        if picks.len() > PICK_SLOTS {
            return Err(LeagueError::InvalidInput(format!(
                "at most {} picks per session",
                PICK_SLOTS
            )));
        }

        if !self.users()?.iter().any(|u| &u.id == user_id) {
            return Err(LeagueError::UserNotFound(user_id.clone()));
        }

        let event = self.event(event_id)?;
        Self::check_session(&event, session)?;
        if !event.is_session_open(session) {
            return Err(LeagueError::SessionClosed { event_id, session });
        }

        let prediction = Prediction::new(user_id.clone(), event_id, session, picks);
        let mut predictions = storage::read_predictions(&self.storage, ReadMode::Strict)?;
        match predictions.iter_mut().find(|p| p.id == prediction.id) {
            Some(existing) => {
                debug!("Replacing prediction {}", existing.id);
                *existing = prediction.clone();
            }
            None => predictions.push(prediction.clone()),
        }
        storage::write_predictions(&self.storage, &predictions)?;

        if !prediction.is_complete() {
            warn!(
                "Prediction {} for event {} {} has empty slots",
                prediction.id, event_id, session
            );
        }
        Ok(prediction)
    }

    pub fn predictions_for(
        &self,
        user_id: &UserId,
        event_id: Option<EventId>,
    ) -> Result<Vec<Prediction>, LeagueError> {
        let reader = storage::JsonlReader::<Prediction>::for_entity(
            &self.storage,
            storage::EntityType::Prediction,
        );
        let mut predictions = reader.read_where(|p| {
            &p.user_id == user_id && event_id.map_or(true, |id| p.event_id == id)
        })?;
        predictions.sort_by_key(|p| (p.event_id, p.session));
        Ok(predictions)
    }

    // ── Standings ───────────────────────────────────────────────

    /// Recompute every member's points and rank from the full calendar.
    pub fn run_scoring_pass(&self) -> Result<ScoringPassSummary, LeagueError> {
        info!("Starting scoring pass");

        let calendar = storage::read_calendar(&self.storage, ReadMode::Strict)?;
        let predictions = storage::read_predictions(&self.storage, ReadMode::Strict)?;
        let mut users = storage::read_users(&self.storage, ReadMode::Strict)?;

        calculate::recompute_standings(&mut users, &calendar, &predictions, self.history_limit);
        storage::write_users(&self.storage, &users)?;

        let summary = ScoringPassSummary {
            users_scored: users.len(),
            events_scored: calendar.iter().filter(|e| e.has_results()).count(),
            sessions_scored: calendar.iter().map(|e| e.results.len()).sum(),
            leader: users.first().map(|u| u.id.clone()),
            completed_at: Utc::now(),
        };
        info!(
            "Scoring pass complete: {} users, {} events, {} sessions",
            summary.users_scored, summary.events_scored, summary.sessions_scored
        );
        Ok(summary)
    }

    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, LeagueError> {
        Ok(ranking::leaderboard(&self.users()?))
    }

    pub fn breakdown(&self, user_id: &UserId) -> Result<Vec<EventScore>, LeagueError> {
        if !self.users()?.iter().any(|u| &u.id == user_id) {
            return Err(LeagueError::UserNotFound(user_id.clone()));
        }
        let calendar = self.calendar()?;
        let predictions = storage::read_predictions(&self.storage, ReadMode::Lenient)?;
        Ok(calculate::score_breakdown(user_id, &calendar, &predictions))
    }

    /// Consensus meter for one event.
    pub fn community(&self, event_id: EventId) -> Result<CommunityReport, LeagueError> {
        let event = self.event(event_id)?;
        let predictions = storage::read_predictions(&self.storage, ReadMode::Lenient)?;

        let participants = community::participant_count(event.id, &predictions);
        let sessions = community::tally_event(event.id, &predictions)
            .iter()
            .map(|(session, tally)| (*session, community::consensus(tally, participants)))
            .collect();

        Ok(CommunityReport {
            event_id: event.id,
            participants,
            sessions,
        })
    }
}
