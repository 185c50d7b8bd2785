//! Points engine.
//!
//! Every pass recomputes each member's total from the whole calendar, so
//! running it again over unchanged data yields identical totals. Bad input
//! (short official lists, unknown drivers, empty slots) scores zero rather
//! than failing.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{
    DriverId, Event, EventId, EventScore, Prediction, Session, SessionScore, User, UserId,
    PICK_SLOTS,
};

/// Pick in the same position as the official result.
pub const EXACT_MATCH_POINTS: u32 = 5;

/// Pick that finished in the top five, but elsewhere.
pub const PARTIAL_MATCH_POINTS: u32 = 1;

/// Predictions looked up by (user, event, session).
///
/// When the input holds more than one prediction for a triple the later one
/// wins, matching overwrite-on-submit semantics.
pub struct PredictionIndex<'a> {
    by_user: HashMap<UserId, HashMap<(EventId, Session), &'a Prediction>>,
}

impl<'a> PredictionIndex<'a> {
    pub fn new(predictions: &'a [Prediction]) -> Self {
        let mut by_user: HashMap<UserId, HashMap<(EventId, Session), &'a Prediction>> =
            HashMap::new();
        for prediction in predictions {
            by_user
                .entry(prediction.user_id.clone())
                .or_default()
                .insert((prediction.event_id, prediction.session), prediction);
        }
        Self { by_user }
    }

    pub fn get(
        &self,
        user_id: &UserId,
        event_id: EventId,
        session: Session,
    ) -> Option<&'a Prediction> {
        self.by_user
            .get(user_id)
            .and_then(|sessions| sessions.get(&(event_id, session)))
            .copied()
    }

    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }
}

/// Score one prediction against an official top-5.
pub fn score_session(official: &[DriverId], prediction: &Prediction) -> SessionScore {
    let official = &official[..official.len().min(PICK_SLOTS)];
    let mut score = SessionScore::default();

    for (slot, pick) in prediction.slots().enumerate() {
        let Some(pick) = pick else {
            continue;
        };

        if official.get(slot) == Some(pick) {
            score.exact += 1;
            score.points += EXACT_MATCH_POINTS;
        } else if official.contains(pick) {
            score.partial += 1;
            score.points += PARTIAL_MATCH_POINTS;
        }
    }

    score
}

/// A member's points from one event.
pub fn score_event(user_id: &UserId, event: &Event, index: &PredictionIndex<'_>) -> SessionScore {
    let mut total = SessionScore::default();
    for (session, official) in &event.results {
        if let Some(prediction) = index.get(user_id, event.id, *session) {
            total.add(score_session(official, prediction));
        }
    }
    total
}

/// A member's cumulative points across every event with results.
pub fn total_points(user_id: &UserId, calendar: &[Event], index: &PredictionIndex<'_>) -> u32 {
    calendar
        .iter()
        .filter(|event| event.has_results())
        .map(|event| score_event(user_id, event, index).points)
        .sum()
}

/// Overwrite every member's points with a full recompute.
pub fn score_users(users: &mut [User], calendar: &[Event], predictions: &[Prediction]) {
    let index = PredictionIndex::new(predictions);

    for user in users.iter_mut() {
        let points = total_points(&user.id, calendar, &index);
        debug!(
            "Scored {} ({}): {} -> {} points",
            user.display_name, user.id, user.points, points
        );
        user.points = points;
    }
}

/// Per-event, per-session breakdown of a member's points.
pub fn score_breakdown(
    user_id: &UserId,
    calendar: &[Event],
    predictions: &[Prediction],
) -> Vec<EventScore> {
    let index = PredictionIndex::new(predictions);

    calendar
        .iter()
        .filter(|event| event.has_results())
        .map(|event| {
            let mut total = SessionScore::default();
            let sessions = event
                .results
                .iter()
                .filter_map(|(session, official)| {
                    index
                        .get(user_id, event.id, *session)
                        .map(|prediction| (*session, score_session(official, prediction)))
                })
                .inspect(|(_, score)| total.add(*score))
                .collect();

            EventScore {
                event_id: event.id,
                event_name: event.name.clone(),
                sessions,
                total,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const OFFICIAL: [&str; 5] = ["a", "b", "c", "d", "e"];

    fn official(ids: &[&str]) -> Vec<DriverId> {
        ids.iter().map(|id| DriverId::from(*id)).collect()
    }

    fn predict(user: &str, event: EventId, session: Session, picks: &[&str]) -> Prediction {
        Prediction::from_picks(user, event, session, picks)
    }

    fn race(id: EventId, top5: &[&str]) -> Event {
        Event::new(id, format!("Round {}", id), false).with_result(Session::RaceMain, top5)
    }

    #[test]
    fn test_all_exact_scores_twenty_five() {
        let prediction = predict("u1", 1, Session::RaceMain, &OFFICIAL);
        let score = score_session(&official(&OFFICIAL), &prediction);

        assert_eq!(
            score,
            SessionScore {
                exact: 5,
                partial: 0,
                points: 25
            }
        );
    }

    #[test]
    fn test_swapped_pair_scores_partial() {
        let prediction = predict("u1", 1, Session::RaceMain, &["b", "a", "c", "d", "e"]);
        let score = score_session(&official(&OFFICIAL), &prediction);

        assert_eq!(score.exact, 3);
        assert_eq!(score.partial, 2);
        assert_eq!(score.points, 17);
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        let prediction = predict("u1", 1, Session::RaceMain, &["x", "y", "z", "w", "v"]);
        let score = score_session(&official(&OFFICIAL), &prediction);

        assert_eq!(score, SessionScore::default());
    }

    #[test]
    fn test_race_scenario() {
        let top5 = ["norris", "piastri", "verstappen", "leclerc", "russell"];
        let prediction = predict(
            "u1",
            1,
            Session::RaceMain,
            &["norris", "verstappen", "piastri", "russell", "leclerc"],
        );
        let score = score_session(&official(&top5), &prediction);

        assert_eq!(score.exact, 1);
        assert_eq!(score.partial, 4);
        assert_eq!(score.points, 9);
    }

    #[test]
    fn test_exact_match_does_not_also_count_partial() {
        let prediction = predict("u1", 1, Session::RaceMain, &["a"]);
        let score = score_session(&official(&OFFICIAL), &prediction);

        assert_eq!(score.points, EXACT_MATCH_POINTS);
        assert_eq!(score.partial, 0);
    }

    #[test]
    fn test_duplicate_picks_score_each_slot() {
        let prediction = predict("u1", 1, Session::RaceMain, &["a", "a", "x", "x", "x"]);
        let score = score_session(&official(&OFFICIAL), &prediction);

        assert_eq!(score.points, EXACT_MATCH_POINTS + PARTIAL_MATCH_POINTS);
    }

    #[test]
    fn test_short_official_result_never_matches_missing_positions() {
        let prediction = predict("u1", 1, Session::RaceMain, &OFFICIAL);
        let score = score_session(&official(&["a", "b", "c"]), &prediction);

        assert_eq!(score.exact, 3);
        assert_eq!(score.points, 15);
    }

    #[test]
    fn test_official_entries_past_fifth_are_ignored() {
        let prediction = predict("u1", 1, Session::RaceMain, &["f", "x", "x", "x", "x"]);
        let score = score_session(&official(&["a", "b", "c", "d", "e", "f"]), &prediction);

        assert_eq!(score.points, 0);
    }

    #[test]
    fn test_incomplete_prediction_scores_filled_slots() {
        let prediction = Prediction::new(
            UserId::from("u1"),
            1,
            Session::RaceMain,
            vec![None, Some("b".into()), Some("".into()), Some("a".into())],
        );
        let score = score_session(&official(&OFFICIAL), &prediction);

        assert_eq!(score.exact, 1);
        assert_eq!(score.partial, 1);
        assert_eq!(score.points, 6);
    }

    #[test]
    fn test_total_points_spans_every_scored_event() {
        let calendar = vec![
            race(1, &OFFICIAL),
            race(2, &OFFICIAL),
            Event::new(3, "Unscored", false),
        ];
        let predictions = vec![
            predict("u1", 1, Session::RaceMain, &OFFICIAL),
            predict("u1", 2, Session::RaceMain, &["b", "a", "c", "d", "e"]),
            predict("u1", 3, Session::RaceMain, &OFFICIAL),
        ];
        let index = PredictionIndex::new(&predictions);

        assert_eq!(total_points(&UserId::from("u1"), &calendar, &index), 25 + 17);
    }

    #[test]
    fn test_missing_prediction_contributes_nothing() {
        let calendar = vec![race(1, &OFFICIAL)];
        let predictions = vec![predict("u2", 1, Session::RaceMain, &OFFICIAL)];
        let index = PredictionIndex::new(&predictions);

        assert_eq!(total_points(&UserId::from("u1"), &calendar, &index), 0);
    }

    #[test]
    fn test_sprint_sessions_are_scored_separately() {
        let calendar = vec![Event::new(1, "Sprint", true)
            .with_result(Session::RaceSprint, &OFFICIAL)
            .with_result(Session::RaceMain, &OFFICIAL)];
        let predictions = vec![
            predict("u1", 1, Session::RaceSprint, &OFFICIAL),
            predict("u1", 1, Session::RaceMain, &["x", "a", "x", "x", "x"]),
        ];
        let index = PredictionIndex::new(&predictions);

        assert_eq!(total_points(&UserId::from("u1"), &calendar, &index), 26);
    }

    #[test]
    fn test_later_duplicate_prediction_wins() {
        let predictions = vec![
            predict("u1", 1, Session::RaceMain, &["x", "x", "x", "x", "x"]),
            predict("u1", 1, Session::RaceMain, &OFFICIAL),
        ];
        let index = PredictionIndex::new(&predictions);
        let found = index.get(&UserId::from("u1"), 1, Session::RaceMain).unwrap();

        assert_eq!(found.pick(0).map(|d| d.as_str()), Some("a"));
        assert_eq!(index.user_count(), 1);
    }

    #[test]
    fn test_score_users_is_idempotent() {
        let calendar = vec![race(1, &OFFICIAL)];
        let predictions = vec![
            predict("u1", 1, Session::RaceMain, &OFFICIAL),
            predict("u2", 1, Session::RaceMain, &["e", "d", "c", "b", "a"]),
        ];
        let mut users = vec![
            User::new(UserId::from("u1"), "One", 1),
            User::new(UserId::from("u2"), "Two", 2),
        ];

        score_users(&mut users, &calendar, &predictions);
        let first: Vec<u32> = users.iter().map(|u| u.points).collect();
        score_users(&mut users, &calendar, &predictions);
        let second: Vec<u32> = users.iter().map(|u| u.points).collect();

        assert_eq!(first, vec![25, 9]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_score_users_ignores_stale_points() {
        let calendar = vec![race(1, &OFFICIAL), race(2, &OFFICIAL)];
        let predictions = vec![
            predict("u1", 1, Session::RaceMain, &OFFICIAL),
            predict("u1", 2, Session::RaceMain, &["a", "x", "x", "x", "x"]),
        ];
        let mut users = vec![User::new(UserId::from("u1"), "One", 1).with_points(999)];

        score_users(&mut users, &calendar, &predictions);

        assert_eq!(users[0].points, 25 + 5);
    }

    #[test]
    fn test_score_breakdown() {
        let calendar = vec![Event::new(1, "Sprint", true)
            .with_result(Session::RaceSprint, &OFFICIAL)
            .with_result(Session::RaceMain, &OFFICIAL)];
        let predictions = vec![predict("u1", 1, Session::RaceSprint, &["b", "a", "c", "d", "e"])];

        let breakdown = score_breakdown(&UserId::from("u1"), &calendar, &predictions);

        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].sessions.len(), 1);
        assert_eq!(breakdown[0].sessions[&Session::RaceSprint].points, 17);
        assert_eq!(breakdown[0].total.points, 17);
    }
}
