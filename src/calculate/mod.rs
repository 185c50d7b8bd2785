//! Scoring, ranking and consensus computation.
//!
//! Everything here is a pure function over plain models:
//! - Points per member from official results and predictions
//! - Leaderboard ranks, rank history and movement
//! - Per-session consensus tallies

pub mod community;
pub mod ranking;
pub mod scoring;

pub use community::{consensus, participant_count, tally_calendar, tally_event};
pub use ranking::{leaderboard, rank_users, weeks_at_one};
pub use scoring::{score_breakdown, score_session, score_users};

use crate::models::{Event, Prediction, User};

/// Score and rank every member in one go.
///
/// Points are recomputed from the whole calendar, then ranks are assigned
/// and appended to each member's history.
pub fn recompute_standings(
    users: &mut [User],
    calendar: &[Event],
    predictions: &[Prediction],
    history_limit: Option<usize>,
) {
    score_users(users, calendar, predictions);
    rank_users(users, history_limit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Session, UserId};

    const TOP5: [&str; 5] = ["a", "b", "c", "d", "e"];

    #[test]
    fn test_recompute_standings_from_zero_matches_incremental_view() {
        let mut calendar = vec![Event::new(1, "R1", false).with_result(Session::RaceMain, &TOP5)];
        let predictions = vec![
            Prediction::from_picks("u1", 1, Session::RaceMain, &["a", "x", "x", "x", "x"]),
            Prediction::from_picks("u2", 1, Session::RaceMain, &TOP5),
            Prediction::from_picks("u1", 2, Session::RaceMain, &TOP5),
        ];
        let mut users = vec![
            User::new(UserId::from("u1"), "One", 1),
            User::new(UserId::from("u2"), "Two", 2),
        ];

        recompute_standings(&mut users, &calendar, &predictions, None);
        assert_eq!(users[0].id.as_str(), "u2");
        assert_eq!(users[0].points, 25);
        assert_eq!(users[1].points, 5);

        calendar.push(Event::new(2, "R2", false).with_result(Session::RaceMain, &TOP5));
        recompute_standings(&mut users, &calendar, &predictions, None);

        let u1 = users.iter().find(|u| u.id.as_str() == "u1").unwrap();
        assert_eq!(u1.points, 30);
        assert_eq!(u1.rank, 1);
        assert_eq!(u1.rank_history, vec![2, 1]);
    }
}
