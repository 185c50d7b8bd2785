//! Leaderboard ordering and rank history.

use crate::models::{LeaderboardEntry, RankMovement, User};

/// Sort by points descending and assign dense 1-based ranks.
///
/// The sort is stable: members on equal points keep their input order.
pub fn assign_ranks(users: &mut [User]) {
    users.sort_by(|a, b| b.points.cmp(&a.points));
    for (index, user) in users.iter_mut().enumerate() {
        user.rank = index as u32 + 1;
    }
}

/// Append each member's current rank to their history.
///
/// With a `limit`, the oldest entries are dropped to keep at most `limit`.
pub fn record_rank_history(users: &mut [User], limit: Option<usize>) {
    for user in users.iter_mut() {
        user.rank_history.push(user.rank);
        if let Some(limit) = limit {
            let excess = user.rank_history.len().saturating_sub(limit);
            user.rank_history.drain(..excess);
        }
    }
}

/// Rank a freshly scored set of members and log the pass in their history.
pub fn rank_users(users: &mut [User], history_limit: Option<usize>) {
    assign_ranks(users);
    record_rank_history(users, history_limit);
}

/// Number of passes finished in first place.
pub fn weeks_at_one(history: &[u32]) -> u32 {
    history.iter().filter(|&&rank| rank == 1).count() as u32
}

/// Rank before the latest pass; falls back to the current rank when the
/// history is too short to tell.
pub fn previous_rank(user: &User) -> u32 {
    match user.rank_history.as_slice() {
        [.., previous, _] => *previous,
        _ => user.rank,
    }
}

pub fn rank_movement(user: &User) -> RankMovement {
    RankMovement::between(previous_rank(user), user.rank)
}

/// Leaderboard rows ordered by rank.
pub fn leaderboard(users: &[User]) -> Vec<LeaderboardEntry> {
    let mut ordered: Vec<&User> = users.iter().collect();
    ordered.sort_by_key(|user| user.rank);

    ordered
        .into_iter()
        .map(|user| LeaderboardEntry {
            rank: user.rank,
            user_id: user.id.clone(),
            display_name: user.display_name.clone(),
            points: user.points,
            previous_rank: previous_rank(user),
            movement: rank_movement(user),
            weeks_at_one: weeks_at_one(&user.rank_history),
        })
        .collect()
}
