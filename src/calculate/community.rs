//! Community consensus tally.
//!
//! Counts how many members named each driver anywhere in their top five,
//! per session. Position does not matter.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    ConsensusShare, DriverId, EventId, EventTally, Prediction, SessionTally, UserId,
};

/// Tally for one event. Predictions for other events are ignored.
pub fn tally_event(event_id: EventId, predictions: &[Prediction]) -> EventTally {
    let mut tally = EventTally::new();

    for prediction in predictions.iter().filter(|p| p.event_id == event_id) {
        // A member naming the same driver twice still counts once.
        let named: BTreeSet<&DriverId> = prediction.slots().flatten().collect();
        if named.is_empty() {
            continue;
        }

        let session = tally.entry(prediction.session).or_default();
        for driver in named {
            *session.entry(driver.clone()).or_insert(0) += 1;
        }
    }

    tally
}

/// Tally for every event that has predictions.
pub fn tally_calendar(predictions: &[Prediction]) -> BTreeMap<EventId, EventTally> {
    let event_ids: BTreeSet<EventId> = predictions.iter().map(|p| p.event_id).collect();
    event_ids
        .into_iter()
        .map(|event_id| (event_id, tally_event(event_id, predictions)))
        .collect()
}

/// Distinct members with at least one prediction for the event.
pub fn participant_count(event_id: EventId, predictions: &[Prediction]) -> u32 {
    predictions
        .iter()
        .filter(|p| p.event_id == event_id)
        .map(|p| &p.user_id)
        .collect::<BTreeSet<&UserId>>()
        .len() as u32
}

/// Share of participants who named a driver, capped at 100%.
pub fn consensus_percent(count: u32, participants: u32) -> f64 {
    if participants == 0 {
        0.0
    } else {
        (count as f64 / participants as f64 * 100.0).min(100.0)
    }
}

/// Session tally as shares, most-picked first; ties keep driver order.
pub fn consensus(tally: &SessionTally, participants: u32) -> Vec<ConsensusShare> {
    let mut shares: Vec<ConsensusShare> = tally
        .iter()
        .map(|(driver_id, &count)| ConsensusShare {
            driver_id: driver_id.clone(),
            count,
            percent: consensus_percent(count, participants),
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}
