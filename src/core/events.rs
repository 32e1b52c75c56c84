//! Global events used for cross-system communication.
//!
//! Events are drained once per frame by their readers, which gives every
//! broadcast a deterministic place in the schedule.

use bevy::prelude::*;

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The sun set with the player still standing.
    Won,
    /// Kicked too often or drained of health.
    Lost,
}

/// Sent when the player's death sequence starts.
///
/// Every enemy disables itself permanently on receipt.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerDeathSequence;

/// Sent when the sun has fully set.
#[derive(Event, Debug, Clone, Copy)]
pub struct Sunset;

/// Request to end the round. Only the first request of a round counts.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOverEvent(pub Outcome);
