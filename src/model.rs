//! Core domain types for the ladder.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ladder::ValidationError;

/// Player identifier (the chat platform's stable user id, as a string).
pub type PlayerId = String;

/// Outcome of a match from the reporter's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
}

impl MatchResult {
    /// The same match seen from the opponent's side.
    pub fn inverse(self) -> Self {
        match self {
            MatchResult::Win => MatchResult::Loss,
            MatchResult::Loss => MatchResult::Win,
        }
    }
}

impl FromStr for MatchResult {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "W" => Ok(MatchResult::Win),
            "L" => Ok(MatchResult::Loss),
            _ => Err(ValidationError::InvalidResult(s.to_string())),
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Win => f.write_str("W"),
            MatchResult::Loss => f.write_str("L"),
        }
    }
}

/// A registered player and their counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Display name captured at registration.
    pub name: String,
    pub wins: u32,
    pub losses: u32,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wins: 0,
            losses: 0,
        }
    }

    /// This record with the counter matching `result` bumped, or `None` if
    /// that counter is already at `u32::MAX`.
    pub fn with_result(&self, result: MatchResult) -> Option<Self> {
        let mut next = self.clone();
        match result {
            MatchResult::Win => next.wins = self.wins.checked_add(1)?,
            MatchResult::Loss => next.losses = self.losses.checked_add(1)?,
        }
        Some(next)
    }
}

/// One reported match. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub reporter: PlayerId,
    pub opponent: PlayerId,
    pub result: MatchResult,
    /// Free-form score text, stored verbatim.
    pub score: String,
}

/// A ranked row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    /// 1-based rank.
    pub rank: usize,
    pub player: PlayerId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
}
