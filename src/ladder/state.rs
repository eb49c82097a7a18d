use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ValidationError;
use crate::model::{MatchRecord, MatchResult, PlayerId, PlayerRecord, Standing};

/// Whole persisted state: every registered player and every reported match.
///
/// Players are keyed in a sorted map so the serialized form is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub players: BTreeMap<PlayerId, PlayerRecord>,
    /// Chronological, append-only.
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

/// Result of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    AlreadyRegistered,
}

impl Ledger {
    pub fn is_registered(&self, player: &str) -> bool {
        self.players.contains_key(player)
    }

    pub fn player(&self, player: &str) -> Option<&PlayerRecord> {
        self.players.get(player)
    }

    /// Register a player under `name`. A second registration is a no-op.
    pub fn register(&mut self, player: PlayerId, name: impl Into<String>) -> Registration {
        if self.is_registered(&player) {
            return Registration::AlreadyRegistered;
        }
        self.players.insert(player, PlayerRecord::new(name));
        Registration::Created
    }

    /// Record a match reported by `reporter`:
    /// - Reject self matches
    /// - Ensure both players are registered
    /// - Ensure neither counter would overflow
    /// - Append the match record
    /// - Bump the reporter's counter for `result` and the opponent's complementary one
    pub fn record_match(
        &mut self,
        reporter: PlayerId,
        opponent: PlayerId,
        result: MatchResult,
        score: String,
    ) -> Result<&MatchRecord, ValidationError> {
        if reporter == opponent {
            return Err(ValidationError::SelfMatch(reporter));
        }
        let reporter_record = self.bumped(&reporter, result)?;
        let opponent_record = self.bumped(&opponent, result.inverse())?;

        self.players.insert(reporter.clone(), reporter_record);
        self.players.insert(opponent.clone(), opponent_record);

        self.matches.push(MatchRecord {
            reporter,
            opponent,
            result,
            score,
        });
        Ok(&self.matches[self.matches.len() - 1])
    }

    /// The record of `player` after `result`, without applying it.
    fn bumped(&self, player: &PlayerId, result: MatchResult) -> Result<PlayerRecord, ValidationError> {
        let record = self
            .players
            .get(player)
            .ok_or_else(|| ValidationError::NotRegistered(player.clone()))?;
        record
            .with_result(result)
            .ok_or_else(|| ValidationError::CounterOverflow(player.clone()))
    }

    /// Players ranked by wins, highest first.
    ///
    /// Ties are listed in player id order (string order of the ids), not in
    /// registration order. The file's player keys follow the same order.
    pub fn standings(&self) -> Vec<Standing> {
        let mut ranked: Vec<_> = self.players.iter().collect();
        ranked.sort_by(|(_, a), (_, b)| b.wins.cmp(&a.wins));

        ranked
            .into_iter()
            .enumerate()
            .map(|(idx, (player, record))| Standing {
                rank: idx + 1,
                player: player.clone(),
                name: record.name.clone(),
                wins: record.wins,
                losses: record.losses,
            })
            .collect()
    }

    /// Drop every player and match.
    pub fn clear(&mut self) {
        self.players.clear();
        self.matches.clear();
    }
}
