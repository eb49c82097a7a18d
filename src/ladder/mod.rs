//! Ladder command processing.
//!
//! The [`Ladder`] owns the in-memory [`Ledger`] and its [`JsonStore`]. Every
//! mutating command is applied to a staged copy of the ledger, written to
//! disk, and only then committed, so a failed write never leaves memory and
//! disk out of step. Commands can also be fed as an async stream of
//! [`Request`]s, which is how the chat layer serializes access.

use tokio_stream::{Stream, StreamExt};
use tracing::{error, info};

use crate::model::{MatchRecord, MatchResult, PlayerId, Standing};
use crate::store::{JsonStore, StoreError};

mod state;
pub use state::{Ledger, Registration};

mod error;
pub use error::{LadderError, ValidationError};

mod handle;
pub use handle::{LadderHandle, Request};

/// A command the ladder can apply.
#[derive(Debug, Clone)]
pub enum Command {
    /// Register `player` under display name `name`.
    Register { player: PlayerId, name: String },
    /// Record a match as reported by `reporter`.
    Report {
        reporter: PlayerId,
        opponent: PlayerId,
        result: MatchResult,
        score: String,
    },
    /// Read the current standings.
    Standings,
    /// Wipe every player and match.
    Reset,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Register { .. } => "register",
            Command::Report { .. } => "report",
            Command::Standings => "standings",
            Command::Reset => "reset",
        }
    }
}

/// What a successfully applied command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Registered(PlayerId),
    AlreadyRegistered(PlayerId),
    Reported(MatchRecord),
    Standings(Vec<Standing>),
    Reset,
}

/// The ledger together with the store it is persisted to.
pub struct Ladder {
    ledger: Ledger,
    store: JsonStore,
}

/// Public API
impl Ladder {
    /// Load the ledger from `store`, recovering from a missing or corrupt file.
    pub fn open(store: JsonStore) -> Result<Self, StoreError> {
        let ledger = store.load()?;
        Ok(Self { ledger, store })
    }

    /// Wrap an already loaded ledger.
    pub fn new(ledger: Ledger, store: JsonStore) -> Self {
        Self { ledger, store }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Serve requests until the stream ends.
    pub async fn run(&mut self, mut requests: impl Stream<Item = Request> + Unpin) {
        while let Some(Request { command, reply }) = requests.next().await {
            let result = self.apply(command);
            // the caller may have gone away; the command is applied regardless
            let _ = reply.send(result);
        }
    }

    /// Apply a single command on top of the current ledger.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, LadderError> {
        let label = command.name();
        let result = match command {
            Command::Register { player, name } => self.apply_register(player, name),
            Command::Report {
                reporter,
                opponent,
                result,
                score,
            } => self.apply_report(reporter, opponent, result, score),
            Command::Standings => Ok(Outcome::Standings(self.ledger.standings())),
            Command::Reset => self.apply_reset(),
        };
        Self::log_result(label, &result);
        result
    }
}

/// Private API
impl Ladder {
    fn log_result(command: &str, result: &Result<Outcome, LadderError>) {
        match result {
            Ok(outcome) => info!(?outcome, "{command} applied"),
            Err(LadderError::Validation(e)) => info!(reason = %e, "{command} skipped"),
            Err(e) => error!(reason = %e, "{command} failed"),
        }
    }

    /// Run `mutate` against a copy of the ledger, persist the copy, then
    /// swap it in.
    fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&mut Ledger) -> Result<T, ValidationError>,
    ) -> Result<T, LadderError> {
        let mut staged = self.ledger.clone();
        let value = mutate(&mut staged)?;
        self.store.save(&staged)?;
        self.ledger = staged;
        Ok(value)
    }

    fn apply_register(&mut self, player: PlayerId, name: String) -> Result<Outcome, LadderError> {
        if self.ledger.is_registered(&player) {
            return Ok(Outcome::AlreadyRegistered(player));
        }
        self.commit(|ledger| Ok(ledger.register(player.clone(), name)))?;
        Ok(Outcome::Registered(player))
    }

    fn apply_report(
        &mut self,
        reporter: PlayerId,
        opponent: PlayerId,
        result: MatchResult,
        score: String,
    ) -> Result<Outcome, LadderError> {
        let record = self.commit(|ledger| {
            ledger
                .record_match(reporter, opponent, result, score)
                .cloned()
        })?;
        Ok(Outcome::Reported(record))
    }

    fn apply_reset(&mut self) -> Result<Outcome, LadderError> {
        self.commit(|ledger| {
            ledger.clear();
            Ok(())
        })?;
        Ok(Outcome::Reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // test utils

    fn open(dir: &TempDir) -> Ladder {
        Ladder::open(JsonStore::new(dir.path().join("data.json"))).unwrap()
    }

    fn register(player: &str, name: &str) -> Command {
        Command::Register {
            player: player.to_string(),
            name: name.to_string(),
        }
    }

    fn report(reporter: &str, opponent: &str, result: MatchResult, score: &str) -> Command {
        Command::Report {
            reporter: reporter.to_string(),
            opponent: opponent.to_string(),
            result,
            score: score.to_string(),
        }
    }

    fn reload(dir: &TempDir) -> Ledger {
        JsonStore::new(dir.path().join("data.json")).load().unwrap()
    }

    // Register

    #[test]
    fn register_persists_player() {
        let dir = TempDir::new().unwrap();
        let mut ladder = open(&dir);

        let outcome = ladder.apply(register("1", "ana")).unwrap();
        assert_eq!(outcome, Outcome::Registered("1".to_string()));
        assert_eq!(reload(&dir).player("1").unwrap().name, "ana");
    }

    #[test]
    fn register_twice_reports_already_registered() {
        let dir = TempDir::new().unwrap();
        let mut ladder = open(&dir);
        ladder.apply(register("1", "ana")).unwrap();

        let outcome = ladder.apply(register("1", "ana")).unwrap();
        assert_eq!(outcome, Outcome::AlreadyRegistered("1".to_string()));
        assert_eq!(ladder.ledger().players.len(), 1);
    }

    // Report

    #[test]
    fn report_persists_match_and_counters() {
        let dir = TempDir::new().unwrap();
        let mut ladder = open(&dir);
        ladder.apply(register("1", "ana")).unwrap();
        ladder.apply(register("2", "bo")).unwrap();

        let outcome = ladder
            .apply(report("1", "2", MatchResult::Win, "3-1"))
            .unwrap();
        let Outcome::Reported(record) = outcome else {
            panic!("expected report outcome");
        };
        assert_eq!(record.score, "3-1");

        let on_disk = reload(&dir);
        assert_eq!(on_disk, *ladder.ledger());
        assert_eq!(on_disk.matches.len(), 1);
        assert_eq!(on_disk.player("1").unwrap().wins, 1);
        assert_eq!(on_disk.player("2").unwrap().losses, 1);
    }

    #[test]
    fn report_with_unregistered_player_fails() {
        let dir = TempDir::new().unwrap();
        let mut ladder = open(&dir);
        ladder.apply(register("1", "ana")).unwrap();

        let result = ladder.apply(report("1", "2", MatchResult::Loss, "0-2"));
        assert!(matches!(
            result,
            Err(LadderError::Validation(ValidationError::NotRegistered(ref p))) if p == "2"
        ));
        assert!(ladder.ledger().matches.is_empty());
        assert!(reload(&dir).matches.is_empty());
    }

    // Standings

    #[test]
    fn standings_reflect_reports() {
        let dir = TempDir::new().unwrap();
        let mut ladder = open(&dir);
        ladder.apply(register("1", "ana")).unwrap();
        ladder.apply(register("2", "bo")).unwrap();
        ladder
            .apply(report("1", "2", MatchResult::Loss, "1-2"))
            .unwrap();

        let Outcome::Standings(standings) = ladder.apply(Command::Standings).unwrap() else {
            panic!("expected standings");
        };
        assert_eq!(standings[0].name, "bo");
        assert_eq!(standings[1].name, "ana");
        assert_eq!(standings[1].losses, 1);
    }

    // Reset

    #[test]
    fn reset_clears_memory_and_disk() {
        let dir = TempDir::new().unwrap();
        let mut ladder = open(&dir);
        ladder.apply(register("1", "ana")).unwrap();
        ladder.apply(register("2", "bo")).unwrap();
        ladder
            .apply(report("2", "1", MatchResult::Win, "2-0"))
            .unwrap();

        assert_eq!(ladder.apply(Command::Reset).unwrap(), Outcome::Reset);
        assert_eq!(*ladder.ledger(), Ledger::default());
        assert_eq!(reload(&dir), Ledger::default());
        assert_eq!(
            ladder.apply(Command::Standings).unwrap(),
            Outcome::Standings(Vec::new())
        );
    }

    // Persistence failures

    #[test]
    fn failed_save_keeps_previous_ledger() {
        let dir = TempDir::new().unwrap();
        let mut ladder = open(&dir);
        ladder.apply(register("1", "ana")).unwrap();
        let before = ladder.ledger().clone();

        // a directory where the file should be makes every write fail
        let path = dir.path().join("data.json");
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let result = ladder.apply(register("2", "bo"));
        assert!(matches!(result, Err(LadderError::Persistence(_))));
        assert_eq!(*ladder.ledger(), before);
    }

    //  Async run()

    #[tokio::test]
    async fn run_answers_every_request() {
        let dir = TempDir::new().unwrap();
        let mut ladder = open(&dir);

        let (tx_a, rx_a) = tokio::sync::oneshot::channel();
        let (tx_b, rx_b) = tokio::sync::oneshot::channel();
        let requests = vec![
            Request {
                command: register("1", "ana"),
                reply: tx_a,
            },
            Request {
                command: report("1", "1", MatchResult::Win, "1-0"),
                reply: tx_b,
            },
        ];

        ladder.run(tokio_stream::iter(requests)).await;

        assert_eq!(
            rx_a.await.unwrap().unwrap(),
            Outcome::Registered("1".to_string())
        );
        assert!(matches!(
            rx_b.await.unwrap(),
            Err(LadderError::Validation(ValidationError::SelfMatch(_)))
        ));
    }
}
