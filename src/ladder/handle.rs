use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use super::{Command, Ladder, LadderError, Outcome};

/// A command paired with the channel its result is sent back on.
#[derive(Debug)]
pub struct Request {
    pub command: Command,
    pub reply: oneshot::Sender<Result<Outcome, LadderError>>,
}

/// Cloneable front for a ladder running on its own task.
///
/// All commands funnel through one queue, so mutations and their saves are
/// applied strictly one after another.
#[derive(Debug, Clone)]
pub struct LadderHandle {
    sender: mpsc::Sender<Request>,
}

impl LadderHandle {
    /// Move `ladder` onto a background task and return a handle to it.
    ///
    /// The task stops once every handle has been dropped.
    pub fn spawn(mut ladder: Ladder) -> Self {
        let (sender, receiver) = mpsc::channel(16);
        tokio::spawn(async move {
            ladder.run(ReceiverStream::new(receiver)).await;
            debug!("ladder task stopped");
        });
        Self { sender }
    }

    /// Queue `command` and wait for its result.
    pub async fn submit(&self, command: Command) -> Result<Outcome, LadderError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Request { command, reply })
            .await
            .map_err(|_| LadderError::Closed)?;
        response.await.map_err(|_| LadderError::Closed)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ladder::{Ledger, ValidationError};
    use crate::model::MatchResult;
    use crate::store::JsonStore;
    use tempfile::TempDir;

    fn spawn_in(dir: &TempDir) -> LadderHandle {
        let store = JsonStore::new(dir.path().join("data.json"));
        LadderHandle::spawn(Ladder::open(store).unwrap())
    }

    fn register(player: &str) -> Command {
        Command::Register {
            player: player.to_string(),
            name: format!("player-{player}"),
        }
    }

    #[tokio::test]
    async fn submit_round_trips_through_task() {
        let dir = TempDir::new().unwrap();
        let ladder = spawn_in(&dir);

        let outcome = ladder.submit(register("1")).await.unwrap();
        assert_eq!(outcome, Outcome::Registered("1".to_string()));
    }

    #[tokio::test]
    async fn concurrent_reports_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let ladder = spawn_in(&dir);
        ladder.submit(register("1")).await.unwrap();
        ladder.submit(register("2")).await.unwrap();

        let mut tasks = Vec::new();
        for n in 0..20 {
            let ladder = ladder.clone();
            tasks.push(tokio::spawn(async move {
                ladder
                    .submit(Command::Report {
                        reporter: "1".to_string(),
                        opponent: "2".to_string(),
                        result: MatchResult::Win,
                        score: format!("{n}-0"),
                    })
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let on_disk: Ledger = JsonStore::new(dir.path().join("data.json"))
            .load()
            .unwrap();
        assert_eq!(on_disk.matches.len(), 20);
        assert_eq!(on_disk.player("1").unwrap().wins, 20);
        assert_eq!(on_disk.player("2").unwrap().losses, 20);
    }

    #[tokio::test]
    async fn rejected_report_at_counter_limit_keeps_task_alive() {
        let dir = TempDir::new().unwrap();
        let json = format!(
            r#"{{"players": {{
                "1": {{"name": "ana", "wins": {}, "losses": 0}},
                "2": {{"name": "bo", "wins": 0, "losses": 0}}
            }}}}"#,
            u32::MAX
        );
        std::fs::write(dir.path().join("data.json"), json).unwrap();
        let ladder = spawn_in(&dir);

        let result = ladder
            .submit(Command::Report {
                reporter: "1".to_string(),
                opponent: "2".to_string(),
                result: MatchResult::Win,
                score: "1-0".to_string(),
            })
            .await;
        assert!(matches!(
            result,
            Err(LadderError::Validation(ValidationError::CounterOverflow(ref p))) if p == "1"
        ));

        let Outcome::Standings(standings) = ladder.submit(Command::Standings).await.unwrap() else {
            panic!("expected standings");
        };
        assert_eq!(standings[0].wins, u32::MAX);
        assert_eq!(standings[1].losses, 0);
    }

    #[tokio::test]
    async fn submit_after_task_stopped_is_closed() {
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);
        let ladder = LadderHandle { sender };

        let result = ladder.submit(Command::Standings).await;
        assert!(matches!(result, Err(LadderError::Closed)));
    }
}
