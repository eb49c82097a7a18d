//! Rendering of ladder outcomes into chat replies.

use crate::ladder::Outcome;
use crate::model::{MatchResult, Standing};

const LEADERBOARD_COLOUR: u32 = 0x3498db;
const HELP_COLOUR: u32 = 0x2ecc71;

/// Commands listed by `help`: (usage after the prefix, description).
const COMMANDS: [(&str, &str); 4] = [
    ("signup", "Register as a player."),
    ("report @opponent W/L score", "Report a match result."),
    ("leaderboard", "View the leaderboard."),
    ("reset", "Reset all scores (admin only)."),
];

/// A reply to send back to the invoking channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Embed(Embed),
}

/// Platform-neutral embed: a title, a colour and stacked name/value fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub colour: u32,
    pub fields: Vec<(String, String)>,
}

fn mention(player: &str) -> String {
    format!("<@{player}>")
}

/// Full usage line for `command`, e.g. `!report @opponent W/L score`.
pub fn usage(command: &str, prefix: &str) -> String {
    let line = COMMANDS
        .iter()
        .map(|(usage, _)| *usage)
        .find(|usage| usage.split_whitespace().next() == Some(command))
        .unwrap_or(command);
    format!("{prefix}{line}")
}

pub fn outcome(outcome: &Outcome) -> Reply {
    match outcome {
        Outcome::Registered(player) => {
            Reply::Text(format!("{}, you have been registered!", mention(player)))
        }
        Outcome::AlreadyRegistered(player) => {
            Reply::Text(format!("{}, you are already registered!", mention(player)))
        }
        Outcome::Reported(record) => {
            let verb = match record.result {
                MatchResult::Win => "won",
                MatchResult::Loss => "lost",
            };
            Reply::Text(format!(
                "Match reported: {} {verb} against {} with score {}.",
                mention(&record.reporter),
                mention(&record.opponent),
                record.score
            ))
        }
        Outcome::Standings(standings) => leaderboard(standings),
        Outcome::Reset => {
            Reply::Text("All player data has been reset for the new season.".to_string())
        }
    }
}

fn leaderboard(standings: &[Standing]) -> Reply {
    let fields = standings
        .iter()
        .map(|s| {
            (
                format!("{}. {}", s.rank, s.name),
                format!("Wins: {}, Losses: {}", s.wins, s.losses),
            )
        })
        .collect();

    Reply::Embed(Embed {
        title: "Leaderboard".to_string(),
        colour: LEADERBOARD_COLOUR,
        fields,
    })
}

pub fn help(prefix: &str) -> Reply {
    let fields = COMMANDS
        .iter()
        .map(|(usage, description)| (format!("{prefix}{usage}"), description.to_string()))
        .collect();

    Reply::Embed(Embed {
        title: "Bot Commands".to_string(),
        colour: HELP_COLOUR,
        fields,
    })
}
