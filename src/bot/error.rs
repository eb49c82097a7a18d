//! Chat-layer errors and their user-facing messages.

use poise::serenity_prelude as serenity;
use thiserror::Error;

use super::reply;
use crate::ladder::{LadderError, ValidationError};

/// Error returned by command handlers and raised by the framework hooks.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Ladder(#[from] LadderError),

    #[error("could not resolve member '{0}'")]
    Lookup(String),

    #[error("invalid arguments for {0}")]
    Arguments(String),

    #[error("missing administrator permission")]
    MissingPermission,

    #[error("discord error: {0}")]
    Discord(#[from] serenity::Error),
}

impl From<ValidationError> for BotError {
    fn from(e: ValidationError) -> Self {
        BotError::Ladder(LadderError::Validation(e))
    }
}

impl BotError {
    /// Classify a framework argument-parsing failure for `command`.
    pub fn from_argument_parse(
        command: &str,
        error: &(dyn std::error::Error + Send + Sync + 'static),
        input: Option<&str>,
    ) -> Self {
        if error.is::<serenity::MemberParseError>() {
            return BotError::Lookup(input.unwrap_or_default().to_string());
        }
        BotError::Arguments(command.to_string())
    }

    /// Message sent back to the channel. System faults never leak their
    /// underlying error text.
    pub fn user_message(&self, prefix: &str) -> String {
        match self {
            BotError::Ladder(LadderError::Validation(e)) => validation_message(e, prefix),
            BotError::Ladder(LadderError::Persistence(_)) => {
                "The ladder could not be saved, so nothing was changed. Please try again later."
                    .to_string()
            }
            BotError::Ladder(LadderError::Closed) => {
                "The ladder is not accepting commands right now.".to_string()
            }
            BotError::Lookup(input) => format!(
                "Could not find a member matching `{input}`. Mention your opponent, e.g. `{}`.",
                reply::usage("report", prefix)
            ),
            BotError::Arguments(command) => {
                format!("Usage: `{}`", reply::usage(command, prefix))
            }
            BotError::MissingPermission => {
                "You need administrator permission to use this command.".to_string()
            }
            BotError::Discord(_) => "Something went wrong while talking to Discord.".to_string(),
        }
    }
}

fn validation_message(error: &ValidationError, prefix: &str) -> String {
    match error {
        ValidationError::InvalidResult(_) => {
            "Result must be 'W' for win or 'L' for loss.".to_string()
        }
        ValidationError::SelfMatch(_) => "You cannot report a match against yourself.".to_string(),
        ValidationError::NotRegistered(_) => {
            format!("Both players must be registered. Use `{prefix}signup` to register.")
        }
        ValidationError::CounterOverflow(_) => {
            "This result cannot be recorded: a player's record is full. Ask an admin to reset the season."
                .to_string()
        }
    }
}
