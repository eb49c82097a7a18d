use poise::serenity_prelude as serenity;

use super::{BotError, Context, send};
use crate::ladder::Command;
use crate::model::MatchResult;

pub fn all() -> Vec<poise::Command<super::Data, BotError>> {
    vec![signup(), report(), leaderboard(), reset(), help()]
}

/// Register as a player.
#[poise::command(prefix_command)]
pub async fn signup(ctx: Context<'_>) -> Result<(), BotError> {
    let author = ctx.author();
    let command = Command::Register {
        player: author.id.to_string(),
        name: author.name.clone(),
    };
    let outcome = ctx.data().ladder.submit(command).await?;
    send(ctx, super::reply::outcome(&outcome)).await
}

/// Report a match result against another player.
#[poise::command(prefix_command, guild_only)]
pub async fn report(
    ctx: Context<'_>,
    opponent: serenity::Member,
    result: String,
    score: String,
) -> Result<(), BotError> {
    let result: MatchResult = result.parse()?;
    let command = Command::Report {
        reporter: ctx.author().id.to_string(),
        opponent: opponent.user.id.to_string(),
        result,
        score,
    };
    let outcome = ctx.data().ladder.submit(command).await?;
    send(ctx, super::reply::outcome(&outcome)).await
}

/// View the leaderboard.
#[poise::command(prefix_command)]
pub async fn leaderboard(ctx: Context<'_>) -> Result<(), BotError> {
    let outcome = ctx.data().ladder.submit(Command::Standings).await?;
    send(ctx, super::reply::outcome(&outcome)).await
}

/// Reset all scores for a new season.
#[poise::command(prefix_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn reset(ctx: Context<'_>) -> Result<(), BotError> {
    let outcome = ctx.data().ladder.submit(Command::Reset).await?;
    send(ctx, super::reply::outcome(&outcome)).await
}

/// List the available commands.
#[poise::command(prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), BotError> {
    send(ctx, super::reply::help(&ctx.data().prefix)).await
}
