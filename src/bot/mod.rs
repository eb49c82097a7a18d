//! Discord front end.
//!
//! Prefix commands are parsed by `poise`; each handler turns its arguments
//! into a ladder [`Command`](crate::ladder::Command), submits it through the
//! shared [`LadderHandle`] and renders the outcome. Every failure, whether
//! raised by a handler or by the framework while parsing, is routed through
//! [`on_error`] and [`BotError::user_message`].

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

use crate::ladder::LadderHandle;

mod commands;
mod error;
pub mod reply;

pub use error::BotError;
use reply::{Embed, Reply};

/// State shared by every command invocation.
pub struct Data {
    pub ladder: LadderHandle,
    pub prefix: String,
}

pub type Context<'a> = poise::Context<'a, Data, BotError>;

/// Connect to Discord and serve commands until the gateway connection ends.
pub async fn run(token: &str, prefix: String, ladder: LadderHandle) -> Result<(), serenity::Error> {
    let options = poise::FrameworkOptions {
        commands: commands::all(),
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(prefix.clone()),
            ..Default::default()
        },
        on_error: |error| Box::pin(on_error(error)),
        ..Default::default()
    };

    let framework = poise::Framework::builder()
        .options(options)
        .setup(move |_ctx, ready, _framework| {
            Box::pin(async move {
                info!(user = %ready.user.name, prefix = %prefix, "connected to discord");
                Ok(Data { ladder, prefix })
            })
        })
        .build();

    // member lookups for `report` need the privileged members intent
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await
}

async fn send(ctx: Context<'_>, reply: Reply) -> Result<(), BotError> {
    match reply {
        Reply::Text(text) => {
            ctx.say(text).await?;
        }
        Reply::Embed(embed) => {
            ctx.send(poise::CreateReply::default().embed(create_embed(embed)))
                .await?;
        }
    }
    Ok(())
}

fn create_embed(embed: Embed) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(embed.title)
        .colour(embed.colour)
        .fields(
            embed
                .fields
                .into_iter()
                .map(|(name, value)| (name, value, false)),
        )
}

async fn on_error(error: poise::FrameworkError<'_, Data, BotError>) {
    let (ctx, error) = match error {
        poise::FrameworkError::Command { error, ctx, .. } => (ctx, error),
        poise::FrameworkError::ArgumentParse {
            error, input, ctx, ..
        } => {
            let error =
                BotError::from_argument_parse(&ctx.command().name, error.as_ref(), input.as_deref());
            (ctx, error)
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            (ctx, BotError::MissingPermission)
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!(reason = %e, "failed to handle framework error");
            }
            return;
        }
    };

    warn!(
        command = %ctx.command().name,
        user = %ctx.author().id,
        reason = %error,
        "command failed"
    );

    let message = error.user_message(&ctx.data().prefix);
    if let Err(e) = ctx.say(message).await {
        error!(reason = %e, "failed to send error reply");
    }
}
