use std::time::Instant;

use mango_core::{Context, Error};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Replies with Pong! and the round trip time.",
    category: "utility",
    usage: "!ping",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let started = Instant::now();
    let reply = ctx.say("Pong!").await?;
    let elapsed = started.elapsed().as_millis();

    reply
        .edit(
            ctx,
            poise::CreateReply::default().content(format!("Pong! ({elapsed}ms)")),
        )
        .await?;
    Ok(())
}
