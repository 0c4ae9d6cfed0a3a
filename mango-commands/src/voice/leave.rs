use crate::CommandMeta;
use crate::replies::{guild_only_message, say_ephemeral};
use mango_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "leave",
    desc: "Stop playback and leave the voice channel.",
    category: "voice",
    usage: "!leave",
};

#[poise::command(prefix_command, slash_command, category = "Voice")]
pub async fn leave(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if ctx.data().voice.detach(guild_id.get()).await {
        say_ephemeral(ctx, "Disconnected.").await?;
    } else {
        say_ephemeral(ctx, "Not connected.").await?;
    }
    Ok(())
}
