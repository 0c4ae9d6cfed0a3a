use tracing::debug;

use crate::CommandMeta;
use crate::replies::{NOT_CONNECTED_MESSAGE, guild_only_message, say_ephemeral};
use mango_core::{Context, Error};
use mango_voice::languages::resolve_language;
use mango_voice::{PlaybackEnd, synthesize_offloaded};

pub const META: CommandMeta = CommandMeta {
    name: "say",
    desc: "Speak text in the voice channel (default language: Finnish).",
    category: "voice",
    usage: "!say \"<text>\" [language]",
};

#[poise::command(prefix_command, slash_command, category = "Voice")]
pub async fn say(
    ctx: Context<'_>,
    #[description = "Text to speak"] text: String,
    #[description = "Language code, e.g. en or fi"] language: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let voice = &ctx.data().voice;
    let Some(session) = voice.session(guild_id.get()).await else {
        say_ephemeral(ctx, NOT_CONNECTED_MESSAGE).await?;
        return Ok(());
    };
    let Some(synthesizer) = voice.synthesizer() else {
        say_ephemeral(ctx, "Speech is not available right now.").await?;
        return Ok(());
    };

    let language = resolve_language(language.as_deref());
    ctx.defer().await?;

    let clip =
        synthesize_offloaded(synthesizer, text, language.code, voice.clip_path(ctx.id())).await?;
    let ticket = session.play(clip.path())?;

    let reply = match session.wait_until_finished(ticket).await {
        PlaybackEnd::Finished => format!("Done speaking in **{}**.", language.name),
        PlaybackEnd::Superseded => {
            debug!(guild_id = %guild_id, "speech interrupted by a newer request");
            "Stopped: something else started playing.".to_owned()
        }
    };
    drop(clip);

    say_ephemeral(ctx, reply).await?;
    Ok(())
}
