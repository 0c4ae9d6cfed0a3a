use crate::CommandMeta;
use crate::replies::{NOT_CONNECTED_MESSAGE, guild_only_message, say_ephemeral};
use mango_core::{Context, Error};
use mango_voice::SoundError;

pub const META: CommandMeta = CommandMeta {
    name: "sound",
    desc: "Play an mp3 from the sounds folder.",
    category: "voice",
    usage: "!sound <name>",
};

#[poise::command(prefix_command, slash_command, category = "Voice")]
pub async fn sound(
    ctx: Context<'_>,
    #[description = "Sound name (example: test or test.mp3)"] name: String,
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

    let path = match voice.sounds().resolve(&name) {
        Ok(path) => path,
        Err(SoundError::InvalidName) => {
            say_ephemeral(ctx, "Invalid filename.").await?;
            return Ok(());
        }
        Err(SoundError::NotFound(file_name)) => {
            say_ephemeral(ctx, format!("Sound `{file_name}` not found in sounds folder."))
                .await?;
            return Ok(());
        }
    };

    session.play(&path)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    say_ephemeral(ctx, format!("Playing `{file_name}`.")).await?;
    Ok(())
}
