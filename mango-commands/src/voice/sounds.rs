use crate::CommandMeta;
use crate::replies::say_ephemeral;
use mango_core::{Context, Error};
use mango_utils::embed::build_paginated_embed;

pub const META: CommandMeta = CommandMeta {
    name: "sounds",
    desc: "List the sounds that can be played.",
    category: "voice",
    usage: "!sounds [page]",
};

#[poise::command(prefix_command, slash_command, category = "Voice")]
pub async fn sounds(
    ctx: Context<'_>,
    #[description = "Page number"] page: Option<usize>,
) -> Result<(), Error> {
    let library = ctx.data().voice.sounds();
    let names = match library.list() {
        Ok(names) => names,
        Err(err) => {
            tracing::warn!(?err, "sound library unavailable");
            say_ephemeral(ctx, "Sounds folder not found.").await?;
            return Ok(());
        }
    };

    if names.is_empty() {
        say_ephemeral(ctx, "No .mp3 files found in sounds folder.").await?;
        return Ok(());
    }

    let embed = build_paginated_embed("Soundboard", &names[..], page.unwrap_or(1));
    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
