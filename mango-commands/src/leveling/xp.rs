use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use mango_core::{Context, Error};
use mango_database::impls::progression::progress;
use mango_utils::formatting::format_xp;

pub const META: CommandMeta = CommandMeta {
    name: "xp",
    desc: "Show current xp and what the next level needs.",
    category: "leveling",
    usage: "!xp [user]",
};

#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn xp(
    ctx: Context<'_>,
    #[description = "User to check"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target_id = user.as_ref().map_or(ctx.author().id, |user| user.id);
    let progress = progress(&ctx.data().db, &target_id.to_string()).await;

    ctx.say(format!(
        "<@{}>: {} XP | Next {}",
        target_id.get(),
        format_xp(progress.xp),
        progress.xp_needed
    ))
    .await?;
    Ok(())
}
