use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use mango_core::{Context, Error};
use mango_database::impls::progression::progress;

pub const META: CommandMeta = CommandMeta {
    name: "messages",
    desc: "Show how many messages have been counted.",
    category: "leveling",
    usage: "!messages [user]",
};

#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn messages(
    ctx: Context<'_>,
    #[description = "User to check"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target_id = user.as_ref().map_or(ctx.author().id, |user| user.id);
    let progress = progress(&ctx.data().db, &target_id.to_string()).await;

    ctx.say(format!(
        "<@{}>: {} messages",
        target_id.get(),
        progress.messages
    ))
    .await?;
    Ok(())
}
