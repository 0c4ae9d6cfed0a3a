use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use mango_core::{Context, Error};
use mango_database::impls::economy;
use mango_utils::formatting::format_money;

pub const META: CommandMeta = CommandMeta {
    name: "balance",
    desc: "Show how much money you or another user has.",
    category: "economy",
    usage: "!balance [user]",
};

#[poise::command(prefix_command, slash_command, category = "Economy")]
pub async fn balance(
    ctx: Context<'_>,
    #[description = "User to check"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target_id = user.as_ref().map_or(ctx.author().id, |user| user.id);
    let money = economy::balance(&ctx.data().db, &target_id.to_string()).await;

    ctx.say(format!("<@{}> has {}", target_id.get(), format_money(money)))
        .await?;
    Ok(())
}
