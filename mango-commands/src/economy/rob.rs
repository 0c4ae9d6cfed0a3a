use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::replies::{settle, usage_message};
use mango_core::{Context, Error};
use mango_database::CoreError;
use mango_database::impls::economy;
use mango_utils::formatting::format_money;

pub const META: CommandMeta = CommandMeta {
    name: "rob",
    desc: "Try to steal money from another user. Once every three hours.",
    category: "economy",
    usage: "!rob <user>",
};

#[poise::command(prefix_command, slash_command, category = "Economy")]
pub async fn rob(
    ctx: Context<'_>,
    #[description = "User to rob"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if user.bot {
        ctx.say("You can't rob bots.").await?;
        return Ok(());
    }

    let result = economy::rob(
        &ctx.data().db,
        &ctx.author().id.to_string(),
        &user.id.to_string(),
    )
    .await;

    if matches!(result, Err(CoreError::NoTarget)) {
        ctx.say(format!("<@{}> has no money to rob.", user.id.get()))
            .await?;
        return Ok(());
    }

    let Some(robbery) = settle(ctx, result, "robbing").await? else {
        return Ok(());
    };

    ctx.say(format!(
        "You robbed {} from <@{}>!",
        format_money(robbery.stolen),
        user.id.get()
    ))
    .await?;
    Ok(())
}
