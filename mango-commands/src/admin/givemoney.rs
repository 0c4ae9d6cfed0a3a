use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::replies::{require_admin, settle, usage_message};
use mango_core::{Context, Error};
use mango_database::impls::economy::mint;
use mango_utils::formatting::format_money;

pub const META: CommandMeta = CommandMeta {
    name: "givemoney",
    desc: "Create money in a user's balance.",
    category: "admin",
    usage: "!givemoney <user> <amount>",
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn givemoney(
    ctx: Context<'_>,
    #[description = "Target user"] user: Option<serenity::User>,
    #[description = "Amount to add"] amount: Option<u64>,
) -> Result<(), Error> {
    let Some(grant) = require_admin(ctx).await? else {
        return Ok(());
    };

    let (Some(user), Some(amount)) = (user, amount) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let result = mint(&ctx.data().db, &grant, &user.id.to_string(), amount).await;
    let Some(balance) = settle(ctx, result, "trying").await? else {
        return Ok(());
    };

    ctx.say(format!(
        "Money given. <@{}> now has {}.",
        user.id.get(),
        format_money(balance)
    ))
    .await?;
    Ok(())
}
