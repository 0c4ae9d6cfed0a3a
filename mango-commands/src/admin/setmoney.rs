use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::replies::{require_admin, settle, usage_message};
use mango_core::{Context, Error};
use mango_database::impls::economy::set_balance;
use mango_utils::formatting::format_money;

pub const META: CommandMeta = CommandMeta {
    name: "setmoney",
    desc: "Overwrite a user's balance.",
    category: "admin",
    usage: "!setmoney <user> <amount>",
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn setmoney(
    ctx: Context<'_>,
    #[description = "Target user"] user: Option<serenity::User>,
    #[description = "New balance"] amount: Option<i64>,
) -> Result<(), Error> {
    let Some(grant) = require_admin(ctx).await? else {
        return Ok(());
    };

    let (Some(user), Some(amount)) = (user, amount) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let result = set_balance(&ctx.data().db, &grant, &user.id.to_string(), amount).await;
    let Some(balance) = settle(ctx, result, "trying").await? else {
        return Ok(());
    };

    ctx.say(format!(
        "Money set. <@{}> now has {}.",
        user.id.get(),
        format_money(balance)
    ))
    .await?;
    Ok(())
}
