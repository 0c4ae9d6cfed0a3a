use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::replies::{require_admin, settle, usage_message};
use mango_core::{Context, Error};
use mango_database::impls::economy::burn;
use mango_utils::formatting::format_money;

pub const META: CommandMeta = CommandMeta {
    name: "takemoney",
    desc: "Remove money from a user's balance, stopping at zero.",
    category: "admin",
    usage: "!takemoney <user> <amount>",
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn takemoney(
    ctx: Context<'_>,
    #[description = "Target user"] user: Option<serenity::User>,
    #[description = "Amount to remove"] amount: Option<u64>,
) -> Result<(), Error> {
    let Some(grant) = require_admin(ctx).await? else {
        return Ok(());
    };

    let (Some(user), Some(amount)) = (user, amount) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let result = burn(&ctx.data().db, &grant, &user.id.to_string(), amount).await;
    let Some(burn) = settle(ctx, result, "trying").await? else {
        return Ok(());
    };

    ctx.say(format!(
        "Money taken: {}. <@{}> now has {}.",
        format_money(burn.burned),
        user.id.get(),
        format_money(burn.balance)
    ))
    .await?;
    Ok(())
}
