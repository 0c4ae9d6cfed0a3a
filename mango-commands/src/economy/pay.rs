use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::replies::{settle, usage_message};
use mango_core::{Context, Error};
use mango_database::impls::economy::transfer;
use mango_utils::formatting::format_money;

pub const META: CommandMeta = CommandMeta {
    name: "pay",
    desc: "Send some of your money to another user.",
    category: "economy",
    usage: "!pay <user> <amount>",
};

#[poise::command(prefix_command, slash_command, category = "Economy")]
pub async fn pay(
    ctx: Context<'_>,
    #[description = "User to pay"] user: Option<serenity::User>,
    #[description = "Amount to send"] amount: Option<i64>,
) -> Result<(), Error> {
    let (Some(user), Some(amount)) = (user, amount) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if amount <= 0 {
        ctx.say("Amount must be positive.").await?;
        return Ok(());
    }

    let result = transfer(
        &ctx.data().db,
        &ctx.author().id.to_string(),
        &user.id.to_string(),
        amount,
    )
    .await;

    let Some(receipt) = settle(ctx, result, "paying").await? else {
        return Ok(());
    };

    ctx.say(format!(
        "<@{}> paid {} to <@{}>",
        ctx.author().id.get(),
        format_money(receipt.amount),
        user.id.get()
    ))
    .await?;
    Ok(())
}
