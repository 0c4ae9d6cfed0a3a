use crate::CommandMeta;
use crate::replies::settle;
use mango_core::{Context, Error};
use mango_database::impls::economy;
use mango_utils::formatting::format_money;

pub const META: CommandMeta = CommandMeta {
    name: "work",
    desc: "Work a shift for some money. Once per hour.",
    category: "economy",
    usage: "!work",
};

#[poise::command(prefix_command, slash_command, category = "Economy")]
pub async fn work(ctx: Context<'_>) -> Result<(), Error> {
    let result = economy::work(&ctx.data().db, &ctx.author().id.to_string()).await;
    let Some(payout) = settle(ctx, result, "working").await? else {
        return Ok(());
    };

    ctx.say(format!(
        "You worked and earned {}! Balance: {}",
        format_money(payout.earned),
        format_money(payout.balance)
    ))
    .await?;
    Ok(())
}
