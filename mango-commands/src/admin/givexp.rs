use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::admin::progress_line;
use crate::replies::{require_admin, settle, usage_message};
use mango_core::{Context, Error};
use mango_database::impls::progression::grant_xp;

pub const META: CommandMeta = CommandMeta {
    name: "givexp",
    desc: "Give xp to a user; levels follow automatically.",
    category: "admin",
    usage: "!givexp <user> <amount>",
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn givexp(
    ctx: Context<'_>,
    #[description = "Target user"] user: Option<serenity::User>,
    #[description = "XP to add"] amount: Option<f64>,
) -> Result<(), Error> {
    let Some(grant) = require_admin(ctx).await? else {
        return Ok(());
    };

    let (Some(user), Some(amount)) = (user, amount) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let result = grant_xp(&ctx.data().db, &grant, &user.id.to_string(), amount).await;
    let Some(progress) = settle(ctx, result, "trying").await? else {
        return Ok(());
    };

    ctx.say(progress_line("XP given.", &progress)).await?;
    Ok(())
}
