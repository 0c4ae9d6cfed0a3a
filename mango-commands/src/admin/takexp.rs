use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::admin::progress_line;
use crate::replies::{require_admin, settle, usage_message};
use mango_core::{Context, Error};
use mango_database::impls::progression::revoke_xp;

pub const META: CommandMeta = CommandMeta {
    name: "takexp",
    desc: "Take xp from a user without lowering their level.",
    category: "admin",
    usage: "!takexp <user> <amount>",
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn takexp(
    ctx: Context<'_>,
    #[description = "Target user"] user: Option<serenity::User>,
    #[description = "XP to remove"] amount: Option<f64>,
) -> Result<(), Error> {
    let Some(grant) = require_admin(ctx).await? else {
        return Ok(());
    };

    let (Some(user), Some(amount)) = (user, amount) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let result = revoke_xp(&ctx.data().db, &grant, &user.id.to_string(), amount).await;
    let Some(progress) = settle(ctx, result, "trying").await? else {
        return Ok(());
    };

    ctx.say(progress_line("XP taken.", &progress)).await?;
    Ok(())
}
