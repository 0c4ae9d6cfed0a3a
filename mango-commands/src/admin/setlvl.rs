use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::admin::progress_line;
use crate::replies::{require_admin, settle, usage_message};
use mango_core::{Context, Error};
use mango_database::impls::progression::set_level;

pub const META: CommandMeta = CommandMeta {
    name: "setlvl",
    desc: "Set a user's level and reset their xp.",
    category: "admin",
    usage: "!setlvl <user> <level>",
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn setlvl(
    ctx: Context<'_>,
    #[description = "Target user"] user: Option<serenity::User>,
    #[description = "New level"] level: Option<i64>,
) -> Result<(), Error> {
    let Some(grant) = require_admin(ctx).await? else {
        return Ok(());
    };

    let (Some(user), Some(level)) = (user, level) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let result = set_level(&ctx.data().db, &grant, &user.id.to_string(), level).await;
    let Some(progress) = settle(ctx, result, "trying").await? else {
        return Ok(());
    };

    ctx.say(progress_line("Level set.", &progress)).await?;
    Ok(())
}
