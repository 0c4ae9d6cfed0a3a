use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::replies::{require_admin, settle, usage_message};
use mango_core::{Context, Error};
use mango_database::impls::warnings::record_warning;

pub const META: CommandMeta = CommandMeta {
    name: "warn",
    desc: "Add a warning to a user's record.",
    category: "admin",
    usage: "!warn <user> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "The user to warn"] user: Option<serenity::User>,
    #[description = "Reason for warning"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(grant) = require_admin(ctx).await? else {
        return Ok(());
    };

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let reason = reason.unwrap_or_else(|| "No reason".to_owned());
    let result = record_warning(&ctx.data().db, &grant, &user.id.to_string()).await;
    let Some(warning) = settle(ctx, result, "trying").await? else {
        return Ok(());
    };

    info!(
        target_user = %user.id,
        moderator = %ctx.author().id,
        warn_number = warning.warn_number,
        reason = %reason,
        "user warned"
    );

    ctx.say(format!(
        "<@{}> warned | Total: {}",
        user.id.get(),
        warning.warn_number
    ))
    .await?;
    Ok(())
}
