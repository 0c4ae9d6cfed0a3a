use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::replies::{require_admin, usage_message};
use mango_core::{Context, Error};
use mango_database::impls::warnings::warning_count;

pub const META: CommandMeta = CommandMeta {
    name: "warns",
    desc: "Show how many warnings a user has.",
    category: "admin",
    usage: "!warns <user>",
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn warns(
    ctx: Context<'_>,
    #[description = "User to check"] user: Option<serenity::User>,
) -> Result<(), Error> {
    if require_admin(ctx).await?.is_none() {
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let count = warning_count(&ctx.data().db, &user.id.to_string()).await;
    ctx.say(format!("<@{}> has {} warns", user.id.get(), count))
        .await?;
    Ok(())
}
