use poise::serenity_prelude as serenity;
use tracing::info;

use mango_core::{Data, Error};
use mango_database::impls::progression::award_message;

/// Count a guild message toward the author's progression.
pub async fn handle_message_leveling(data: &Data, message: &serenity::Message) -> Result<(), Error> {
    // Ignore bots and webhooks.
    if message.author.bot || message.webhook_id.is_some() {
        return Ok(());
    }

    if message.guild_id.is_none() {
        return Ok(());
    }

    let uid = message.author.id.to_string();
    let award = award_message(&data.db, &uid, message.content.chars().count()).await?;

    if award.levels_gained > 0 {
        info!(
            uid = %uid,
            level = award.progress.level,
            gained = award.levels_gained,
            "user leveled up"
        );
    }

    Ok(())
}
