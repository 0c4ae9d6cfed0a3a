//! Refusal wording and the command-boundary split between refusals and failures.

use mango_core::{Context, Error};
use mango_database::{AdminGrant, CoreError};
use mango_utils::formatting::format_compact_duration;
use mango_utils::permissions::admin_grant;

pub const ADMIN_ONLY_MESSAGE: &str = "Admin only command.";
pub const NOT_CONNECTED_MESSAGE: &str = "Connect me to a voice channel first.";

pub fn guild_only_message() -> &'static str {
    "This command can only be used in a server."
}

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{}`", usage)
}

/// User-facing text for a refused operation, or `None` for failures that must propagate.
///
/// `activity` completes the cooldown sentence ("Wait 5m before `working` again.").
pub fn refusal_message(err: &CoreError, activity: &str) -> Option<String> {
    let message = match err {
        CoreError::Validation(reason) => capitalize(reason),
        CoreError::InsufficientFunds { .. } => "You don't have enough money.".to_owned(),
        CoreError::NoTarget => "They have no money to rob.".to_owned(),
        CoreError::CooldownActive { remaining_secs } => format!(
            "Wait {} before {} again.",
            format_compact_duration(*remaining_secs),
            activity
        ),
        CoreError::NotFound(verb) => format!("Unknown command `{}`.", verb),
        CoreError::Persistence(_) => return None,
    };

    Some(message)
}

/// Unwrap a core result, replying with the refusal text when it was refused.
///
/// Returns `Ok(None)` after a refusal has been sent. Persistence failures are
/// returned as errors for the framework error handler.
pub async fn settle<T>(
    ctx: Context<'_>,
    result: Result<T, CoreError>,
    activity: &str,
) -> Result<Option<T>, Error> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match refusal_message(&err, activity) {
            Some(message) => {
                ctx.say(message).await?;
                Ok(None)
            }
            None => Err(err.into()),
        },
    }
}

/// Issue an [`AdminGrant`] for the author, or tell them the command is admin only.
pub async fn require_admin(ctx: Context<'_>) -> Result<Option<AdminGrant>, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(None);
    };

    let grant = admin_grant(
        ctx.http(),
        guild_id,
        ctx.author().id,
        &ctx.data().config.admin_role_name,
    )
    .await?;

    if grant.is_none() {
        say_ephemeral(ctx, ADMIN_ONLY_MESSAGE).await?;
    }

    Ok(grant)
}

pub async fn say_ephemeral(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use mango_database::{CoreError, SnapshotError};

    use super::refusal_message;

    #[test]
    fn cooldown_refusal_uses_compact_duration() {
        let err = CoreError::CooldownActive {
            remaining_secs: 3590,
        };
        assert_eq!(
            refusal_message(&err, "working").as_deref(),
            Some("Wait 59m 50s before working again.")
        );
    }

    #[test]
    fn validation_reason_is_capitalized() {
        let err = CoreError::validation("amount must be positive");
        assert_eq!(
            refusal_message(&err, "paying").as_deref(),
            Some("Amount must be positive")
        );
    }

    #[test]
    fn persistence_failures_are_not_refusals() {
        let io = std::io::Error::other("disk full");
        let err = CoreError::Persistence(SnapshotError::Io {
            path: "data.json".into(),
            source: io,
        });
        assert_eq!(refusal_message(&err, "working"), None);
    }
}
