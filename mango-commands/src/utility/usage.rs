use mango_core::{Context, Error};

use crate::replies::usage_message;
use crate::{CommandMeta, find_command};

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    desc: "Show usage syntax for a specific command.",
    category: "utility",
    usage: "!usage <command>",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn usage(
    ctx: Context<'_>,
    #[description = "Command name"] command: Option<String>,
) -> Result<(), Error> {
    let Some(raw_name) = command.as_deref() else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some(command) = find_command(raw_name) else {
        ctx.say(format!(
            "Unknown command: `{}`",
            raw_name.trim().trim_start_matches('!')
        ))
        .await?;
        return Ok(());
    };

    ctx.say(usage_message(command.usage)).await?;
    Ok(())
}
