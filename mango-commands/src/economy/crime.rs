use crate::CommandMeta;
use crate::replies::settle;
use mango_core::{Context, Error};
use mango_database::impls::economy::{self, CrimeOutcome};
use mango_utils::formatting::format_money;

pub const META: CommandMeta = CommandMeta {
    name: "crime",
    desc: "Gamble on a crime: win big or pay a fine. Once every two hours.",
    category: "economy",
    usage: "!crime",
};

#[poise::command(prefix_command, slash_command, category = "Economy")]
pub async fn crime(ctx: Context<'_>) -> Result<(), Error> {
    let result = economy::crime(&ctx.data().db, &ctx.author().id.to_string()).await;
    let Some(outcome) = settle(ctx, result, "committing a crime").await? else {
        return Ok(());
    };

    let message = match outcome {
        CrimeOutcome::Succeeded { earned, .. } => {
            format!("Crime succeeded! You got {}.", format_money(earned))
        }
        CrimeOutcome::Failed { lost, .. } => {
            format!("Crime failed! You lost {}.", format_money(lost))
        }
    };

    ctx.say(message).await?;
    Ok(())
}
