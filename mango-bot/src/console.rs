use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use mango_commands::console::{ConsoleCommand, ConsoleReply, execute};
use mango_database::{AdminGrant, CoreError, Database};
use mango_voice::VoiceHub;

/// Read operator commands from stdin until `stop` or end of input.
///
/// Shares the same [`Database`] and [`VoiceHub`] as the chat commands, so both
/// surfaces go through one serialized store and one playback slot per guild.
pub async fn run_console(
    db: Database,
    voice: VoiceHub,
    shard_manager: Arc<serenity::ShardManager>,
) {
    let grant = AdminGrant::issue();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    info!("console command system ready");

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("console input closed");
                return;
            }
            Err(err) => {
                error!(?err, "failed to read console input");
                return;
            }
        };

        let command = match ConsoleCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{}", refusal_text(&err));
                continue;
            }
        };

        match execute(&db, &voice, &grant, command).await {
            Ok(ConsoleReply::Output(text)) => println!("{text}"),
            Ok(ConsoleReply::Stop) => {
                println!("Shutting down bot...");
                shard_manager.shutdown_all().await;
                return;
            }
            Err(err) if err.is_refusal() => println!("{}", refusal_text(&err)),
            Err(err) => error!(?err, "console command failed"),
        }
    }
}

fn refusal_text(err: &CoreError) -> String {
    match err {
        CoreError::NotFound(verb) => {
            warn!(verb = %verb, "unknown console command");
            format!("Unknown console command `{verb}`. Type `help` for the list.")
        }
        other => format!("Refused: {other}"),
    }
}
