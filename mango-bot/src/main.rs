mod console;
mod events;

use std::env;
use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use mango_core::{Config, Data, Error};
use mango_database::Database;
use mango_voice::{SoundLibrary, VoiceHub};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let config_path = env::var("MANGO_CONFIG").unwrap_or_else(|_| "config.json".to_owned());
    let config = Config::from_file(&config_path)?;
    let token = config.resolve_token(
        env::var("DISCORD_TOKEN")
            .or_else(|_| env::var("DISCORD_BOT_TOKEN"))
            .ok(),
    )?;
    let guild_id = match env::var("DISCORD_GUILD_ID") {
        Ok(raw) => Some(
            raw.trim()
                .parse::<u64>()
                .context("DISCORD_GUILD_ID must be a numeric guild id")?,
        ),
        Err(_) => None,
    };

    let data_file = env::var("MANGO_DATA_FILE").unwrap_or_else(|_| "data.json".to_owned());
    let db = Database::open(&data_file, config.progression_rules()?)
        .with_context(|| format!("failed to load user data from `{data_file}`"))?;

    let sounds_dir = env::var("MANGO_SOUNDS_DIR").unwrap_or_else(|_| "sounds".to_owned());
    let voice = VoiceHub::new(SoundLibrary::new(&sounds_dir));
    info!(sounds_dir = %sounds_dir, "Voice playback awaits an audio transport.");

    let console_enabled = env_bool("MANGO_CONSOLE_ENABLED", true);
    let config = Arc::new(config);

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_VOICE_STATES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: mango_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(mango_utils::COMMAND_PREFIX.to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup({
            let db = db.clone();
            let voice = voice.clone();
            move |ctx, ready, framework| {
                Box::pin(async move {
                    info!(user = %ready.user.name, "Mango has awoken!");

                    match guild_id {
                        Some(guild_id) => {
                            poise::builtins::register_in_guild(
                                ctx,
                                &framework.options().commands,
                                serenity::GuildId::new(guild_id),
                            )
                            .await?;
                        }
                        None => {
                            poise::builtins::register_globally(ctx, &framework.options().commands)
                                .await?;
                        }
                    }

                    Ok(Data { db, config, voice })
                })
            }
        })
        .build();

    info!("Mango is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    if console_enabled {
        tokio::spawn(console::run_console(
            db.clone(),
            voice,
            client.shard_manager.clone(),
        ));
    } else {
        info!("Operator console disabled (set MANGO_CONSOLE_ENABLED=true to enable).");
    }

    client.start().await?;

    if let Err(err) = db.store().persist().await {
        warn!(?err, "final snapshot write failed");
    }
    info!("Mango has shut down.");
    Ok(())
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = serenity::CreateEmbed::new()
                .title("Command Error")
                .description("Something went wrong while running this command.")
                .color(mango_utils::embed::DEFAULT_EMBED_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = mango_commands::find_command(&ctx.command().qualified_name)
                .map_or_else(
                    || format!("Usage: `!{}`", ctx.command().qualified_name),
                    |meta| format!("Usage: `{}`", meta.usage),
                );
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\n{}", input, usage)
            } else {
                format!("Missing required argument.\n{}", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn handle_event(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        events::leveling::handle_message_leveling(data, new_message).await?;
    }

    Ok(())
}
