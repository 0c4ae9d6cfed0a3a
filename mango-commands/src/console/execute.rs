use std::fmt::Write as _;

use mango_database::impls::economy::{self, CrimeOutcome};
use mango_database::impls::leaderboard::{DEFAULT_LEADERBOARD_SIZE, leaderboard};
use mango_database::impls::progression::{self, Progress};
use mango_database::impls::warnings::{record_warning, warning_count};
use mango_database::model::user::UserRecord;
use mango_database::{AdminGrant, CoreError, Database};
use mango_utils::formatting::{format_compact_duration, format_money, format_xp, leaderboard_value};
use mango_voice::languages::resolve_language;
use mango_voice::{PlaybackEnd, VoiceHub, synthesize_offloaded};
use tracing::warn;

use super::parse::{CONSOLE_VERBS, ConsoleCommand};

#[derive(Clone, Debug, PartialEq)]
pub enum ConsoleReply {
    Output(String),
    /// The operator asked the bot to shut down.
    Stop,
}

/// Clip id for console speech; console commands run one at a time.
const CONSOLE_CLIP_ID: u64 = 0;

/// Run one parsed console command on behalf of the local operator.
pub async fn execute(
    db: &Database,
    voice: &VoiceHub,
    grant: &AdminGrant,
    command: ConsoleCommand,
) -> Result<ConsoleReply, CoreError> {
    let output = match command {
        ConsoleCommand::Balance(uid) => {
            format!("{uid} has {}", format_money(economy::balance(db, &uid).await))
        }
        ConsoleCommand::Xp(uid) => {
            let progress = progression::progress(db, &uid).await;
            format!(
                "{uid}: {} XP | Next {}",
                format_xp(progress.xp),
                progress.xp_needed
            )
        }
        ConsoleCommand::Lvl(uid) => {
            format!("{uid} is level {}", progression::progress(db, &uid).await.level)
        }
        ConsoleCommand::Messages(uid) => format!(
            "{uid}: {} messages",
            progression::progress(db, &uid).await.messages
        ),
        ConsoleCommand::Warns(uid) => {
            format!("{uid} has {} warns", warning_count(db, &uid).await)
        }
        ConsoleCommand::User(uid) => describe_record(&db.user(&uid).await),
        ConsoleCommand::Leaderboard(kind) => {
            let entries = leaderboard(db, kind, DEFAULT_LEADERBOARD_SIZE).await;
            if entries.is_empty() {
                "Nobody is ranked yet.".to_owned()
            } else {
                entries
                    .iter()
                    .map(|entry| {
                        format!(
                            "{}. {}: {}",
                            entry.rank,
                            entry.uid,
                            leaderboard_value(kind, entry)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        ConsoleCommand::Pay { from, to, amount } => {
            let receipt = economy::transfer(db, &from, &to, amount).await?;
            format!(
                "{from} paid {} to {to} ({from}: {}, {to}: {})",
                format_money(receipt.amount),
                format_money(receipt.from_balance),
                format_money(receipt.to_balance)
            )
        }
        ConsoleCommand::Work(uid) => {
            let payout = economy::work(db, &uid).await?;
            format!(
                "{uid} worked and earned {} (balance {})",
                format_money(payout.earned),
                format_money(payout.balance)
            )
        }
        ConsoleCommand::Crime(uid) => match economy::crime(db, &uid).await? {
            CrimeOutcome::Succeeded { earned, balance } => format!(
                "{uid}'s crime succeeded: +{} (balance {})",
                format_money(earned),
                format_money(balance)
            ),
            CrimeOutcome::Failed { lost, balance } => format!(
                "{uid}'s crime failed: -{} (balance {})",
                format_money(lost),
                format_money(balance)
            ),
        },
        ConsoleCommand::Rob { uid, target } => {
            let robbery = economy::rob(db, &uid, &target).await?;
            format!(
                "{uid} robbed {} from {target}",
                format_money(robbery.stolen)
            )
        }
        ConsoleCommand::GiveXp { uid, amount } => progress_line(
            "Gave XP",
            &progression::grant_xp(db, grant, &uid, amount).await?,
        ),
        ConsoleCommand::TakeXp { uid, amount } => progress_line(
            "Took XP",
            &progression::revoke_xp(db, grant, &uid, amount).await?,
        ),
        ConsoleCommand::SetXp { uid, amount } => progress_line(
            "Set XP",
            &progression::set_xp(db, grant, &uid, amount).await?,
        ),
        ConsoleCommand::GiveLvl { uid, levels } => progress_line(
            "Gave levels",
            &progression::grant_levels(db, grant, &uid, levels).await?,
        ),
        ConsoleCommand::TakeLvl { uid, levels } => progress_line(
            "Took levels",
            &progression::revoke_levels(db, grant, &uid, levels).await?,
        ),
        ConsoleCommand::SetLvl { uid, level } => progress_line(
            "Set level",
            &progression::set_level(db, grant, &uid, level).await?,
        ),
        ConsoleCommand::GiveMoney { uid, amount } => {
            let balance = economy::mint(db, grant, &uid, amount).await?;
            format!("Gave {} to {uid} (balance {})", format_money(amount), format_money(balance))
        }
        ConsoleCommand::TakeMoney { uid, amount } => {
            let burn = economy::burn(db, grant, &uid, amount).await?;
            format!(
                "Took {} from {uid} (balance {})",
                format_money(burn.burned),
                format_money(burn.balance)
            )
        }
        ConsoleCommand::SetMoney { uid, amount } => {
            let balance = economy::set_balance(db, grant, &uid, amount).await?;
            format!("Set money to {} for {uid}", format_money(balance))
        }
        ConsoleCommand::Warn(uid) => {
            let warning = record_warning(db, grant, &uid).await?;
            format!("Warned {uid} (total {})", warning.warn_number)
        }
        ConsoleCommand::Say(text) => speak(voice, text).await,
        ConsoleCommand::Help => CONSOLE_VERBS
            .iter()
            .map(|(_, usage)| format!("  {usage}"))
            .collect::<Vec<_>>()
            .join("\n"),
        ConsoleCommand::Stop => return Ok(ConsoleReply::Stop),
    };

    Ok(ConsoleReply::Output(output))
}

/// Speak `text` in the lowest-numbered connected guild and wait for it to end.
async fn speak(voice: &VoiceHub, text: String) -> String {
    let Some(session) = voice.first_session().await else {
        return "Bot is not connected to a voice channel.".to_owned();
    };
    let Some(synthesizer) = voice.synthesizer() else {
        return "Speech is not available right now.".to_owned();
    };

    let language = resolve_language(None);
    let clip = match synthesize_offloaded(
        synthesizer,
        text,
        language.code,
        voice.clip_path(CONSOLE_CLIP_ID),
    )
    .await
    {
        Ok(clip) => clip,
        Err(err) => {
            warn!(?err, "console speech synthesis failed");
            return format!("Speech failed: {err}");
        }
    };

    let ticket = match session.play(clip.path()) {
        Ok(ticket) => ticket,
        Err(err) => {
            warn!(?err, "console speech playback failed");
            return format!("Playback failed: {err}");
        }
    };

    match session.wait_until_finished(ticket).await {
        PlaybackEnd::Finished => "Spoke in VC.".to_owned(),
        PlaybackEnd::Superseded => "Stopped: something else started playing.".to_owned(),
    }
}

fn progress_line(action: &str, progress: &Progress) -> String {
    format!(
        "{action} for {}: level {}, {} XP",
        progress.uid,
        progress.level,
        format_xp(progress.xp)
    )
}

fn describe_record(record: &UserRecord) -> String {
    let mut out = format!(
        "{}: xp={} level={} messages={} warns={} money={}",
        record.uid,
        format_xp(record.xp),
        record.level,
        record.messages,
        record.warns,
        format_money(record.money)
    );

    let now = mango_database::impls::cooldowns::now_unix_secs();
    for (action, last_used) in &record.cooldowns {
        let ago = now.saturating_sub(*last_used);
        let _ = write!(out, " {action}={} ago", format_compact_duration(ago));
    }

    out
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use mango_database::impls::progression::ProgressionRules;
    use mango_database::{AdminGrant, CoreError, Database};
    use mango_voice::{AudioSink, SoundLibrary, SpeechSynthesizer, VoiceHub};

    use super::{ConsoleReply, execute};
    use crate::console::ConsoleCommand;

    fn open_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().expect("tempdir");
        let rules = ProgressionRules::new(10.0, 5, 100.0, 50.0).expect("rules");
        let db = Database::open(dir.path().join("data.json"), rules).expect("open");
        (dir, db)
    }

    async fn run(db: &Database, line: &str) -> Result<ConsoleReply, CoreError> {
        run_with_voice(db, &VoiceHub::new(SoundLibrary::new("sounds")), line).await
    }

    async fn run_with_voice(
        db: &Database,
        voice: &VoiceHub,
        line: &str,
    ) -> Result<ConsoleReply, CoreError> {
        let command = ConsoleCommand::parse(line)?.expect("command");
        execute(db, voice, &AdminGrant::issue(), command).await
    }

    /// Finishes every clip immediately and remembers what it was given.
    #[derive(Default)]
    struct InstantSink {
        played: Mutex<Vec<(PathBuf, String)>>,
    }

    impl AudioSink for InstantSink {
        fn play(&self, source: &Path) -> anyhow::Result<()> {
            let contents = fs::read_to_string(source)?;
            self.played
                .lock()
                .expect("lock")
                .push((source.to_path_buf(), contents));
            Ok(())
        }

        fn stop(&self) {}

        fn is_playing(&self) -> bool {
            false
        }
    }

    struct EchoSynth;

    impl SpeechSynthesizer for EchoSynth {
        fn synthesize(&self, text: &str, language: &str, output: &Path) -> anyhow::Result<()> {
            fs::write(output, format!("{language}:{text}"))?;
            Ok(())
        }
    }

    fn output(reply: ConsoleReply) -> String {
        match reply {
            ConsoleReply::Output(text) => text,
            ConsoleReply::Stop => panic!("unexpected stop"),
        }
    }

    #[tokio::test]
    async fn money_commands_update_balances() {
        let (_dir, db) = open_db();

        run(&db, "givemoney 1 500").await.expect("give");
        let paid = output(run(&db, "pay 1 2 120").await.expect("pay"));
        assert_eq!(paid, "1 paid $120 to 2 (1: $380, 2: $120)");

        assert_eq!(
            output(run(&db, "balance 2").await.expect("balance")),
            "2 has $120"
        );

        assert!(matches!(
            run(&db, "pay 2 1 9999").await,
            Err(CoreError::InsufficientFunds { balance: 120, .. })
        ));
    }

    #[tokio::test]
    async fn xp_commands_cascade_levels() {
        let (_dir, db) = open_db();

        let line = output(run(&db, "givexp 3 475").await.expect("givexp"));
        assert_eq!(line, "Gave XP for 3: level 3, 0 XP");

        assert_eq!(
            output(run(&db, "lvl 3").await.expect("lvl")),
            "3 is level 3"
        );
    }

    #[tokio::test]
    async fn rob_on_empty_target_is_refused() {
        let (_dir, db) = open_db();
        assert!(matches!(
            run(&db, "rob 1 2").await,
            Err(CoreError::NoTarget)
        ));
        assert!(matches!(
            run(&db, "rob 1 2").await,
            Err(CoreError::CooldownActive { .. })
        ));
    }

    #[tokio::test]
    async fn stop_and_help() {
        let (_dir, db) = open_db();
        assert_eq!(run(&db, "stop").await.expect("stop"), ConsoleReply::Stop);
        assert!(output(run(&db, "help").await.expect("help")).contains("givexp <uid> <amount>"));
    }

    #[tokio::test]
    async fn say_without_voice_session_reports_not_connected() {
        let (_dir, db) = open_db();
        assert_eq!(
            output(run(&db, "say hei").await.expect("say")),
            "Bot is not connected to a voice channel."
        );
    }

    #[tokio::test]
    async fn say_speaks_in_finnish_and_cleans_up() {
        let (dir, db) = open_db();
        let sink = Arc::new(InstantSink::default());
        let voice = VoiceHub::new(SoundLibrary::new("sounds"))
            .with_synthesizer(Arc::new(EchoSynth))
            .with_scratch_dir(dir.path());
        voice.attach(5, sink.clone()).await;

        let reply = output(
            run_with_voice(&db, &voice, "say hyvää päivää")
                .await
                .expect("say"),
        );
        assert_eq!(reply, "Spoke in VC.");

        let played = sink.played.lock().expect("lock");
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].1, "fi:hyvää päivää");
        assert!(!played[0].0.exists());
    }

    #[tokio::test]
    async fn say_without_synthesizer_is_unavailable() {
        let (_dir, db) = open_db();
        let voice = VoiceHub::new(SoundLibrary::new("sounds"));
        voice.attach(5, Arc::new(InstantSink::default())).await;

        assert_eq!(
            output(run_with_voice(&db, &voice, "say hei").await.expect("say")),
            "Speech is not available right now."
        );
    }

    #[tokio::test]
    async fn warn_and_user_record() {
        let (_dir, db) = open_db();
        run(&db, "warn 8 being rude").await.expect("warn");
        assert_eq!(
            output(run(&db, "warns 8").await.expect("warns")),
            "8 has 1 warns"
        );
        assert_eq!(
            output(run(&db, "user 8").await.expect("user")),
            "8: xp=0 level=0 messages=0 warns=1 money=$0"
        );
    }
}
