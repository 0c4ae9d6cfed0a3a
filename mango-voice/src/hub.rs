use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::playback::{AudioSink, PlaybackSlot};
use crate::sounds::SoundLibrary;
use crate::speech::{self, SpeechSynthesizer};

/// Voice sessions by guild id, plus the shared sound library and synthesizer.
#[derive(Clone)]
pub struct VoiceHub {
    sessions: Arc<RwLock<HashMap<u64, Arc<PlaybackSlot>>>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    sounds: SoundLibrary,
    scratch_dir: PathBuf,
}

impl VoiceHub {
    pub fn new(sounds: SoundLibrary) -> Self {
        Self {
            sessions: Arc::default(),
            synthesizer: None,
            sounds,
            scratch_dir: std::env::temp_dir(),
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Register the audio output for a guild once the bot has joined a channel.
    pub async fn attach(&self, guild_id: u64, sink: Arc<dyn AudioSink>) -> Arc<PlaybackSlot> {
        let slot = Arc::new(PlaybackSlot::new(sink));
        let previous = self.sessions.write().await.insert(guild_id, slot.clone());
        if let Some(previous) = previous {
            previous.stop();
        }

        info!(guild_id, "voice session attached");
        slot
    }

    /// Stop playback and forget the guild's session. Returns whether one existed.
    pub async fn detach(&self, guild_id: u64) -> bool {
        let Some(slot) = self.sessions.write().await.remove(&guild_id) else {
            return false;
        };

        slot.stop();
        info!(guild_id, "voice session detached");
        true
    }

    pub async fn session(&self, guild_id: u64) -> Option<Arc<PlaybackSlot>> {
        self.sessions.read().await.get(&guild_id).cloned()
    }

    /// Session with the lowest guild id, for callers without a guild of their own.
    pub async fn first_session(&self) -> Option<Arc<PlaybackSlot>> {
        self.sessions
            .read()
            .await
            .iter()
            .min_by_key(|(guild_id, _)| **guild_id)
            .map(|(_, slot)| slot.clone())
    }

    pub fn synthesizer(&self) -> Option<Arc<dyn SpeechSynthesizer>> {
        self.synthesizer.clone()
    }

    pub fn sounds(&self) -> &SoundLibrary {
        &self.sounds
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn clip_path(&self, request_id: u64) -> PathBuf {
        speech::clip_path(&self.scratch_dir, request_id)
    }
}

impl std::fmt::Debug for VoiceHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceHub")
            .field("sounds", &self.sounds)
            .field("synthesizer", &self.synthesizer.is_some())
            .field("scratch_dir", &self.scratch_dir)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use super::VoiceHub;
    use crate::playback::test_support::FakeSink;
    use crate::sounds::SoundLibrary;

    #[tokio::test]
    async fn detach_stops_playback_and_forgets_session() {
        let hub = VoiceHub::new(SoundLibrary::new("sounds"));
        let sink = Arc::new(FakeSink::default());

        let slot = hub.attach(1, sink.clone()).await;
        slot.play(Path::new("a.mp3")).expect("play");
        assert!(hub.session(1).await.is_some());
        assert!(hub.session(2).await.is_none());

        assert!(hub.detach(1).await);
        assert!(hub.session(1).await.is_none());
        assert_eq!(sink.state.lock().expect("lock").stops, 1);
        assert!(!hub.detach(1).await);
    }

    #[tokio::test]
    async fn first_session_picks_lowest_guild() {
        let hub = VoiceHub::new(SoundLibrary::new("sounds"));
        assert!(hub.first_session().await.is_none());

        let high = Arc::new(FakeSink::default());
        let low = Arc::new(FakeSink::default());
        hub.attach(30, high.clone()).await;
        hub.attach(7, low.clone()).await;

        let slot = hub.first_session().await.expect("session");
        slot.play(Path::new("a.mp3")).expect("play");
        assert_eq!(low.state.lock().expect("lock").started.len(), 1);
        assert!(high.state.lock().expect("lock").started.is_empty());
    }

    #[test]
    fn clip_paths_are_unique_per_request() {
        let hub = VoiceHub::new(SoundLibrary::new("sounds")).with_scratch_dir("/tmp/mango");
        assert_ne!(hub.clip_path(1), hub.clip_path(2));
        assert!(hub.clip_path(1).starts_with("/tmp/mango"));
    }
}
