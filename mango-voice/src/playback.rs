use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::sleep;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Audio output for one voice session.
pub trait AudioSink: Send + Sync {
    fn play(&self, source: &Path) -> anyhow::Result<()>;
    fn stop(&self);
    fn is_playing(&self) -> bool;
}

/// Identifies one `play` request on a [`PlaybackSlot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackTicket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackEnd {
    Finished,
    /// A newer request replaced this one before it ended.
    Superseded,
}

/// At most one active playback per session; the latest request wins.
pub struct PlaybackSlot {
    sink: Arc<dyn AudioSink>,
    generation: Mutex<u64>,
    poll_interval: Duration,
}

impl PlaybackSlot {
    pub fn new(sink: Arc<dyn AudioSink>) -> Self {
        Self {
            sink,
            generation: Mutex::new(0),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Stop whatever is playing and start `source`.
    pub fn play(&self, source: &Path) -> anyhow::Result<PlaybackTicket> {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;

        if self.sink.is_playing() {
            self.sink.stop();
        }
        self.sink.play(source)?;

        Ok(PlaybackTicket(*generation))
    }

    /// Stop playback and invalidate every outstanding ticket.
    pub fn stop(&self) {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        self.sink.stop();
    }

    pub fn is_current(&self, ticket: PlaybackTicket) -> bool {
        *self.generation.lock().unwrap_or_else(PoisonError::into_inner) == ticket.0
    }

    /// Poll until `ticket` finishes or is replaced. Never blocks a worker.
    pub async fn wait_until_finished(&self, ticket: PlaybackTicket) -> PlaybackEnd {
        loop {
            if !self.is_current(ticket) {
                return PlaybackEnd::Superseded;
            }
            if !self.sink.is_playing() {
                return PlaybackEnd::Finished;
            }
            sleep(self.poll_interval).await;
        }
    }
}

impl std::fmt::Debug for PlaybackSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSlot")
            .field("playing", &self.sink.is_playing())
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::AudioSink;

    /// Records calls; "plays" until `finish` is called.
    #[derive(Default)]
    pub struct FakeSink {
        pub state: Mutex<FakeState>,
    }

    #[derive(Default)]
    pub struct FakeState {
        pub playing: Option<PathBuf>,
        pub started: Vec<PathBuf>,
        pub stops: usize,
    }

    impl FakeSink {
        pub fn finish(&self) {
            self.state.lock().expect("lock").playing = None;
        }
    }

    impl AudioSink for FakeSink {
        fn play(&self, source: &Path) -> anyhow::Result<()> {
            let mut state = self.state.lock().expect("lock");
            state.playing = Some(source.to_path_buf());
            state.started.push(source.to_path_buf());
            Ok(())
        }

        fn stop(&self) {
            let mut state = self.state.lock().expect("lock");
            state.playing = None;
            state.stops += 1;
        }

        fn is_playing(&self) -> bool {
            self.state.lock().expect("lock").playing.is_some()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use super::test_support::FakeSink;
    use super::{PlaybackEnd, PlaybackSlot};

    fn slot(sink: &Arc<FakeSink>) -> PlaybackSlot {
        PlaybackSlot::new(sink.clone()).with_poll_interval(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn new_request_supersedes_active_one() {
        let sink = Arc::new(FakeSink::default());
        let slot = slot(&sink);

        let first = slot.play(Path::new("a.mp3")).expect("play a");
        let second = slot.play(Path::new("b.mp3")).expect("play b");

        assert!(!slot.is_current(first));
        assert_eq!(slot.wait_until_finished(first).await, PlaybackEnd::Superseded);

        let state = sink.state.lock().expect("lock");
        assert_eq!(state.stops, 1);
        assert_eq!(state.playing.as_deref(), Some(Path::new("b.mp3")));
        drop(state);

        sink.finish();
        assert_eq!(slot.wait_until_finished(second).await, PlaybackEnd::Finished);
    }

    #[tokio::test]
    async fn waiting_is_polled_until_sink_goes_idle() {
        let sink = Arc::new(FakeSink::default());
        let slot = Arc::new(slot(&sink));
        let ticket = slot.play(Path::new("a.mp3")).expect("play");

        let waiter = {
            let slot = slot.clone();
            tokio::spawn(async move { slot.wait_until_finished(ticket).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        sink.finish();
        assert_eq!(waiter.await.expect("join"), PlaybackEnd::Finished);
    }

    #[tokio::test]
    async fn stop_invalidates_ticket() {
        let sink = Arc::new(FakeSink::default());
        let slot = slot(&sink);
        let ticket = slot.play(Path::new("a.mp3")).expect("play");

        slot.stop();
        assert_eq!(slot.wait_until_finished(ticket).await, PlaybackEnd::Superseded);
    }
}
