use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use tracing::warn;

/// Blocking text-to-speech backend writing an audio file.
pub trait SpeechSynthesizer: Send + Sync + 'static {
    fn synthesize(&self, text: &str, language: &str, output: &Path) -> anyhow::Result<()>;
}

/// Synthesized audio on disk, deleted when dropped.
#[derive(Debug)]
pub struct SpeechClip {
    path: PathBuf,
}

impl SpeechClip {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SpeechClip {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(?err, path = %self.path.display(), "failed to remove speech clip"),
        }
    }
}

/// Per-request clip location, e.g. `tts_1234.mp3` inside `dir`.
pub fn clip_path(dir: &Path, request_id: u64) -> PathBuf {
    dir.join(format!("tts_{request_id}.mp3"))
}

/// Run synthesis on the blocking pool and hand back the resulting clip.
pub async fn synthesize_offloaded(
    synthesizer: Arc<dyn SpeechSynthesizer>,
    text: String,
    language: &'static str,
    output: PathBuf,
) -> anyhow::Result<SpeechClip> {
    // Owned before the work starts so a partial file is cleaned up on failure.
    let clip = SpeechClip {
        path: output.clone(),
    };

    tokio::task::spawn_blocking(move || synthesizer.synthesize(&text, language, &output))
        .await
        .context("speech synthesis task failed")??;

    Ok(clip)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use super::{SpeechSynthesizer, clip_path, synthesize_offloaded};

    struct EchoSynth;

    impl SpeechSynthesizer for EchoSynth {
        fn synthesize(&self, text: &str, language: &str, output: &Path) -> anyhow::Result<()> {
            fs::write(output, format!("{language}:{text}"))?;
            Ok(())
        }
    }

    struct BrokenSynth;

    impl SpeechSynthesizer for BrokenSynth {
        fn synthesize(&self, _text: &str, _language: &str, output: &Path) -> anyhow::Result<()> {
            fs::write(output, b"partial")?;
            anyhow::bail!("service unavailable")
        }
    }

    #[tokio::test]
    async fn clip_is_written_then_removed_on_drop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = clip_path(dir.path(), 42);

        let clip = synthesize_offloaded(Arc::new(EchoSynth), "moi".to_owned(), "fi", path.clone())
            .await
            .expect("synthesize");
        assert_eq!(fs::read_to_string(clip.path()).expect("read"), "fi:moi");

        drop(clip);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn failed_synthesis_cleans_up_partial_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = clip_path(dir.path(), 7);

        let result =
            synthesize_offloaded(Arc::new(BrokenSynth), "hi".to_owned(), "en", path.clone()).await;
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
