//! Voice playback coordination.
//!
//! Audio transport and speech synthesis are provided from outside through
//! [`AudioSink`] and [`SpeechSynthesizer`]. This crate only decides what plays
//! when, and keeps slow synthesis off the async workers.

pub mod hub;
pub mod languages;
pub mod playback;
pub mod sounds;
pub mod speech;

pub use hub::VoiceHub;
pub use playback::{AudioSink, PlaybackEnd, PlaybackSlot, PlaybackTicket};
pub use sounds::{SoundError, SoundLibrary};
pub use speech::{SpeechClip, SpeechSynthesizer, synthesize_offloaded};
