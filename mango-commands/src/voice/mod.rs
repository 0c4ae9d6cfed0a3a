pub mod leave;
pub mod say;
pub mod sound;
pub mod sounds;
