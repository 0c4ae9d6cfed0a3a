pub mod config;

use std::sync::Arc;

use mango_database::Database;
use mango_voice::VoiceHub;

pub use config::Config;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub config: Arc<Config>,
    pub voice: VoiceHub,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
