/// Embed builders shared across commands.
pub mod embed;
/// Display helpers for amounts, xp and durations.
pub mod formatting;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Pure parser helpers for console arguments.
pub mod parse;
/// Admin capability checks.
pub mod permissions;
