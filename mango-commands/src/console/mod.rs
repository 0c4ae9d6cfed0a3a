//! Operator console protocol: `<verb> <uid> [amount]` lines from stdin.

mod execute;
mod parse;

pub use execute::{ConsoleReply, execute};
pub use parse::{CONSOLE_VERBS, ConsoleCommand};
