pub mod admin;
pub mod console;
pub mod economy;
pub mod leveling;
pub mod replies;
pub mod utility;
pub mod voice;

use mango_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    utility::usage::META,
    economy::balance::META,
    economy::pay::META,
    economy::work::META,
    economy::crime::META,
    economy::rob::META,
    leveling::xp::META,
    leveling::lvl::META,
    leveling::messages::META,
    leveling::leaderboard::META,
    admin::givexp::META,
    admin::takexp::META,
    admin::setxp::META,
    admin::givelvl::META,
    admin::takelvl::META,
    admin::setlvl::META,
    admin::givemoney::META,
    admin::takemoney::META,
    admin::setmoney::META,
    admin::warn::META,
    admin::warns::META,
    voice::say::META,
    voice::sound::META,
    voice::sounds::META,
    voice::leave::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        utility::usage::usage(),
        economy::balance::balance(),
        economy::pay::pay(),
        economy::work::work(),
        economy::crime::crime(),
        economy::rob::rob(),
        leveling::xp::xp(),
        leveling::lvl::lvl(),
        leveling::messages::messages(),
        leveling::leaderboard::leaderboard(),
        admin::givexp::givexp(),
        admin::takexp::takexp(),
        admin::setxp::setxp(),
        admin::givelvl::givelvl(),
        admin::takelvl::takelvl(),
        admin::setlvl::setlvl(),
        admin::givemoney::givemoney(),
        admin::takemoney::takemoney(),
        admin::setmoney::setmoney(),
        admin::warn::warn(),
        admin::warns::warns(),
        voice::say::say(),
        voice::sound::sound(),
        voice::sounds::sounds(),
        voice::leave::leave(),
    ]
}

/// Look up command metadata by name, ignoring case and a leading prefix.
pub fn find_command(raw_name: &str) -> Option<&'static CommandMeta> {
    let lookup = raw_name
        .trim()
        .trim_start_matches(mango_utils::COMMAND_PREFIX)
        .to_ascii_lowercase();
    COMMANDS.iter().find(|command| command.name == lookup)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{COMMANDS, find_command};

    #[test]
    fn command_names_are_unique() {
        let names: HashSet<&str> = COMMANDS.iter().map(|command| command.name).collect();
        assert_eq!(names.len(), COMMANDS.len());
    }

    #[test]
    fn usage_lines_use_the_prefix() {
        for command in COMMANDS {
            assert!(
                command.usage.starts_with(&format!("!{}", command.name)),
                "{} has usage {}",
                command.name,
                command.usage
            );
        }
    }

    #[test]
    fn lookup_ignores_prefix_and_case() {
        assert_eq!(find_command("!Work").map(|c| c.name), Some("work"));
        assert!(find_command("dance").is_none());
    }
}
