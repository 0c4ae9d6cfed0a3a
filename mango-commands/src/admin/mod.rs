pub mod givelvl;
pub mod givemoney;
pub mod givexp;
pub mod setlvl;
pub mod setmoney;
pub mod setxp;
pub mod takelvl;
pub mod takemoney;
pub mod takexp;
pub mod warn;
pub mod warns;

use mango_database::impls::progression::Progress;
use mango_utils::formatting::format_xp;

/// Shared confirmation for xp and level changes.
pub(crate) fn progress_line(action: &str, progress: &Progress) -> String {
    format!(
        "{} <@{}> is level {} with {} XP.",
        action,
        progress.uid,
        progress.level,
        format_xp(progress.xp)
    )
}

#[cfg(test)]
mod tests {
    use mango_database::impls::progression::Progress;

    use super::progress_line;

    #[test]
    fn progress_line_mentions_target() {
        let progress = Progress {
            uid: "77".to_owned(),
            xp: 12.5,
            level: 3,
            xp_needed: 337,
            messages: 9,
        };
        assert_eq!(
            progress_line("XP given.", &progress),
            "XP given. <@77> is level 3 with 12.5 XP."
        );
    }
}
