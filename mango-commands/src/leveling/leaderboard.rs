use crate::CommandMeta;
use mango_core::{Context, Error};
use mango_database::impls::leaderboard::{DEFAULT_LEADERBOARD_SIZE, leaderboard as rank};
use mango_database::model::leaderboard::{LeaderboardEntry, LeaderboardKind};
use mango_utils::embed::build_embed;
use mango_utils::formatting::{leaderboard_title, leaderboard_value};

pub const META: CommandMeta = CommandMeta {
    name: "leaderboard",
    desc: "Top 10 users by xp, messages or money.",
    category: "leveling",
    usage: "!leaderboard <xp|messages|money>",
};

#[derive(Clone, Copy, Debug, poise::ChoiceParameter)]
pub enum LeaderboardChoice {
    #[name = "xp"]
    Xp,
    #[name = "messages"]
    Messages,
    #[name = "money"]
    Money,
}

impl From<LeaderboardChoice> for LeaderboardKind {
    fn from(choice: LeaderboardChoice) -> Self {
        match choice {
            LeaderboardChoice::Xp => Self::Xp,
            LeaderboardChoice::Messages => Self::Messages,
            LeaderboardChoice::Money => Self::Money,
        }
    }
}

#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn leaderboard(
    ctx: Context<'_>,
    #[description = "What to rank by"] kind: Option<LeaderboardChoice>,
) -> Result<(), Error> {
    let kind = kind.map_or(LeaderboardKind::Xp, LeaderboardKind::from);
    let entries = rank(&ctx.data().db, kind, DEFAULT_LEADERBOARD_SIZE).await;

    let embed = build_embed(leaderboard_title(kind), leaderboard_description(kind, &entries));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn leaderboard_description(kind: LeaderboardKind, entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "Nobody is ranked yet.".to_owned();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "**{}.** <@{}>: {}",
                entry.rank,
                entry.uid,
                leaderboard_value(kind, entry)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
