use mango_database::CoreError;
use mango_database::model::leaderboard::LeaderboardKind;
use mango_utils::parse::{parse_level, parse_level_delta, parse_money, parse_uid, parse_xp};

/// Every verb the console accepts, with its argument syntax.
pub const CONSOLE_VERBS: &[(&str, &str)] = &[
    ("balance", "balance <uid>"),
    ("xp", "xp <uid>"),
    ("lvl", "lvl <uid>"),
    ("messages", "messages <uid>"),
    ("warns", "warns <uid>"),
    ("user", "user <uid>"),
    ("leaderboard", "leaderboard [xp|messages|money]"),
    ("pay", "pay <from> <to> <amount>"),
    ("work", "work <uid>"),
    ("crime", "crime <uid>"),
    ("rob", "rob <uid> <target>"),
    ("givexp", "givexp <uid> <amount>"),
    ("takexp", "takexp <uid> <amount>"),
    ("setxp", "setxp <uid> <amount>"),
    ("givelvl", "givelvl <uid> <levels>"),
    ("takelvl", "takelvl <uid> <levels>"),
    ("setlvl", "setlvl <uid> <level>"),
    ("givemoney", "givemoney <uid> <amount>"),
    ("takemoney", "takemoney <uid> <amount>"),
    ("setmoney", "setmoney <uid> <amount>"),
    ("warn", "warn <uid> [reason]"),
    ("say", "say <text>"),
    ("help", "help"),
    ("stop", "stop"),
];

#[derive(Clone, Debug, PartialEq)]
pub enum ConsoleCommand {
    Balance(String),
    Xp(String),
    Lvl(String),
    Messages(String),
    Warns(String),
    User(String),
    Leaderboard(LeaderboardKind),
    Pay { from: String, to: String, amount: i64 },
    Work(String),
    Crime(String),
    Rob { uid: String, target: String },
    GiveXp { uid: String, amount: f64 },
    TakeXp { uid: String, amount: f64 },
    SetXp { uid: String, amount: f64 },
    GiveLvl { uid: String, levels: u32 },
    TakeLvl { uid: String, levels: u32 },
    SetLvl { uid: String, level: i64 },
    GiveMoney { uid: String, amount: u64 },
    TakeMoney { uid: String, amount: u64 },
    SetMoney { uid: String, amount: i64 },
    Warn(String),
    /// Speak in the bot's current voice channel.
    Say(String),
    Help,
    Stop,
}

impl ConsoleCommand {
    /// Parse one console line. Blank lines yield `Ok(None)`.
    ///
    /// Unknown verbs are `NotFound`; wrong arity or unparsable arguments are
    /// `Validation` carrying the verb's usage.
    pub fn parse(line: &str) -> Result<Option<Self>, CoreError> {
        let mut words = line.split_whitespace();
        let Some(raw_verb) = words.next() else {
            return Ok(None);
        };
        let verb = raw_verb.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let Some(&(_, usage)) = CONSOLE_VERBS.iter().find(|(name, _)| *name == verb) else {
            return Err(CoreError::NotFound(verb));
        };
        let args = Args { args, usage };

        let command = match verb.as_str() {
            "balance" => Self::Balance(args.only_uid()?),
            "xp" => Self::Xp(args.only_uid()?),
            "lvl" => Self::Lvl(args.only_uid()?),
            "messages" => Self::Messages(args.only_uid()?),
            "warns" => Self::Warns(args.only_uid()?),
            "user" => Self::User(args.only_uid()?),
            "leaderboard" => match args.args.as_slice() {
                [] => Self::Leaderboard(LeaderboardKind::Xp),
                [kind] => Self::Leaderboard(kind.parse()?),
                _ => return Err(args.usage_error()),
            },
            "pay" => {
                let [from, to, amount] = args.exact::<3>()?;
                Self::Pay {
                    from: args.uid(from)?,
                    to: args.uid(to)?,
                    amount: args.value(amount, parse_money)?,
                }
            }
            "work" => Self::Work(args.only_uid()?),
            "crime" => Self::Crime(args.only_uid()?),
            "rob" => {
                let [uid, target] = args.exact::<2>()?;
                Self::Rob {
                    uid: args.uid(uid)?,
                    target: args.uid(target)?,
                }
            }
            "givexp" => {
                let (uid, amount) = args.uid_and(parse_xp)?;
                Self::GiveXp { uid, amount }
            }
            "takexp" => {
                let (uid, amount) = args.uid_and(parse_xp)?;
                Self::TakeXp { uid, amount }
            }
            "setxp" => {
                let (uid, amount) = args.uid_and(parse_xp)?;
                Self::SetXp { uid, amount }
            }
            "givelvl" => {
                let (uid, levels) = args.uid_and(parse_level_delta)?;
                Self::GiveLvl { uid, levels }
            }
            "takelvl" => {
                let (uid, levels) = args.uid_and(parse_level_delta)?;
                Self::TakeLvl { uid, levels }
            }
            "setlvl" => {
                let (uid, level) = args.uid_and(parse_level)?;
                Self::SetLvl { uid, level }
            }
            "givemoney" => {
                let (uid, amount) = args.uid_and(positive_money)?;
                Self::GiveMoney { uid, amount }
            }
            "takemoney" => {
                let (uid, amount) = args.uid_and(positive_money)?;
                Self::TakeMoney { uid, amount }
            }
            "setmoney" => {
                let (uid, amount) = args.uid_and(parse_money)?;
                Self::SetMoney { uid, amount }
            }
            // Anything after the uid is a free-form reason.
            "warn" => match args.args.first() {
                Some(uid) => Self::Warn(args.uid(uid)?),
                None => return Err(args.usage_error()),
            },
            "say" if args.args.is_empty() => return Err(args.usage_error()),
            "say" => Self::Say(args.args.join(" ")),
            "help" => Self::Help,
            "stop" => Self::Stop,
            _ => return Err(CoreError::NotFound(verb.clone())),
        };

        Ok(Some(command))
    }
}

struct Args<'a> {
    args: Vec<&'a str>,
    usage: &'static str,
}

impl<'a> Args<'a> {
    fn usage_error(&self) -> CoreError {
        CoreError::validation(format!("usage: {}", self.usage))
    }

    fn exact<const N: usize>(&self) -> Result<[&'a str; N], CoreError> {
        <[&str; N]>::try_from(self.args.as_slice()).map_err(|_| self.usage_error())
    }

    fn uid(&self, raw: &str) -> Result<String, CoreError> {
        parse_uid(raw).ok_or_else(|| self.usage_error())
    }

    fn value<T>(&self, raw: &str, parse: impl FnOnce(&str) -> Option<T>) -> Result<T, CoreError> {
        parse(raw).ok_or_else(|| self.usage_error())
    }

    fn only_uid(&self) -> Result<String, CoreError> {
        let [uid] = self.exact::<1>()?;
        self.uid(uid)
    }

    fn uid_and<T>(&self, parse: impl FnOnce(&str) -> Option<T>) -> Result<(String, T), CoreError> {
        let [uid, amount] = self.exact::<2>()?;
        Ok((self.uid(uid)?, self.value(amount, parse)?))
    }
}

fn positive_money(raw: &str) -> Option<u64> {
    parse_money(raw)
        .and_then(|amount| u64::try_from(amount).ok())
        .filter(|amount| *amount > 0)
}
