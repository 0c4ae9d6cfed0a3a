use std::ops::RangeInclusive;

use rand::Rng;

use crate::auth::AdminGrant;
use crate::database::Database;
use crate::error::CoreError;
use crate::impls::cooldowns::{consume, now_unix_secs};
use crate::store::Transaction;

pub const WORK_ACTION: &str = "work";
pub const WORK_COOLDOWN_SECS: u64 = 60 * 60;
pub const WORK_PAYOUT: RangeInclusive<u64> = 50..=200;

pub const CRIME_ACTION: &str = "crime";
pub const CRIME_COOLDOWN_SECS: u64 = 2 * 60 * 60;
pub const CRIME_REWARD: RangeInclusive<u64> = 100..=400;
pub const CRIME_PENALTY: RangeInclusive<u64> = 50..=200;

pub const ROB_ACTION: &str = "rob";
pub const ROB_COOLDOWN_SECS: u64 = 3 * 60 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferReceipt {
    pub amount: u64,
    pub from_balance: u64,
    pub to_balance: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    pub earned: u64,
    pub balance: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrimeOutcome {
    Succeeded { earned: u64, balance: u64 },
    /// `lost` is what was actually taken, which is less than the rolled
    /// penalty when the balance could not cover it.
    Failed { lost: u64, balance: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Robbery {
    pub stolen: u64,
    pub balance: u64,
    pub target_balance: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Burn {
    pub burned: u64,
    pub balance: u64,
}

/// Result of a rob attempt that got past the cooldown.
///
/// An empty target is not an `Err` here because the spent cooldown must still
/// be committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RobAttempt {
    Robbed(Robbery),
    EmptyTarget,
}

/// Move `amount` from one balance to another.
///
/// Refuses non-positive amounts and amounts above the sender's balance.
pub fn apply_transfer(
    tx: &mut Transaction<'_>,
    from: &str,
    to: &str,
    amount: i64,
) -> Result<TransferReceipt, CoreError> {
    let balance = tx.balance(from);
    let amount = u64::try_from(amount)
        .ok()
        .filter(|amount| *amount > 0 && *amount <= balance)
        .ok_or(CoreError::InsufficientFunds {
            balance,
            requested: amount,
        })?;

    if from == to {
        tx.user(from);
        return Ok(TransferReceipt {
            amount,
            from_balance: balance,
            to_balance: balance,
        });
    }

    move_funds(tx, from, to, amount)
}

/// Debit `from` and credit `to` by an amount already checked against the
/// sender's balance. `from` and `to` must differ.
fn move_funds(
    tx: &mut Transaction<'_>,
    from: &str,
    to: &str,
    amount: u64,
) -> Result<TransferReceipt, CoreError> {
    let from_balance = tx
        .balance(from)
        .checked_sub(amount)
        .ok_or_else(|| CoreError::validation("sender balance is too low"))?;
    let to_balance = tx
        .balance(to)
        .checked_add(amount)
        .ok_or_else(|| CoreError::validation("recipient balance would overflow"))?;

    tx.user(from).money = from_balance;
    tx.user(to).money = to_balance;

    Ok(TransferReceipt {
        amount,
        from_balance,
        to_balance,
    })
}

/// Create currency. Returns the new balance.
pub fn apply_mint(tx: &mut Transaction<'_>, uid: &str, amount: u64) -> Result<u64, CoreError> {
    let record = tx.user(uid);
    record.money = record
        .money
        .checked_add(amount)
        .ok_or_else(|| CoreError::validation("balance would overflow"))?;
    Ok(record.money)
}

/// Destroy up to `amount`, stopping at zero.
pub fn apply_burn(tx: &mut Transaction<'_>, uid: &str, amount: u64) -> Burn {
    let record = tx.user(uid);
    let burned = amount.min(record.money);
    record.money -= burned;
    Burn {
        burned,
        balance: record.money,
    }
}

pub fn apply_work<R: Rng>(
    tx: &mut Transaction<'_>,
    uid: &str,
    now: u64,
    rng: &mut R,
) -> Result<Payout, CoreError> {
    consume(tx, uid, WORK_ACTION, WORK_COOLDOWN_SECS, now).into_result()?;

    let earned = rng.gen_range(WORK_PAYOUT);
    let balance = apply_mint(tx, uid, earned)?;
    Ok(Payout { earned, balance })
}

pub fn apply_crime<R: Rng>(
    tx: &mut Transaction<'_>,
    uid: &str,
    now: u64,
    rng: &mut R,
) -> Result<CrimeOutcome, CoreError> {
    consume(tx, uid, CRIME_ACTION, CRIME_COOLDOWN_SECS, now).into_result()?;

    if rng.gen_bool(0.5) {
        let earned = rng.gen_range(CRIME_REWARD);
        let balance = apply_mint(tx, uid, earned)?;
        Ok(CrimeOutcome::Succeeded { earned, balance })
    } else {
        let penalty = rng.gen_range(CRIME_PENALTY);
        let Burn { burned, balance } = apply_burn(tx, uid, penalty);
        Ok(CrimeOutcome::Failed {
            lost: burned,
            balance,
        })
    }
}

/// Steal a uniform amount in `[1, target balance]` from `target`.
///
/// The cooldown is checked and spent before any balance is read.
pub fn apply_rob<R: Rng>(
    tx: &mut Transaction<'_>,
    uid: &str,
    target: &str,
    now: u64,
    rng: &mut R,
) -> Result<RobAttempt, CoreError> {
    if uid == target {
        return Err(CoreError::validation("you can't rob yourself"));
    }

    consume(tx, uid, ROB_ACTION, ROB_COOLDOWN_SECS, now).into_result()?;

    let target_balance = tx.balance(target);
    if target_balance == 0 {
        tx.user(target);
        return Ok(RobAttempt::EmptyTarget);
    }

    let stolen = rng.gen_range(1..=target_balance);
    let receipt = move_funds(tx, target, uid, stolen)?;

    Ok(RobAttempt::Robbed(Robbery {
        stolen,
        balance: receipt.to_balance,
        target_balance: receipt.from_balance,
    }))
}

pub async fn balance(db: &Database, uid: &str) -> u64 {
    db.user(uid).await.money
}

/// Sum of every balance; changes only through mint and burn.
pub async fn total_supply(db: &Database) -> u128 {
    db.store()
        .read(|users| users.values().map(|record| u128::from(record.money)).sum())
        .await
}

pub async fn transfer(
    db: &Database,
    from: &str,
    to: &str,
    amount: i64,
) -> Result<TransferReceipt, CoreError> {
    db.store()
        .mutate(|tx| apply_transfer(tx, from, to, amount))
        .await
}

pub async fn mint(
    db: &Database,
    _grant: &AdminGrant,
    uid: &str,
    amount: u64,
) -> Result<u64, CoreError> {
    if amount == 0 {
        return Err(CoreError::validation("amount must be positive"));
    }
    db.store().mutate(|tx| apply_mint(tx, uid, amount)).await
}

pub async fn burn(
    db: &Database,
    _grant: &AdminGrant,
    uid: &str,
    amount: u64,
) -> Result<Burn, CoreError> {
    if amount == 0 {
        return Err(CoreError::validation("amount must be positive"));
    }
    db.store()
        .mutate(|tx| Ok(apply_burn(tx, uid, amount)))
        .await
}

/// Overwrite a balance; negative input becomes zero.
pub async fn set_balance(
    db: &Database,
    _grant: &AdminGrant,
    uid: &str,
    amount: i64,
) -> Result<u64, CoreError> {
    let amount = u64::try_from(amount.max(0)).unwrap_or(0);
    db.store()
        .mutate(|tx| {
            tx.user(uid).money = amount;
            Ok(amount)
        })
        .await
}

pub async fn work(db: &Database, uid: &str) -> Result<Payout, CoreError> {
    db.store()
        .mutate(|tx| apply_work(tx, uid, now_unix_secs(), &mut rand::thread_rng()))
        .await
}

pub async fn crime(db: &Database, uid: &str) -> Result<CrimeOutcome, CoreError> {
    db.store()
        .mutate(|tx| apply_crime(tx, uid, now_unix_secs(), &mut rand::thread_rng()))
        .await
}

pub async fn rob(db: &Database, uid: &str, target: &str) -> Result<Robbery, CoreError> {
    let attempt = db
        .store()
        .mutate(|tx| apply_rob(tx, uid, target, now_unix_secs(), &mut rand::thread_rng()))
        .await?;

    match attempt {
        RobAttempt::Robbed(robbery) => Ok(robbery),
        RobAttempt::EmptyTarget => Err(CoreError::NoTarget),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{
        CRIME_PENALTY, CRIME_REWARD, CrimeOutcome, ROB_ACTION, RobAttempt, WORK_PAYOUT, apply_crime,
        apply_rob, apply_work, balance, burn, mint, rob, set_balance, total_supply, transfer,
        work,
    };
    use crate::auth::AdminGrant;
    use crate::database::test_support::open_db;
    use crate::error::CoreError;

    const T0: u64 = 1_700_000_000;

    async fn fund(db: &crate::Database, uid: &str, amount: u64) {
        mint(db, &AdminGrant::issue(), uid, amount)
            .await
            .expect("mint");
    }

    #[tokio::test]
    async fn transfer_and_reverse_restore_balances() {
        let (_dir, db) = open_db();
        fund(&db, "a", 300).await;
        fund(&db, "b", 40).await;

        let receipt = transfer(&db, "a", "b", 120).await.expect("forward");
        assert_eq!((receipt.from_balance, receipt.to_balance), (180, 160));

        transfer(&db, "b", "a", 120).await.expect("reverse");
        assert_eq!(balance(&db, "a").await, 300);
        assert_eq!(balance(&db, "b").await, 40);
        assert_eq!(total_supply(&db).await, 340);
    }

    #[tokio::test]
    async fn overdraft_is_refused_without_changes() {
        let (_dir, db) = open_db();
        fund(&db, "a", 50).await;

        let err = transfer(&db, "a", "b", 100).await.expect_err("overdraft");
        assert!(matches!(
            err,
            CoreError::InsufficientFunds {
                balance: 50,
                requested: 100
            }
        ));
        assert_eq!(balance(&db, "a").await, 50);
        assert_eq!(balance(&db, "b").await, 0);
    }

    #[tokio::test]
    async fn non_positive_transfer_is_refused() {
        let (_dir, db) = open_db();
        fund(&db, "a", 50).await;

        for amount in [0, -5] {
            assert!(matches!(
                transfer(&db, "a", "b", amount).await,
                Err(CoreError::InsufficientFunds { .. })
            ));
        }
        assert_eq!(total_supply(&db).await, 50);
    }

    #[tokio::test]
    async fn self_transfer_changes_nothing() {
        let (_dir, db) = open_db();
        fund(&db, "a", 50).await;

        let receipt = transfer(&db, "a", "a", 20).await.expect("self");
        assert_eq!((receipt.from_balance, receipt.to_balance), (50, 50));
        assert_eq!(balance(&db, "a").await, 50);
    }

    #[tokio::test]
    async fn burn_clamps_and_set_balance_clamps() {
        let (_dir, db) = open_db();
        let grant = AdminGrant::issue();
        fund(&db, "a", 30).await;

        let burned = burn(&db, &grant, "a", 100).await.expect("burn");
        assert_eq!((burned.burned, burned.balance), (30, 0));

        assert_eq!(set_balance(&db, &grant, "a", -8).await.expect("set"), 0);
        assert_eq!(set_balance(&db, &grant, "a", 75).await.expect("set"), 75);
        assert!(matches!(
            mint(&db, &grant, "a", 0).await,
            Err(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn work_pays_once_per_window() {
        let (_dir, db) = open_db();
        let mut rng = StdRng::seed_from_u64(11);

        let payout = db
            .store()
            .mutate(|tx| apply_work(tx, "w", T0, &mut rng))
            .await
            .expect("work");
        assert!(WORK_PAYOUT.contains(&payout.earned));
        assert_eq!(payout.balance, payout.earned);

        let again = db
            .store()
            .mutate(|tx| apply_work(tx, "w", T0 + 10, &mut rng))
            .await;
        assert!(matches!(
            again,
            Err(CoreError::CooldownActive {
                remaining_secs: 3590
            })
        ));
        assert_eq!(balance(&db, "w").await, payout.earned);

        assert!(matches!(
            work(&db, "w").await,
            Ok(_) | Err(CoreError::CooldownActive { .. })
        ));
    }

    #[tokio::test]
    async fn crime_outcomes_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for round in 0..40 {
            let (_dir, db) = open_db();
            fund(&db, "c", 60).await;

            let outcome = db
                .store()
                .mutate(|tx| apply_crime(tx, "c", T0 + round, &mut rng))
                .await
                .expect("crime");

            match outcome {
                CrimeOutcome::Succeeded { earned, balance } => {
                    assert!(CRIME_REWARD.contains(&earned));
                    assert_eq!(balance, 60 + earned);
                }
                CrimeOutcome::Failed { lost, balance } => {
                    assert!(lost <= *CRIME_PENALTY.end());
                    assert_eq!(balance, 60 - lost);
                }
            }
        }
    }

    #[tokio::test]
    async fn rob_takes_between_one_and_everything() {
        let mut rng = StdRng::seed_from_u64(99);
        for round in 0..50 {
            let (_dir, db) = open_db();
            fund(&db, "target", 25).await;

            let attempt = db
                .store()
                .mutate(|tx| apply_rob(tx, "thief", "target", T0 + round, &mut rng))
                .await
                .expect("rob");

            let RobAttempt::Robbed(robbery) = attempt else {
                panic!("target had money");
            };
            assert!((1..=25).contains(&robbery.stolen));
            assert_eq!(robbery.target_balance, 25 - robbery.stolen);
            assert_eq!(robbery.balance, robbery.stolen);
            assert_eq!(total_supply(&db).await, 25);
        }
    }

    #[tokio::test]
    async fn rob_handles_balances_beyond_signed_range() {
        let (_dir, db) = open_db();
        let rich = u64::MAX / 2 + 10;
        fund(&db, "target", rich).await;

        let mut rng = StdRng::seed_from_u64(7);
        let attempt = db
            .store()
            .mutate(|tx| apply_rob(tx, "thief", "target", T0, &mut rng))
            .await
            .expect("rob");

        let RobAttempt::Robbed(robbery) = attempt else {
            panic!("target had money");
        };
        assert!((1..=rich).contains(&robbery.stolen));
        assert_eq!(robbery.target_balance, rich - robbery.stolen);
        assert_eq!(balance(&db, "thief").await, robbery.stolen);
        assert_eq!(total_supply(&db).await, u128::from(rich));
    }

    #[tokio::test]
    async fn rob_on_empty_target_still_spends_cooldown() {
        let (_dir, db) = open_db();

        let err = rob(&db, "thief", "broke").await.expect_err("no target");
        assert!(matches!(err, CoreError::NoTarget));
        assert!(db.user("thief").await.cooldowns.contains_key(ROB_ACTION));

        fund(&db, "broke", 10).await;
        assert!(matches!(
            rob(&db, "thief", "broke").await,
            Err(CoreError::CooldownActive { .. })
        ));
        assert_eq!(balance(&db, "broke").await, 10);
    }

    #[tokio::test]
    async fn robbing_yourself_is_refused_before_cooldown() {
        let (_dir, db) = open_db();
        assert!(matches!(
            rob(&db, "me", "me").await,
            Err(CoreError::Validation(_))
        ));
        assert!(db.user("me").await.cooldowns.is_empty());
    }
}
