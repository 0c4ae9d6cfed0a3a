use std::path::PathBuf;
use std::sync::Arc;

use crate::error::SnapshotError;
use crate::impls::progression::ProgressionRules;
use crate::model::user::UserRecord;
use crate::store::UserStateStore;

/// Shared state handle passed to every command surface.
///
/// Cloning is cheap; all clones point at the same [`UserStateStore`].
#[derive(Clone, Debug)]
pub struct Database {
    store: Arc<UserStateStore>,
    rules: ProgressionRules,
}

impl Database {
    pub fn new(store: UserStateStore, rules: ProgressionRules) -> Self {
        Self {
            store: Arc::new(store),
            rules,
        }
    }

    /// Load the snapshot at `path` and wrap it in a handle.
    pub fn open(path: impl Into<PathBuf>, rules: ProgressionRules) -> Result<Self, SnapshotError> {
        Ok(Self::new(UserStateStore::open(path)?, rules))
    }

    pub fn store(&self) -> &UserStateStore {
        &self.store
    }

    pub fn rules(&self) -> &ProgressionRules {
        &self.rules
    }

    /// Copy of the record for `uid`, created on first reference.
    pub async fn user(&self, uid: &str) -> UserRecord {
        self.store.get(uid).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use super::Database;
    use crate::impls::progression::ProgressionRules;

    /// 10 xp per message of 5+ chars, 100 xp base, 50% growth.
    pub fn rules() -> ProgressionRules {
        ProgressionRules::new(10.0, 5, 100.0, 50.0).expect("valid rules")
    }

    pub fn open_db() -> (TempDir, Database) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::open(dir.path().join("data.json"), rules()).expect("open");
        (dir, db)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{open_db, rules};
    use super::Database;
    use crate::auth::AdminGrant;
    use crate::impls::economy::{balance, mint, total_supply, transfer};
    use crate::impls::progression::award_message;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_messages_are_never_lost() {
        let (_dir, db) = open_db();

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { award_message(&db, "chatty", 12).await })
            })
            .collect();
        for task in tasks {
            task.await.expect("join").expect("award");
        }

        let record = db.user("chatty").await;
        assert_eq!(record.messages, 64);
        // 640 xp: 100 + 150 + 225 consumed, 165 left at level 3.
        assert_eq!((record.level, record.xp), (3, 165.0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn interleaved_surfaces_conserve_currency() {
        let (dir, db) = open_db();
        let grant = AdminGrant::issue();
        mint(&db, &grant, "a", 1_000).await.expect("seed a");
        mint(&db, &grant, "b", 1_000).await.expect("seed b");

        // One surface shuffles money back and forth while the other mints.
        let chat = {
            let db = db.clone();
            tokio::spawn(async move {
                for round in 0..100 {
                    let (from, to) = if round % 2 == 0 { ("a", "b") } else { ("b", "a") };
                    transfer(&db, from, to, 7).await.expect("transfer");
                }
            })
        };
        let console = {
            let db = db.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    mint(&db, &AdminGrant::issue(), "a", 2).await.expect("mint");
                }
            })
        };
        chat.await.expect("chat");
        console.await.expect("console");

        assert_eq!(total_supply(&db).await, 2_100);
        assert_eq!(balance(&db, "a").await, 1_100);
        assert_eq!(balance(&db, "b").await, 1_000);

        let reloaded = Database::open(dir.path().join("data.json"), rules()).expect("reopen");
        assert_eq!(total_supply(&reloaded).await, 2_100);
    }
}
