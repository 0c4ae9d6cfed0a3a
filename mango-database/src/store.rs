use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::SnapshotError;
use crate::model::user::UserRecord;
use crate::snapshot::{self, PersistedDocument, UserMap};

/// Owner of every user record and of the snapshot file.
///
/// All access goes through one async mutex, so mutations from the chat
/// surface and the operator console are applied one after another and
/// snapshot writes never overlap.
#[derive(Debug)]
pub struct UserStateStore {
    document: PersistedDocument,
    users: Mutex<UserMap>,
}

impl UserStateStore {
    /// Load the snapshot at `path`, starting empty when it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        let document = PersistedDocument::new(path);
        let users = document.load()?;
        info!(
            path = %document.path().display(),
            users = users.len(),
            "user state loaded"
        );

        Ok(Self {
            document,
            users: Mutex::new(users),
        })
    }

    /// Return a copy of the record for `uid`, creating a zero-valued one if needed.
    ///
    /// A freshly created record lives in memory until the next snapshot write.
    pub async fn get(&self, uid: &str) -> UserRecord {
        let mut users = self.users.lock().await;
        users
            .entry(uid.to_owned())
            .or_insert_with(|| UserRecord::new(uid))
            .clone()
    }

    /// Run a read-only view over the whole mapping.
    pub async fn read<T>(&self, view: impl FnOnce(&UserMap) -> T) -> T {
        let users = self.users.lock().await;
        view(&users)
    }

    /// Apply a mutation and persist it before it becomes visible.
    ///
    /// `apply` stages changes on a [`Transaction`]. When it returns `Ok`, the
    /// merged document is written to disk and only then committed to memory.
    /// When it returns `Err`, or the write fails, memory is left untouched.
    pub async fn mutate<T, E>(
        &self,
        apply: impl FnOnce(&mut Transaction<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<SnapshotError>,
    {
        let mut users = self.users.lock().await;

        let mut tx = Transaction::new(&users);
        let output = apply(&mut tx)?;
        let staged = tx.into_staged();

        if staged.is_empty() {
            return Ok(output);
        }

        let records = users.len()
            + staged
                .keys()
                .filter(|uid| !users.contains_key(*uid))
                .count();
        let merged = users
            .iter()
            .filter(|(uid, _)| !staged.contains_key(*uid))
            .chain(staged.iter())
            .map(|(uid, record)| (uid.as_str(), record));
        let bytes = snapshot::encode(merged)?;
        self.write(bytes, records).await?;

        users.extend(staged);
        Ok(output)
    }

    /// Write the full in-memory mapping to disk.
    pub async fn persist(&self) -> Result<(), SnapshotError> {
        let users = self.users.lock().await;
        let bytes = snapshot::encode(users.iter().map(|(uid, record)| (uid.as_str(), record)))?;
        self.write(bytes, users.len()).await
    }

    pub fn path(&self) -> &Path {
        self.document.path()
    }

    // Called with the state lock held, which keeps writers serialized.
    async fn write(&self, bytes: Vec<u8>, records: usize) -> Result<(), SnapshotError> {
        let document = self.document.clone();
        let result = tokio::task::spawn_blocking(move || document.write(&bytes)).await?;

        match &result {
            Ok(()) => debug!(records, "snapshot written"),
            Err(err) => error!(?err, "snapshot write failed; mutation discarded"),
        }

        result
    }
}

/// Staged changes for one [`UserStateStore::mutate`] call.
///
/// Records are copied on first mutable access; reads see staged values first.
pub struct Transaction<'a> {
    committed: &'a UserMap,
    staged: BTreeMap<String, UserRecord>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(committed: &'a UserMap) -> Self {
        Self {
            committed,
            staged: BTreeMap::new(),
        }
    }

    /// Mutable access to `uid`, materializing a zero-valued record if needed.
    pub fn user(&mut self, uid: &str) -> &mut UserRecord {
        let committed = self.committed;
        self.staged.entry(uid.to_owned()).or_insert_with(|| {
            committed
                .get(uid)
                .cloned()
                .unwrap_or_else(|| UserRecord::new(uid))
        })
    }

    /// Current view of `uid` without staging it.
    pub fn peek(&self, uid: &str) -> Option<&UserRecord> {
        self.staged.get(uid).or_else(|| self.committed.get(uid))
    }

    pub fn balance(&self, uid: &str) -> u64 {
        self.peek(uid).map_or(0, |record| record.money)
    }

    fn into_staged(self) -> BTreeMap<String, UserRecord> {
        self.staged
    }
}

#[cfg(test)]
mod tests {
    use super::UserStateStore;
    use crate::error::{CoreError, SnapshotError};

    #[tokio::test]
    async fn get_materializes_zero_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = UserStateStore::open(dir.path().join("data.json")).expect("open");

        let record = store.get("5").await;
        assert_eq!(record.uid, "5");
        assert_eq!(record.money, 0);
        assert_eq!(store.read(|users| users.len()).await, 1);
    }

    #[tokio::test]
    async fn committed_mutation_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.json");
        let store = UserStateStore::open(&path).expect("open");

        store
            .mutate(|tx| {
                tx.user("1").money = 40;
                Ok::<_, SnapshotError>(())
            })
            .await
            .expect("mutate");

        let reopened = UserStateStore::open(&path).expect("reopen");
        assert_eq!(reopened.get("1").await.money, 40);
    }

    #[tokio::test]
    async fn failed_closure_leaves_memory_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = UserStateStore::open(dir.path().join("data.json")).expect("open");

        let result: Result<(), CoreError> = store
            .mutate(|tx| {
                tx.user("1").money = 999;
                Err(CoreError::NoTarget)
            })
            .await;

        assert!(matches!(result, Err(CoreError::NoTarget)));
        assert_eq!(store.get("1").await.money, 0);
        assert!(!dir.path().join("data.json").exists());
    }

    #[tokio::test]
    async fn failed_write_discards_the_change() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store =
            UserStateStore::open(dir.path().join("gone").join("data.json")).expect("open");

        let result: Result<(), CoreError> = store
            .mutate(|tx| {
                tx.user("1").money = 10;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(CoreError::Persistence(_))));
        assert_eq!(store.get("1").await.money, 0);
    }

    #[tokio::test]
    async fn transaction_reads_its_own_staged_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = UserStateStore::open(dir.path().join("data.json")).expect("open");

        let seen = store
            .mutate(|tx| {
                tx.user("a").money = 7;
                Ok::<_, SnapshotError>((tx.balance("a"), tx.peek("b").is_none()))
            })
            .await
            .expect("mutate");

        assert_eq!(seen, (7, true));
    }
}
