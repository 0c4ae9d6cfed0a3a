use crate::auth::AdminGrant;
use crate::database::Database;
use crate::error::CoreError;
use crate::model::warnings::WarningRecord;

/// Add one warning to the user's counter and return the new count.
pub async fn record_warning(
    db: &Database,
    _grant: &AdminGrant,
    uid: &str,
) -> Result<WarningRecord, CoreError> {
    db.store()
        .mutate(|tx| {
            let record = tx.user(uid);
            record.warns = record.warns.saturating_add(1);
            Ok(WarningRecord {
                warn_number: record.warns,
            })
        })
        .await
}

pub async fn warning_count(db: &Database, uid: &str) -> u64 {
    db.user(uid).await.warns
}
