//! JSON snapshot export and import.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

use crate::errors::{LedgerError, LedgerResult};
use crate::utils::persistence::write_atomic;

use super::LedgerSnapshot;

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// On-disk envelope around a [`LedgerSnapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotFile {
    schema_version: u32,
    exported_at: DateTime<Utc>,
    #[serde(flatten)]
    snapshot: LedgerSnapshot,
}

/// Writes `snapshot` as pretty JSON, staging to a temporary file and renaming into place.
pub fn save_snapshot_to_path(snapshot: &LedgerSnapshot, path: &Path) -> LedgerResult<()> {
    let file = SnapshotFile {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        exported_at: Utc::now(),
        snapshot: snapshot.clone(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    write_atomic(path, &json)?;
    info!(
        path = %path.display(),
        transactions = snapshot.transactions.len(),
        budgets = snapshot.budgets.len(),
        goals = snapshot.goals.len(),
        "snapshot exported"
    );
    Ok(())
}

/// Reads a snapshot written by [`save_snapshot_to_path`].
pub fn load_snapshot_from_path(path: &Path) -> LedgerResult<LedgerSnapshot> {
    let data = fs::read_to_string(path)?;
    let file: SnapshotFile = serde_json::from_str(&data)?;
    if file.schema_version > SNAPSHOT_SCHEMA_VERSION {
        return Err(LedgerError::Unsupported(format!(
            "snapshot `{}` uses schema version {} (newest supported is {})",
            path.display(),
            file.schema_version,
            SNAPSHOT_SCHEMA_VERSION
        )));
    }
    file.snapshot.validate()?;
    Ok(file.snapshot)
}
