//! Persisted projection output and its schema versioning.
//!
//! Snapshots are immutable once written: a new projection supersedes the old
//! record, nothing is edited in place. Readers validate the embedded schema
//! version before interpreting anything else.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::MinorUnits;
use crate::errors::{EngineError, Result};

/// Schema version stamped on every snapshot this build writes.
pub const SCHEMA_VERSION: u32 = 1;

/// True iff a snapshot written with `version` can be read by this build.
/// Version 1 is the only shipped schema.
pub fn is_schema_version_compatible(version: u32) -> bool {
    (1..=SCHEMA_VERSION).contains(&version)
}

/// Describes how fresh the starting balances were before projection began.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BalanceBasis {
    /// Every account's balance was last confirmed on the same date.
    Single { date: NaiveDate },
    /// Account update dates differ; spans earliest to latest.
    Range { from: NaiveDate, to: NaiveDate },
}

/// Post-application balances for one projected day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyBalances {
    pub date: NaiveDate,
    /// Per-account running balance; a BTreeMap keeps serialization order
    /// stable so identical inputs produce identical bytes.
    pub balances: BTreeMap<Uuid, MinorUnits>,
    /// Sum of all account balances for the day.
    pub total: MinorUnits,
}

/// The full result of one projection run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectionSnapshot {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub horizon_days: u16,
    /// `horizon_days + 1` entries; the first is the reference date itself.
    pub days: Vec<DailyBalances>,
    pub basis: BalanceBasis,
}

#[derive(Deserialize)]
struct VersionProbe {
    schema_version: u32,
}

/// Serializes a snapshot to its persisted JSON form.
pub fn encode_snapshot(snapshot: &ProjectionSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Reads a persisted snapshot, rejecting incompatible schema versions before
/// any interpretation is attempted.
pub fn decode_snapshot(data: &str) -> Result<ProjectionSnapshot> {
    let probe: VersionProbe = serde_json::from_str(data)?;
    if !is_schema_version_compatible(probe.schema_version) {
        return Err(EngineError::schema_incompatible(probe.schema_version));
    }
    Ok(serde_json::from_str(data)?)
}

/// Persists a snapshot to `path`, writing through a temp file and renaming
/// so readers never observe a partial record.
pub fn write_snapshot(snapshot: &ProjectionSnapshot, path: &Path) -> Result<()> {
    let json = encode_snapshot(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    let mut file = File::create(&tmp)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads and validates a snapshot previously written with [`write_snapshot`].
pub fn read_snapshot(path: &Path) -> Result<ProjectionSnapshot> {
    let data = fs::read_to_string(path)?;
    decode_snapshot(&data)
}
