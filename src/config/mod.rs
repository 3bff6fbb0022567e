use std::fs::{self, File};
use std::io::Write as _;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// How long retired statement-history records are kept before cleanup.
/// The default keeps everything; hosts opt into deletion with an explicit
/// age limit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RetentionPolicy {
    #[default]
    KeepAll,
    MaxAgeDays { days: u32 },
}

impl RetentionPolicy {
    /// The timestamp before which history records count as stale, or `None`
    /// when nothing is ever deleted.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            RetentionPolicy::KeepAll => None,
            RetentionPolicy::MaxAgeDays { days } => Some(now - Duration::days(*days as i64)),
        }
    }
}

/// Host-tunable engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub statement_retention: RetentionPolicy,
}

impl EngineConfig {
    /// Loads settings from a JSON file, falling back to defaults when the
    /// file does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let data = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Persists settings as pretty-printed JSON via a temp file rename.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
