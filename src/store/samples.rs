//! Rolling window of top-story observations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ItemId;

/// Samples older than this many seconds fall out of the window.
pub const WINDOW_SECS: i64 = 24 * 60 * 60;

/// One observation of the rank-1 story. Stored as `[id, timestamp]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(ItemId, i64)", into = "(ItemId, i64)")]
pub struct Sample {
    pub id: ItemId,
    pub observed_at: i64,
}

impl Sample {
    pub fn new(id: ItemId, observed_at: i64) -> Self {
        Sample { id, observed_at }
    }

    /// True while the sample is inside the window ending at `now`.
    /// A sample exactly `WINDOW_SECS` old has already expired.
    pub fn in_window(&self, now: i64) -> bool {
        self.observed_at > now - WINDOW_SECS
    }
}

impl From<(ItemId, i64)> for Sample {
    fn from((id, observed_at): (ItemId, i64)) -> Self {
        Sample { id, observed_at }
    }
}

impl From<Sample> for (ItemId, i64) {
    fn from(sample: Sample) -> Self {
        (sample.id, sample.observed_at)
    }
}

/// Load persisted samples that are still inside the window, oldest first.
pub fn load_window(path: &Path, now: i64) -> Result<Vec<Sample>> {
    let samples: Vec<Sample> = super::read_json(path)?.unwrap_or_default();
    Ok(samples.into_iter().filter(|s| s.in_window(now)).collect())
}

/// Replace the store contents with exactly `samples`.
pub fn save_window(path: &Path, samples: &[Sample]) -> Result<()> {
    super::write_json(path, samples, false)
}

/// Prune expired samples, append `sample` and persist. Returns the new window.
pub fn record(path: &Path, sample: Sample, now: i64) -> Result<Vec<Sample>> {
    let mut window = load_window(path, now)?;
    window.push(sample);
    save_window(path, &window)?;
    Ok(window)
}
