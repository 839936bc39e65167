//! The poll loop: sample, select, and publish when the selection changes.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{error, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hn::StorySource;
use crate::select::select;
use crate::site::Site;
use crate::store::archive::Archive;
use crate::store::samples::{self, Sample};
use crate::ItemId;

/// What a cycle decided to do with the selected story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Selected story is already published and the site is live
    NoChange { selected: ItemId },
    /// Selected story was archived and the site republished
    NewStory { selected: ItemId },
    /// Selected story is already archived but the live site was missing,
    /// so the existing archive was republished
    SiteMissingNoNewStory { selected: ItemId },
}

impl Outcome {
    pub fn selected(&self) -> ItemId {
        match *self {
            Outcome::NoChange { selected }
            | Outcome::NewStory { selected }
            | Outcome::SiteMissingNoNewStory { selected } => selected,
        }
    }

    pub fn published(&self) -> bool {
        !matches!(self, Outcome::NoChange { .. })
    }
}

pub struct Poller<S> {
    source: S,
    site: Site,
    ids_path: PathBuf,
    archive_path: PathBuf,
    interval: Duration,
}

impl<S: StorySource> Poller<S> {
    pub fn new(config: &Config, source: S) -> Result<Self> {
        Ok(Poller {
            source,
            site: Site::new(&config.site, &config.templates),
            ids_path: config.database.ids_path()?,
            archive_path: config.database.archive_path()?,
            interval: config.poll.interval()?,
        })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Run one cycle as of unix time `now`.
    pub fn run_cycle(&self, now: i64) -> Result<Outcome> {
        info!(now, utc = %utc_string(now), "current time");

        let top_id = self.source.top_id()?;
        info!(top_id, "top id on HN");

        let window = samples::record(&self.ids_path, Sample::new(top_id, now), now)?;
        let selected = select(&window).ok_or(Error::NoSamples)?;
        info!(selected, window = window.len(), "most frequent top id in the past 24 hours");

        let mut archive = Archive::load(&self.archive_path)?;

        let outcome = if archive.contains(selected) {
            if self.site.is_live() {
                info!(selected, "ignoring selected id because it was published earlier");
                return Ok(Outcome::NoChange { selected });
            }
            info!(selected, "live site missing, republishing archive");
            Outcome::SiteMissingNoNewStory { selected }
        } else {
            let story = self.source.story(selected)?;
            info!(selected, title = story.title.as_deref().unwrap_or(""), "publishing new top story");
            archive.append_and_save(&self.archive_path, story.into_entry(now))?;
            Outcome::NewStory { selected }
        };

        // a publish that died mid-swap leaves a stage but no live site
        self.site.discard_stale_stage()?;
        self.site.stage(&archive)?;
        self.site.publish()?;

        Ok(outcome)
    }

    /// Cycle forever. Errors are logged and the loop carries on.
    pub fn run(&self) -> ! {
        loop {
            info!("working");
            match self.run_cycle(unix_now()) {
                Ok(outcome) => info!(?outcome, "cycle complete"),
                Err(e) => error!(error = %e.chain(), "cycle failed"),
            }

            info!(seconds = self.interval.as_secs(), "sleeping");
            thread::sleep(self.interval);
        }
    }
}

/// Current unix time in whole seconds, matching HN item timestamps.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn utc_string(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
