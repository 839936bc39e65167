//! Static site staging and publishing.
//!
//! A publish is three moves under `site.root`:
//! - live -> defunct (kept only until the swap is done)
//! - stage -> live
//! - defunct removed
//!
//! The sequence is not atomic. If the process dies between the first two
//! moves the live directory is missing and the stage is left behind. While
//! live is missing a leftover stage is discarded before restaging, so the
//! next cycle republishes. With live present a leftover stage is a collision.

pub mod render;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::{SiteConfig, TemplatesConfig};
use crate::error::{Error, Result};
use crate::store::archive::{Archive, ArchiveEntry};
use render::Layout;

pub struct Site {
    stage_dir: PathBuf,
    live_dir: PathBuf,
    defunct_dir: PathBuf,
    assets_src: PathBuf,
    config: SiteConfig,
}

impl Site {
    pub fn new(site: &SiteConfig, templates: &TemplatesConfig) -> Self {
        Site {
            stage_dir: site.root.join(&site.stage_dir),
            live_dir: site.root.join(&site.live_dir),
            defunct_dir: site.root.join(&site.defunct_dir),
            assets_src: templates.static_dir.clone(),
            config: site.clone(),
        }
    }

    pub fn stage_dir(&self) -> &Path {
        &self.stage_dir
    }

    pub fn live_dir(&self) -> &Path {
        &self.live_dir
    }

    pub fn defunct_dir(&self) -> &Path {
        &self.defunct_dir
    }

    pub fn is_live(&self) -> bool {
        self.live_dir.is_dir()
    }

    fn layout(&self) -> Layout<'_> {
        Layout {
            home: &self.config.home,
            archive: &self.config.archive,
            about: &self.config.about,
            static_dir: &self.config.static_dir,
        }
    }

    /// Remove a stage left by an interrupted publish. Only acts while the
    /// live site is missing; returns true when a stage was removed.
    pub fn discard_stale_stage(&self) -> Result<bool> {
        if self.is_live() || !self.stage_dir.exists() {
            return Ok(false);
        }

        warn!(dir = %self.stage_dir.display(), "live site missing, discarding leftover stage");
        remove_tree(&self.stage_dir)?;
        Ok(true)
    }

    /// Build a complete site for `archive` in a fresh stage directory.
    ///
    /// A stage that fails partway is removed again so it cannot block later
    /// cycles.
    pub fn stage(&self, archive: &Archive) -> Result<()> {
        let latest = archive.latest().ok_or(Error::EmptyArchive)?;

        if self.stage_dir.exists() {
            return Err(Error::StageExists(self.stage_dir.clone()));
        }

        info!(dir = %self.stage_dir.display(), "creating stage");
        if let Some(root) = self.stage_dir.parent() {
            fs::create_dir_all(root).map_err(|e| Error::io(root, e))?;
        }
        fs::create_dir(&self.stage_dir).map_err(|e| Error::io(&self.stage_dir, e))?;

        let result = self.fill_stage(archive, latest);
        if result.is_err() {
            if let Err(e) = remove_tree(&self.stage_dir) {
                warn!(error = %e.chain(), "failed to remove incomplete stage");
            }
        }
        result
    }

    fn fill_stage(&self, archive: &Archive, latest: &ArchiveEntry) -> Result<()> {
        let assets_dst = self.stage_dir.join(&self.config.static_dir);
        info!(
            from = %self.assets_src.display(),
            to = %assets_dst.display(),
            "copying static assets"
        );
        copy_tree(&self.assets_src, &assets_dst)?;

        let layout = self.layout();

        info!("rendering home page");
        render::write_page(&self.stage_dir.join(&self.config.home), layout.home(latest))?;

        info!(entries = archive.len(), "rendering archive page");
        render::write_page(&self.stage_dir.join(&self.config.archive), layout.archive(archive))?;

        info!("rendering about page");
        render::write_page(&self.stage_dir.join(&self.config.about), layout.about())?;

        Ok(())
    }

    /// Swap the staged site into the live location.
    pub fn publish(&self) -> Result<()> {
        if self.live_dir.is_dir() {
            // leftover from a publish that died after its first move
            if self.defunct_dir.exists() {
                info!(dir = %self.defunct_dir.display(), "removing stale defunct site");
                remove_tree(&self.defunct_dir)?;
            }

            info!(
                from = %self.live_dir.display(),
                to = %self.defunct_dir.display(),
                "moving live site aside"
            );
            fs::rename(&self.live_dir, &self.defunct_dir)
                .map_err(|e| Error::io(&self.live_dir, e))?;
        } else {
            info!("live site does not exist");
        }

        info!(
            from = %self.stage_dir.display(),
            to = %self.live_dir.display(),
            "moving stage to live"
        );
        fs::rename(&self.stage_dir, &self.live_dir).map_err(|e| Error::io(&self.stage_dir, e))?;
        info!("published live site");

        if self.defunct_dir.exists() {
            info!(dir = %self.defunct_dir.display(), "removing defunct site");
            remove_tree(&self.defunct_dir)?;
        }

        Ok(())
    }
}

fn remove_tree(path: &Path) -> Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| Error::io(path, e))
}

/// Recursively copy `src` to `dst`; `dst` must not exist yet.
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(entry.path(), e))?;
        }
    }
    Ok(())
}
