//! History of every story that has been the site's top story.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub by: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub id: ItemId,
    pub title: Option<String>,
    pub url: Option<String>,
    /// When the story was submitted to HN
    pub time_hn: Option<i64>,
    /// When the story became the top story here
    pub time_tophn: i64,
}

impl ArchiveEntry {
    /// HN discussion page for this story.
    pub fn discussion_url(&self) -> String {
        format!("https://news.ycombinator.com/item?id={}", self.id)
    }

    /// Link target for the title; text posts link to their discussion.
    pub fn link(&self) -> String {
        self.url.clone().unwrap_or_else(|| self.discussion_url())
    }

    pub fn title_or_placeholder(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    pub fn new(entries: Vec<ArchiveEntry>) -> Self {
        Archive { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let entries = super::read_json(path)?.unwrap_or_default();
        Ok(Archive { entries })
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Most recently published entry.
    pub fn latest(&self) -> Option<&ArchiveEntry> {
        self.entries.last()
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.iter().rev()
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append `entry` and rewrite the archive file.
    ///
    /// Returns false without touching the file when the id is already
    /// archived.
    pub fn append_and_save(&mut self, path: &Path, entry: ArchiveEntry) -> Result<bool> {
        if self.contains(entry.id) {
            return Ok(false);
        }

        self.entries.push(entry);
        super::write_json(path, &self.entries, true)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn entry(id: ItemId, time_tophn: i64) -> ArchiveEntry {
        ArchiveEntry {
            by: Some("pg".to_string()),
            kind: Some("story".to_string()),
            id,
            title: Some(format!("story {id}")),
            url: Some(format!("https://example.com/{id}")),
            time_hn: Some(time_tophn - 3600),
            time_tophn,
        }
    }

    #[test]
    fn missing_file_is_empty_archive() {
        let dir = TempDir::new().unwrap();
        let archive = Archive::load(&dir.path().join("archive.json")).unwrap();
        assert!(archive.is_empty());
        assert!(archive.latest().is_none());
    }

    #[test]
    fn append_persists_pretty_json_with_hn_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("archive.json");

        let mut archive = Archive::default();
        assert!(archive.append_and_save(&path, entry(10, 1000)).unwrap());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n"));
        assert!(text.contains("\"type\": \"story\""));
        assert!(text.contains("\"time_hn\": -2600"));
        assert!(text.contains("\"time_tophn\": 1000"));

        assert_eq!(Archive::load(&path).unwrap(), archive);
    }

    #[test]
    fn duplicate_id_is_not_appended() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("archive.json");

        let mut archive = Archive::default();
        assert!(archive.append_and_save(&path, entry(10, 1000)).unwrap());
        assert!(!archive.append_and_save(&path, entry(10, 2000)).unwrap());
        assert!(!archive.append_and_save(&path, entry(10, 3000)).unwrap());

        let reloaded = Archive::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.latest().unwrap().time_tophn, 1000);
    }

    #[test]
    fn ordering_latest_and_newest_first() {
        let archive = Archive::new(vec![entry(1, 100), entry(2, 200), entry(3, 300)]);

        assert_eq!(archive.latest().unwrap().id, 3);
        let ids: Vec<_> = archive.newest_first().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(archive.contains(2));
        assert!(!archive.contains(4));
    }

    #[test]
    fn null_fields_round_trip() {
        let json = r#"[{"by": null, "type": "story", "id": 5, "title": "Ask HN", "url": null, "time_hn": 1, "time_tophn": 2}]"#;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("archive.json");
        fs::write(&path, json).unwrap();

        let archive = Archive::load(&path).unwrap();
        let story = archive.latest().unwrap();
        assert!(story.url.is_none());
        assert_eq!(story.link(), "https://news.ycombinator.com/item?id=5");
    }
}
