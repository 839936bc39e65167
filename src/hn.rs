//! Hacker News firebase API client.
//!
//! Two endpoints are used:
//! - `ids_url`: json array of story ids, rank 1 first
//! - `story_base_url + <id>.json`: the story item
//!
//! Calls block and rely on reqwest's default timeout.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::HnConfig;
use crate::error::{Error, Result};
use crate::store::archive::ArchiveEntry;
use crate::ItemId;

/// An item as returned by the story endpoint. Everything but `id` is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Story {
    pub id: ItemId,
    #[serde(default)]
    pub by: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
}

impl Story {
    /// Archive record for this story published at `published_at`.
    pub fn into_entry(self, published_at: i64) -> ArchiveEntry {
        ArchiveEntry {
            by: self.by,
            kind: self.kind,
            id: self.id,
            title: self.title,
            url: self.url,
            time_hn: self.time,
            time_tophn: published_at,
        }
    }
}

/// Where the poll loop gets rankings and story details from.
pub trait StorySource {
    /// Id of the current rank-1 story.
    fn top_id(&self) -> Result<ItemId>;

    fn story(&self, id: ItemId) -> Result<Story>;
}

pub struct HnClient {
    client: Client,
    ids_url: String,
    story_base_url: String,
}

impl HnClient {
    pub fn new(config: &HnConfig) -> Result<Self> {
        let client = build_client(concat!("tophn/", env!("CARGO_PKG_VERSION")))?;

        Ok(HnClient {
            client,
            ids_url: config.ids_url.clone(),
            story_base_url: config.story_base_url.clone(),
        })
    }

    fn story_url(&self, id: ItemId) -> String {
        format!("{}{id}.json", self.story_base_url)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let started = std::time::Instant::now();
        let http_err = |source: reqwest::Error| Error::Http {
            url: url.to_string(),
            source,
        };

        let value = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(http_err)?;

        debug!(url, elapsed_ms = elapsed_ms(started.elapsed()), "fetched");
        Ok(value)
    }
}

fn build_client(user_agent: &str) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(Error::HttpClient)
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// First id of a ranking, or an error naming `url` when it is empty.
pub fn top_of_ranking(ids: &[ItemId], url: &str) -> Result<ItemId> {
    ids.first().copied().ok_or_else(|| Error::EmptyRanking {
        url: url.to_string(),
    })
}

impl StorySource for HnClient {
    fn top_id(&self) -> Result<ItemId> {
        let ids: Vec<ItemId> = self.get_json(&self.ids_url)?;
        top_of_ranking(&ids, &self.ids_url)
    }

    fn story(&self, id: ItemId) -> Result<Story> {
        self.get_json(&self.story_url(id))
    }
}
