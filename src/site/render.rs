use std::fs;
use std::path::Path;

use maud::{html, Markup, DOCTYPE};

use crate::error::{Error, Result};
use crate::store::archive::{Archive, ArchiveEntry};

/// Page roles, named after the file each one is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Archive,
    About,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "TopHN",
            Page::Archive => "TopHN Archive",
            Page::About => "About TopHN",
        }
    }
}

/// Links and asset paths shared by every page.
pub struct Layout<'a> {
    pub home: &'a str,
    pub archive: &'a str,
    pub about: &'a str,
    pub static_dir: &'a str,
}

impl Layout<'_> {
    fn head(&self, page: Page) -> Markup {
        html! {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                link rel="stylesheet" type="text/css" href={ (self.static_dir) "/style.css" };
                title { (page.title()) }
            }
        }
    }

    fn nav(&self) -> Markup {
        html! {
            nav {
                a href=(self.home) { "Home" }
                " | "
                a href=(self.archive) { "Archive" }
                " | "
                a href=(self.about) { "About" }
            }
        }
    }

    fn page(&self, page: Page, body: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                (self.head(page))
                body {
                    header {
                        h1 { a href=(self.home) { "TopHN" } }
                        (self.nav())
                    }
                    main { (body) }
                }
            }
        }
    }

    pub fn home(&self, story: &ArchiveEntry) -> Markup {
        self.page(
            Page::Home,
            html! {
                article .story {
                    h2 {
                        a href=(story.link()) { (story.title_or_placeholder()) }
                        @if let Some(host) = story.url.as_deref().and_then(host_of) {
                            " " span .host { "(" (host) ")" }
                        }
                    }
                    p .meta {
                        @if let Some(by) = &story.by {
                            "by " (by) " | "
                        }
                        a href=(story.discussion_url()) { "discuss on HN" }
                    }
                }
            },
        )
    }

    pub fn archive(&self, archive: &Archive) -> Markup {
        self.page(
            Page::Archive,
            html! {
                table .archive {
                    @for story in archive.newest_first() {
                        tr {
                            td .date { (utc_date(story.time_tophn)) }
                            td {
                                a href=(story.link()) { (story.title_or_placeholder()) }
                                @if let Some(host) = story.url.as_deref().and_then(host_of) {
                                    " " span .host { "(" (host) ")" }
                                }
                            }
                        }
                    }
                }
            },
        )
    }

    pub fn about(&self) -> Markup {
        self.page(
            Page::About,
            html! {
                p {
                    "TopHN recommends exactly one story from Hacker News. "
                    "The top story on Hacker News is sampled on a fixed interval, and the story "
                    "that held the top spot most often over the last 24 hours is shown here."
                }
                p {
                    "When two stories were sampled equally often, the one that reached the "
                    "top more recently is chosen. Every story that has been featured is kept "
                    "in the archive."
                }
            },
        )
    }
}

/// Host name of a link without a leading `www.`.
pub fn host_of(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

fn utc_date(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Write rendered markup to `path`.
pub fn write_page(path: &Path, markup: Markup) -> Result<()> {
    fs::write(path, markup.into_string()).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: Layout<'static> = Layout {
        home: "index.html",
        archive: "archive.html",
        about: "about.html",
        static_dir: "static",
    };

    fn entry(id: u64, title: &str, time_tophn: i64) -> ArchiveEntry {
        ArchiveEntry {
            by: Some("alice".to_string()),
            kind: Some("story".to_string()),
            id,
            title: Some(title.to_string()),
            url: Some(format!("https://www.example.com/{id}")),
            time_hn: Some(time_tophn - 60),
            time_tophn,
        }
    }

    #[test]
    fn home_shows_story_link_and_host() {
        let html = LAYOUT.home(&entry(7, "Rust 2.0", 1_700_000_000)).into_string();
        assert!(html.contains(r#"<a href="https://www.example.com/7">Rust 2.0</a>"#));
        assert!(html.contains("(example.com)"));
        assert!(html.contains("by alice"));
        assert!(html.contains("https://news.ycombinator.com/item?id=7"));
        assert!(html.contains(r#"href="static/style.css""#));
    }

    #[test]
    fn home_escapes_title() {
        let html = LAYOUT.home(&entry(1, "<script>x</script>", 0)).into_string();
        assert!(!html.contains("<script>x"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn text_post_links_to_discussion() {
        let mut story = entry(9, "Ask HN: anything?", 0);
        story.url = None;
        let html = LAYOUT.home(&story).into_string();
        assert!(html.contains(r#"<a href="https://news.ycombinator.com/item?id=9">Ask HN: anything?</a>"#));
        assert!(!html.contains("class=\"host\""));
    }

    #[test]
    fn archive_lists_newest_first_with_dates() {
        let archive = Archive::new(vec![
            entry(1, "first", 1_600_000_000),
            entry(2, "second", 1_700_000_000),
        ]);
        let html = LAYOUT.archive(&archive).into_string();

        let first = html.find("first").unwrap();
        let second = html.find("second").unwrap();
        assert!(second < first);
        assert!(html.contains("2023-11-14"));
        assert!(html.contains("2020-09-13"));
    }

    #[test]
    fn about_has_navigation() {
        let html = LAYOUT.about().into_string();
        assert!(html.contains("<title>About TopHN</title>"));
        assert!(html.contains(r#"href="archive.html""#));
    }

    #[test]
    fn document_nests_head_and_body_in_html() {
        let html = LAYOUT.about().into_string();
        assert!(html.starts_with(r#"<!DOCTYPE html><html lang="en"><head>"#));
        assert!(html.contains("</head><body>"));
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn host_of_handles_bad_urls() {
        assert_eq!(host_of("https://blog.rust-lang.org/x").as_deref(), Some("blog.rust-lang.org"));
        assert_eq!(host_of("not a url"), None);
    }
}
