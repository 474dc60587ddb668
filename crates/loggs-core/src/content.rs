//! Visual item source
//!
//! The catalogue of gallery images, works, embed cards, timeline entries and
//! headline stats. Views only ever read from it through
//! [`VisualItemSource`]; they never mutate it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.toml");

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: u32,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl GalleryImage {
    /// Title, falling back to a generated alt text
    pub fn alt_text(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Gallery image {}", self.id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedKind {
    Youtube,
    Maps,
    Iframe,
}

/// Position as fractions of the board size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardPosition {
    pub x: f64,
    pub y: f64,
}

impl Default for CardPosition {
    fn default() -> Self {
        Self { x: 0.40, y: 0.30 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedCard {
    pub id: String,
    pub kind: EmbedKind,
    #[serde(default)]
    pub youtube_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub title: String,
    #[serde(default)]
    pub position: CardPosition,
    /// Resting rotation in degrees
    #[serde(default)]
    pub rotation: f64,
}

impl EmbedCard {
    /// URL of the embedded frame
    ///
    /// YouTube embeds autoplay muted on a loop without controls.
    pub fn embed_url(&self) -> Result<Url> {
        match self.kind {
            EmbedKind::Youtube => {
                let video = self.youtube_id.as_deref().ok_or_else(|| {
                    Error::invalid(format!("card {} is a youtube card without youtube_id", self.id))
                })?;
                let mut url = Url::parse(YOUTUBE_EMBED_BASE)?.join(video)?;
                url.query_pairs_mut()
                    .append_pair("rel", "0")
                    .append_pair("modestbranding", "1")
                    .append_pair("autoplay", "1")
                    .append_pair("mute", "1")
                    .append_pair("loop", "1")
                    .append_pair("playlist", video)
                    .append_pair("controls", "0")
                    .append_pair("showinfo", "0")
                    .append_pair("iv_load_policy", "3");
                Ok(url)
            }
            EmbedKind::Maps | EmbedKind::Iframe => {
                let raw = self.url.as_deref().ok_or_else(|| {
                    Error::invalid(format!("card {} has no url", self.id))
                })?;
                Ok(Url::parse(raw)?)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub description: String,
    pub period: String,
    #[serde(default)]
    pub current: bool,
}

/// Headline number revealed by an animated counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    #[serde(default)]
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub decimals: usize,
    #[serde(default)]
    pub show_plus: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
    #[serde(default)]
    pub works: Vec<WorkItem>,
    #[serde(default)]
    pub cards: Vec<EmbedCard>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    #[serde(default)]
    pub stats: Vec<Stat>,
}

impl Catalog {
    /// The catalogue shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a catalogue file, or the built-in one when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                let catalog = Self::from_toml(&content)?;
                tracing::info!(
                    path = %path.display(),
                    gallery = catalog.gallery.len(),
                    works = catalog.works.len(),
                    "Loaded content catalogue"
                );
                Ok(catalog)
            }
            None => Self::builtin(),
        }
    }
}

/// Borrowed view of one renderable item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef<'a> {
    pub index: usize,
    /// Stable identity within its source
    pub key: &'a str,
    pub title: &'a str,
    /// Image path or embed reference
    pub source: &'a str,
}

/// Ordered, read-only sequence of renderable items
pub trait VisualItemSource {
    fn item_count(&self) -> usize;
    fn item(&self, index: usize) -> Option<ItemRef<'_>>;
}

impl VisualItemSource for [GalleryImage] {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn item(&self, index: usize) -> Option<ItemRef<'_>> {
        self.get(index).map(|image| ItemRef {
            index,
            key: &image.url,
            title: image.title.as_deref().unwrap_or(""),
            source: &image.url,
        })
    }
}

impl VisualItemSource for [WorkItem] {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn item(&self, index: usize) -> Option<ItemRef<'_>> {
        self.get(index).map(|work| ItemRef {
            index,
            key: &work.image_url,
            title: &work.title,
            source: &work.image_url,
        })
    }
}

impl VisualItemSource for [EmbedCard] {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn item(&self, index: usize) -> Option<ItemRef<'_>> {
        self.get(index).map(|card| ItemRef {
            index,
            key: &card.id,
            title: &card.title,
            source: card
                .youtube_id
                .as_deref()
                .or(card.url.as_deref())
                .unwrap_or(""),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.gallery.len(), 10);
        assert_eq!(catalog.works.len(), 3);
        assert_eq!(catalog.cards.len(), 3);
        assert_eq!(catalog.timeline.len(), 3);
        assert!(catalog.timeline[0].current);
        assert_eq!(catalog.stats[2].end, 1000.0);
        assert!(!catalog.stats[2].show_plus);
    }

    #[test]
    fn test_youtube_embed_url() {
        let catalog = Catalog::builtin().unwrap();
        let url = catalog.cards[0].embed_url().unwrap();
        assert_eq!(url.host_str(), Some("www.youtube.com"));
        assert_eq!(url.path(), "/embed/Q_MZ79uFtD4");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("playlist".into(), "Q_MZ79uFtD4".into())));
        assert!(pairs.contains(&("mute".into(), "1".into())));
    }

    #[test]
    fn test_card_without_reference_is_rejected() {
        let card = EmbedCard {
            id: "x".into(),
            kind: EmbedKind::Youtube,
            youtube_id: None,
            url: None,
            title: "Broken".into(),
            position: CardPosition::default(),
            rotation: 0.0,
        };
        assert!(matches!(card.embed_url(), Err(Error::InvalidConfiguration(_))));

        let card = EmbedCard {
            kind: EmbedKind::Iframe,
            url: Some("not a url".into()),
            ..card
        };
        assert!(matches!(card.embed_url(), Err(Error::UrlParse(_))));
    }

    #[test]
    fn test_item_source_views() {
        let catalog = Catalog::builtin().unwrap();
        let gallery: &[GalleryImage] = &catalog.gallery;
        assert_eq!(gallery.item_count(), 10);
        let item = gallery.item(1).unwrap();
        assert_eq!(item.index, 1);
        assert_eq!(item.title, "Live Performance");
        assert!(gallery.item(10).is_none());

        let works: &[WorkItem] = &catalog.works;
        assert_eq!(works.item(2).unwrap().title, "Festival Coverage");
    }

    #[test]
    fn test_alt_text_fallback() {
        let image = GalleryImage {
            id: 42,
            url: "/gallery/42.jpg".into(),
            title: None,
            description: None,
        };
        assert_eq!(image.alt_text(), "Gallery image 42");
    }
}
