//! Normalized feed model shared by the loader and the renderer.
//!
//! Everything here is plain owned data. The loader produces a [`FeedModel`]
//! and moves it into the renderer; nothing holds a shared mutable reference.
//! Every text field is a `String` that defaults to empty: an absent column in
//! the feed and an empty cell are indistinguishable downstream.

use serde::{Deserialize, Serialize};

use crate::feed::{FeedLoader, LoadError, SourceRef};

/// Page-level images set by the feed's metadata rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub logo_url: String,
    pub background_url: String,
}

/// One displayable unit of the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub thumbnail_url: String,
    /// Only JSON feeds carry a short description; empty for CSV feeds.
    pub short_description: String,
    pub full_description: String,
    /// Opaque player markup, injected verbatim into the video surface.
    pub embed_markup: String,
}

impl Card {
    pub fn has_embed(&self) -> bool {
        !self.embed_markup.trim().is_empty()
    }
}

/// Cards in feed row order, which is also display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardCollection(Vec<Card>);

impl CardCollection {
    pub fn new(cards: Vec<Card>) -> Self {
        Self(cards)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.0
    }
}

impl From<Vec<Card>> for CardCollection {
    fn from(cards: Vec<Card>) -> Self {
        Self(cards)
    }
}

impl<'a> IntoIterator for &'a CardCollection {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The complete result of one successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedModel {
    pub site: SiteConfig,
    pub cards: CardCollection,
}

impl FeedModel {
    pub fn into_parts(self) -> (SiteConfig, CardCollection) {
        (self.site, self.cards)
    }
}

/// Single owner of the current model.
///
/// A model is built fresh on every load and swapped in whole. Nothing mutates
/// a model in place, so readers never see a half-updated card set.
#[derive(Debug, Default)]
pub struct AppState {
    current: Option<FeedModel>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&FeedModel> {
        self.current.as_ref()
    }

    /// Installs `model`, returning the one it replaced.
    pub fn replace(&mut self, model: FeedModel) -> Option<FeedModel> {
        self.current.replace(model)
    }

    /// Loads `source` and swaps the result in. On failure the previous model
    /// stays in place and the error is handed back to the caller.
    pub fn reload(&mut self, loader: &FeedLoader, source: &SourceRef) -> Result<&FeedModel, LoadError> {
        let model = loader.fetch_and_parse(source)?;
        Ok(self.current.insert(model))
    }
}
