//! Feed loading: fetch one source, normalize it into a [`FeedModel`].
//!
//! A feed is a flat list of rows. Each row carries a type tag (the first CSV
//! cell, or the JSON `Title` field) that decides what the row means:
//!
//! | Tag | Effect |
//! |-----|--------|
//! | `LogoLink`, `LogoURL` | sets the logo image URL |
//! | `BackgroundLink`, `BackgroundURL` | sets the background image URL |
//! | `Card…` (any tag starting with `Card`) | appends one card |
//! | anything else | ignored |
//!
//! Cards keep the order their rows appear in. The `CardN` numbering is not
//! interpreted: `Card7` followed by `Card2` displays in that order.
//!
//! Loading is all-or-nothing. A failed fetch or parse returns a [`LoadError`]
//! and never a partial model, so a caller holding a previous model keeps it.

mod csv_source;
mod fetch;
mod json_source;

pub use csv_source::CsvAdapter;
pub use fetch::{DEFAULT_USER_AGENT, FetchOptions, Fetched, Fetcher, Location};
pub use json_source::JsonAdapter;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{Card, CardCollection, FeedModel, SiteConfig};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The source could not be reached or answered with a non-success status.
    #[error("network error: {0}")]
    Network(String),
    /// The document is not valid CSV/JSON text.
    #[error("parse error: {0}")]
    Parse(String),
    /// The document parsed but does not have the shape of a feed.
    #[error("format error: {0}")]
    Format(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    Network,
    Parse,
    Format,
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::Network(_) => LoadErrorKind::Network,
            LoadError::Parse(_) => LoadErrorKind::Parse,
            LoadError::Format(_) => LoadErrorKind::Format,
        }
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        LoadError::Network(err.to_string())
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Io => LoadError::Network(err.to_string()),
            Category::Data => LoadError::Format(err.to_string()),
            Category::Syntax | Category::Eof => LoadError::Parse(err.to_string()),
        }
    }
}

/// Document format of a feed source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    Csv,
    Json,
    /// Decide from the response content type, then the location's extension.
    #[default]
    Auto,
}

impl FeedFormat {
    /// Resolve `Auto` against what the fetch returned. Explicit formats pass
    /// through unchanged.
    pub fn resolve(self, content_type: Option<&str>, location: &Location) -> FeedFormat {
        match self {
            FeedFormat::Auto => {
                let json_type = content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));
                if json_type || location.has_json_extension() {
                    FeedFormat::Json
                } else {
                    FeedFormat::Csv
                }
            }
            explicit => explicit,
        }
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FeedFormat::Csv => "csv",
            FeedFormat::Json => "json",
            FeedFormat::Auto => "auto",
        })
    }
}

/// Where to load the feed from, and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub location: Location,
    pub format: FeedFormat,
}

impl SourceRef {
    pub fn new(location: &str, format: FeedFormat) -> Result<Self, LoadError> {
        Ok(Self {
            location: Location::parse(location)?,
            format,
        })
    }
}

/// Turns the text of one feed document into a model.
pub trait SourceAdapter {
    fn parse(&self, text: &str) -> Result<FeedModel, LoadError>;
}

/// Pick the adapter for a resolved format. `Auto` reads as CSV, the format of
/// a spreadsheet export.
pub fn adapter_for(format: FeedFormat) -> &'static dyn SourceAdapter {
    match format {
        FeedFormat::Json => &JsonAdapter,
        FeedFormat::Csv | FeedFormat::Auto => &CsvAdapter,
    }
}

/// Fetcher plus adapter selection.
pub struct FeedLoader {
    fetcher: Fetcher,
}

impl FeedLoader {
    pub fn new(options: &FetchOptions) -> Result<Self, LoadError> {
        Ok(Self {
            fetcher: Fetcher::new(options)?,
        })
    }

    pub fn fetch_and_parse(&self, source: &SourceRef) -> Result<FeedModel, LoadError> {
        info!(source = %source.location, format = %source.format, "loading feed");
        let fetched = self.fetcher.fetch(&source.location)?;

        // Publish-to-web links answer with a sign-in page when sharing is off.
        if fetched.is_html() {
            return Err(LoadError::Format(format!(
                "{} returned an HTML page instead of a feed",
                source.location
            )));
        }

        let format = source
            .format
            .resolve(fetched.content_type.as_deref(), &source.location);
        let model = adapter_for(format).parse(&fetched.text)?;
        info!(cards = model.cards.len(), %format, "feed loaded");
        Ok(model)
    }
}

/// One-shot load with default fetch options.
pub fn load(source: &SourceRef) -> Result<FeedModel, LoadError> {
    FeedLoader::new(&FetchOptions::default())?.fetch_and_parse(source)
}

/// What a row's type tag means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowTag {
    Logo,
    Background,
    Card,
    Other,
}

impl RowTag {
    fn classify(tag: &str) -> Self {
        match tag.trim() {
            "LogoLink" | "LogoURL" => RowTag::Logo,
            "BackgroundLink" | "BackgroundURL" => RowTag::Background,
            t if t.starts_with("Card") => RowTag::Card,
            _ => RowTag::Other,
        }
    }
}

/// Accumulates rows into a model. Repeated metadata rows overwrite earlier
/// ones; cards append.
#[derive(Default)]
struct ModelBuilder {
    site: SiteConfig,
    cards: Vec<Card>,
}

impl ModelBuilder {
    fn logo(&mut self, url: String) {
        self.site.logo_url = url;
    }

    fn background(&mut self, url: String) {
        self.site.background_url = url;
    }

    fn card(&mut self, card: Card) {
        self.cards.push(card);
    }

    fn ignore(&mut self, tag: &str) {
        debug!(tag, "ignoring row with unrecognized tag");
    }

    fn finish(self) -> FeedModel {
        FeedModel {
            site: self.site,
            cards: CardCollection::new(self.cards),
        }
    }
}
