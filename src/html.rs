//! Static kiosk page: the HTML rendering target.
//!
//! [`HtmlDocument`] implements [`RenderTarget`] by holding the state of every
//! page region; [`HtmlDocument::render`] turns that state into one
//! self-contained HTML document with inline CSS and the page script.
//!
//! ## Page Structure
//!
//! ```text
//! body[data-video-mode]
//! ├── img#logo
//! ├── main#main-content          background image
//! │   └── div#card-grid
//! │       └── div.card × N       data-* carries the card, template holds the embed
//! └── div#overlay                hidden unless a card is open
//!     ├── button#overlay-close
//!     ├── h2#overlay-title
//!     ├── div#video-surface      embed, play poster, or empty
//!     └── p#overlay-description
//! ```
//!
//! A card's embed markup is the only content emitted unescaped; it is an
//! opaque player snippet from the feed. Everything else goes through maud's
//! escaping.
//!
//! ## Runtime
//!
//! `static/kiosk.js` reproduces [`ViewRenderer`](crate::view::ViewRenderer)'s
//! overlay transitions and the gesture rule from [`gesture`](crate::gesture)
//! in the browser, reading card data from the grid.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use maud::{DOCTYPE, Markup, PreEscaped, html};
use thiserror::Error;
use tracing::info;

use crate::config::{self, KioskConfig};
use crate::view::{GridCard, OverlayView, Region, RenderTarget, VideoMode, VideoStage, ViewError};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/kiosk.js");

/// Page-wide settings that do not come from the feed.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub title: String,
    pub play_label: String,
    pub video: VideoMode,
    /// Complete stylesheet, config-generated properties included.
    pub css: String,
}

impl PageSettings {
    pub fn from_config(config: &KioskConfig) -> Self {
        let css = format!(
            "{}\n\n{}\n\n{}",
            config::generate_color_css(&config.colors),
            config::generate_theme_css(&config.theme),
            CSS_STATIC
        );
        Self {
            title: config.display.title.clone(),
            play_label: config.display.play_label.clone(),
            video: config.display.video,
            css,
        }
    }
}

/// Regions the host page provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLayout {
    regions: BTreeSet<Region>,
}

impl Default for HostLayout {
    fn default() -> Self {
        Self {
            regions: Region::ALL.into_iter().collect(),
        }
    }
}

impl HostLayout {
    pub fn without(missing: &[Region]) -> Self {
        let mut layout = Self::default();
        for region in missing {
            layout.regions.remove(region);
        }
        layout
    }

    pub fn has(&self, region: Region) -> bool {
        self.regions.contains(&region)
    }

    fn require(&self, region: Region) -> Result<(), ViewError> {
        if self.has(region) {
            Ok(())
        } else {
            Err(ViewError::MissingRegion(region))
        }
    }
}

#[derive(Debug, Clone)]
pub struct HtmlDocument {
    settings: PageSettings,
    layout: HostLayout,
    logo_url: String,
    background_url: String,
    grid: Vec<GridCard>,
    overlay: Option<OverlayView>,
}

impl HtmlDocument {
    pub fn new(settings: PageSettings, layout: HostLayout) -> Self {
        Self {
            settings,
            layout,
            logo_url: String::new(),
            background_url: String::new(),
            grid: Vec::new(),
            overlay: None,
        }
    }

    pub fn overlay(&self) -> Option<&OverlayView> {
        self.overlay.as_ref()
    }

    pub fn grid(&self) -> &[GridCard] {
        &self.grid
    }

    pub fn render(&self) -> Markup {
        let overlay_open = self.overlay.is_some();
        let video_mode = match self.settings.video {
            VideoMode::Immediate => "immediate",
            VideoMode::Deferred => "deferred",
        };

        let content = html! {
            @if self.layout.has(Region::Logo) {
                header.kiosk-header {
                    img id=(Region::Logo.id()) class="logo" src=(self.logo_url) alt=(self.settings.title);
                }
            }
            @if self.layout.has(Region::MainContent) {
                main id=(Region::MainContent.id()) class="main-content" style=(background_style(&self.background_url)) {
                    (self.grid_markup())
                }
            } @else {
                main.main-content {
                    (self.grid_markup())
                }
            }
            @if self.layout.has(Region::Overlay) {
                (self.overlay_markup())
            }
            script { (PreEscaped(JS)) }
        };

        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.settings.title) }
                    style { (PreEscaped(&self.settings.css)) }
                }
                body class=[overlay_open.then_some("no-scroll")]
                    data-video-mode=(video_mode)
                    data-play-label=(self.settings.play_label) {
                    (content)
                }
            }
        }
    }

    fn grid_markup(&self) -> Markup {
        html! {
            @if self.layout.has(Region::CardGrid) {
                div id=(Region::CardGrid.id()) class="card-grid" {
                    @for entry in &self.grid {
                        (card_markup(entry))
                    }
                }
            }
        }
    }

    fn overlay_markup(&self) -> Markup {
        let open = self.overlay.as_ref();
        let overlay_class = if open.is_some() { "overlay" } else { "overlay hidden" };
        html! {
            div id=(Region::Overlay.id()) class=(overlay_class)
                role="dialog" aria-modal="true"
                data-open-index=[open.and_then(|view| view.index)] {
                div.overlay-panel {
                    @if self.layout.has(Region::CloseControl) {
                        button id=(Region::CloseControl.id()) class="overlay-close" type="button" aria-label="Close" { "×" }
                    }
                    @if self.layout.has(Region::OverlayTitle) {
                        h2 id=(Region::OverlayTitle.id()) class="overlay-title" {
                            @if let Some(view) = open { (view.title) }
                        }
                    }
                    @if self.layout.has(Region::VideoSurface) {
                        div id=(Region::VideoSurface.id()) class="video-surface" {
                            @if let Some(view) = open {
                                (video_markup(&view.video, &self.settings.play_label))
                            }
                        }
                    }
                    @if self.layout.has(Region::OverlayDescription) {
                        p id=(Region::OverlayDescription.id()) class="overlay-description" {
                            @if let Some(view) = open { (view.description) }
                        }
                    }
                }
            }
        }
    }
}

impl RenderTarget for HtmlDocument {
    fn set_logo(&mut self, url: &str) -> Result<(), ViewError> {
        self.layout.require(Region::Logo)?;
        self.logo_url = url.to_string();
        Ok(())
    }

    fn set_background(&mut self, url: &str) -> Result<(), ViewError> {
        self.layout.require(Region::MainContent)?;
        self.background_url = url.to_string();
        Ok(())
    }

    fn render_grid(&mut self, cards: &[GridCard]) -> Result<(), ViewError> {
        self.layout.require(Region::CardGrid)?;
        self.grid = cards.to_vec();
        Ok(())
    }

    fn show_overlay(&mut self, overlay: &OverlayView) -> Result<(), ViewError> {
        self.layout.require(Region::Overlay)?;
        self.overlay = Some(overlay.clone());

        // The overlay still opens; report the first part that has nowhere to go.
        [Region::OverlayTitle, Region::VideoSurface, Region::OverlayDescription]
            .into_iter()
            .try_for_each(|region| self.layout.require(region))
    }

    fn hide_overlay(&mut self) -> Result<(), ViewError> {
        self.layout.require(Region::Overlay)?;
        self.overlay = None;
        Ok(())
    }
}

fn card_markup(entry: &GridCard) -> Markup {
    let card = &entry.card;
    html! {
        div.card role="button" tabindex="0"
            data-index=(entry.index)
            data-title=(card.title)
            data-description=(card.full_description)
            data-thumbnail=(card.thumbnail_url) {
            img src=(entry.thumbnail_url) alt=(entry.title) loading="lazy";
            div.card-content {
                div.title { (entry.title) }
                div.description { (entry.description) }
            }
            @if card.has_embed() {
                template.card-embed { (PreEscaped(&card.embed_markup)) }
            }
        }
    }
}

fn video_markup(stage: &VideoStage, play_label: &str) -> Markup {
    html! {
        @match stage {
            VideoStage::Empty => {}
            VideoStage::Poster { thumbnail_url } => {
                button.play-poster type="button" aria-label=(play_label) {
                    img src=(thumbnail_url) alt="";
                    span.play-icon {}
                }
            }
            VideoStage::Playing { embed_markup } => {
                (PreEscaped(embed_markup))
            }
        }
    }
}

/// Inline style for the background container. The URL is written as a CSS
/// string so quotes and parentheses in it cannot end the declaration.
fn background_style(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' | '\r' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    format!("background-image: url(\"{escaped}\");")
}

/// Write the page to `output_dir/index.html`.
///
/// The page is written to a temporary file first and renamed into place, so
/// a reader never sees a half-written page.
pub fn write_page(document: &HtmlDocument, output_dir: &Path) -> Result<PathBuf, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let target = output_dir.join("index.html");
    let staging = output_dir.join(".index.html.tmp");
    if let Err(err) = fs::write(&staging, document.render().into_string())
        .and_then(|()| fs::rename(&staging, &target))
    {
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }
    info!(path = %target.display(), cards = document.grid.len(), "page written");
    Ok(target)
}

// ============================================================================
// Tests
// ============================================================================
