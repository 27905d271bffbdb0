//! View rendering: card grid plus the overlay state machine.
//!
//! [`ViewRenderer`] owns the overlay state and drives a [`RenderTarget`]. The
//! target is only a set of display capabilities; everything that decides
//! *what* is shown (which description a card gets, whether the video plays at
//! once or behind a play surface, what closing resets) lives here.
//!
//! ## Overlay states
//!
//! ```text
//!            open_card                open_video
//! Closed ─────────────▶ Open(card) ─────────────▶ VideoOpen(card)
//!    ▲                      │                            │
//!    └──── close_overlay ───┴────────────────────────────┘
//! ```
//!
//! Target errors such as a missing page region are logged and skipped; one
//! absent region never stops the rest of the page from rendering.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Card, CardCollection, SiteConfig};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("page has no {0} region")]
    MissingRegion(Region),
    #[error("card \"{title}\" has no video to play")]
    MissingEmbed { title: String },
    #[error("no card at position {0}")]
    UnknownCard(usize),
}

/// Named areas of the host page the renderer writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Logo,
    MainContent,
    CardGrid,
    Overlay,
    OverlayTitle,
    OverlayDescription,
    VideoSurface,
    CloseControl,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Region::Logo,
        Region::MainContent,
        Region::CardGrid,
        Region::Overlay,
        Region::OverlayTitle,
        Region::OverlayDescription,
        Region::VideoSurface,
        Region::CloseControl,
    ];

    /// Element id of the region in the generated page.
    pub fn id(self) -> &'static str {
        match self {
            Region::Logo => "logo",
            Region::MainContent => "main-content",
            Region::CardGrid => "card-grid",
            Region::Overlay => "overlay",
            Region::OverlayTitle => "overlay-title",
            Region::OverlayDescription => "overlay-description",
            Region::VideoSurface => "video-surface",
            Region::CloseControl => "overlay-close",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Which description a grid card shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionMode {
    /// Short description, or the full one when the feed has no short text.
    #[default]
    Short,
    Full,
}

/// How the overlay presents a card's video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoMode {
    /// Embed is injected as soon as the overlay opens.
    #[default]
    Immediate,
    /// Overlay first shows the card thumbnail as a play surface.
    Deferred,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub description: DescriptionMode,
    pub video: VideoMode,
}

/// One grid entry. Carries its own copy of the card, so a click needs
/// nothing from the renderer's collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCard {
    pub index: usize,
    pub title: String,
    pub thumbnail_url: String,
    /// Text shown on the card face, already picked by [`DescriptionMode`].
    pub description: String,
    pub card: Card,
}

impl GridCard {
    fn new(index: usize, card: &Card, mode: DescriptionMode) -> Self {
        let description = match mode {
            DescriptionMode::Short if !card.short_description.is_empty() => &card.short_description,
            DescriptionMode::Short | DescriptionMode::Full => &card.full_description,
        };
        Self {
            index,
            title: card.title.clone(),
            thumbnail_url: card.thumbnail_url.clone(),
            description: description.clone(),
            card: card.clone(),
        }
    }
}

/// What the video surface holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoStage {
    Empty,
    /// Deferred mode: thumbnail shown, embed held back until play.
    Poster { thumbnail_url: String },
    Playing { embed_markup: String },
}

/// Content of an open overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    /// Grid position of the card, when it is one of the applied cards.
    pub index: Option<usize>,
    pub title: String,
    pub description: String,
    pub video: VideoStage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Closed,
    Open(Card),
    VideoOpen(Card),
}

impl OverlayState {
    pub fn card(&self) -> Option<&Card> {
        match self {
            OverlayState::Closed => None,
            OverlayState::Open(card) | OverlayState::VideoOpen(card) => Some(card),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, OverlayState::Closed)
    }
}

/// Display capabilities of a rendering target.
///
/// `render_grid` replaces the whole grid. `show_overlay` makes the overlay
/// visible and locks page scroll; `hide_overlay` empties the video surface,
/// hides the overlay and restores scroll.
pub trait RenderTarget {
    fn set_logo(&mut self, url: &str) -> Result<(), ViewError>;
    fn set_background(&mut self, url: &str) -> Result<(), ViewError>;
    fn render_grid(&mut self, cards: &[GridCard]) -> Result<(), ViewError>;
    fn show_overlay(&mut self, overlay: &OverlayView) -> Result<(), ViewError>;
    fn hide_overlay(&mut self) -> Result<(), ViewError>;
}

pub struct ViewRenderer<T> {
    target: T,
    options: ViewOptions,
    cards: CardCollection,
    overlay: OverlayState,
    open_index: Option<usize>,
}

impl<T: RenderTarget> ViewRenderer<T> {
    pub fn new(target: T, options: ViewOptions) -> Self {
        Self {
            target,
            options,
            cards: CardCollection::default(),
            overlay: OverlayState::Closed,
            open_index: None,
        }
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn cards(&self) -> &CardCollection {
        &self.cards
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    /// Full re-render of logo, background and grid. The overlay is left as is.
    pub fn apply_model(&mut self, site: SiteConfig, cards: CardCollection) {
        debug!(cards = cards.len(), "applying model");
        report(self.target.set_logo(&site.logo_url));
        report(self.target.set_background(&site.background_url));

        let grid: Vec<GridCard> = cards
            .iter()
            .enumerate()
            .map(|(index, card)| GridCard::new(index, card, self.options.description))
            .collect();
        report(self.target.render_grid(&grid));
        self.cards = cards;
    }

    /// Opens `card`. Its grid position is the first applied card equal to it;
    /// use [`open_card_at`](Self::open_card_at) when the position is known.
    pub fn open_card(&mut self, card: Card) {
        let index = self.position_of(&card);
        self.open_at(card, index);
    }

    /// Opens the card at a grid position, as a click on that grid entry does.
    pub fn open_card_at(&mut self, index: usize) -> Result<(), ViewError> {
        let card = self.cards.get(index).cloned().ok_or(ViewError::UnknownCard(index))?;
        self.open_at(card, Some(index));
        Ok(())
    }

    fn open_at(&mut self, card: Card, index: Option<usize>) {
        debug!(title = %card.title, ?index, "opening card");
        let video = match self.options.video {
            _ if !card.has_embed() => VideoStage::Empty,
            VideoMode::Immediate => VideoStage::Playing {
                embed_markup: card.embed_markup.clone(),
            },
            VideoMode::Deferred => VideoStage::Poster {
                thumbnail_url: card.thumbnail_url.clone(),
            },
        };
        report(self.target.show_overlay(&overlay_view(&card, index, video)));
        self.overlay = OverlayState::Open(card);
        self.open_index = index;
    }

    /// Injects the card's embed into the video surface.
    ///
    /// Opens the card first when the overlay shows something else. A card
    /// whose embed is already playing is left alone so the media does not
    /// restart.
    pub fn open_video(&mut self, card: Card) -> Result<(), ViewError> {
        if !card.has_embed() {
            let err = ViewError::MissingEmbed { title: card.title };
            warn!("{err}");
            return Err(err);
        }

        let already_playing = match &self.overlay {
            OverlayState::VideoOpen(open) => *open == card,
            OverlayState::Open(open) => *open == card && self.options.video == VideoMode::Immediate,
            OverlayState::Closed => false,
        };
        // Same card keeps the position it was opened at.
        let index = match self.overlay.card() {
            Some(open) if *open == card => self.open_index,
            _ => self.position_of(&card),
        };
        if !already_playing {
            let video = VideoStage::Playing {
                embed_markup: card.embed_markup.clone(),
            };
            report(self.target.show_overlay(&overlay_view(&card, index, video)));
        }
        self.overlay = OverlayState::VideoOpen(card);
        self.open_index = index;
        Ok(())
    }

    /// Closes the overlay from any state. No-op when already closed.
    pub fn close_overlay(&mut self) {
        if !self.overlay.is_open() {
            return;
        }
        debug!("closing overlay");
        report(self.target.hide_overlay());
        self.overlay = OverlayState::Closed;
        self.open_index = None;
    }

    /// Grid position of the open card, if it came from the applied cards.
    pub fn open_index(&self) -> Option<usize> {
        self.open_index
    }

    fn position_of(&self, card: &Card) -> Option<usize> {
        self.cards.iter().position(|c| c == card)
    }
}

fn overlay_view(card: &Card, index: Option<usize>, video: VideoStage) -> OverlayView {
    OverlayView {
        index,
        title: card.title.clone(),
        description: card.full_description.clone(),
        video,
    }
}

fn report(result: Result<(), ViewError>) {
    if let Err(err) = result {
        warn!("{err}; skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{RecordingTarget, TargetCall, card, card_with_embed, find_grid_card, site};

    fn renderer(options: ViewOptions) -> ViewRenderer<RecordingTarget> {
        ViewRenderer::new(RecordingTarget::default(), options)
    }

    fn deferred() -> ViewOptions {
        ViewOptions {
            video: VideoMode::Deferred,
            ..Default::default()
        }
    }

    #[test]
    fn apply_model_sets_images_and_grid() {
        let mut view = renderer(ViewOptions::default());
        view.apply_model(site("logo.png", "bg.jpg"), vec![card("a"), card("b")].into());

        let target = view.target();
        assert_eq!(target.logo.as_deref(), Some("logo.png"));
        assert_eq!(target.background.as_deref(), Some("bg.jpg"));
        let titles: Vec<&str> = target.grid.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["a", "b"]);
        assert_eq!(target.grid[1].index, 1);
    }

    #[test]
    fn apply_model_twice_does_not_accumulate() {
        let mut view = renderer(ViewOptions::default());
        let cards: CardCollection = vec![card("a"), card("b"), card("c")].into();
        view.apply_model(site("l", "b"), cards.clone());
        let first = view.target().grid.clone();
        view.apply_model(site("l", "b"), cards);
        assert_eq!(view.target().grid, first);
        assert_eq!(view.target().grid.len(), 3);
    }

    #[test]
    fn empty_urls_are_passed_through() {
        let mut view = renderer(ViewOptions::default());
        view.apply_model(SiteConfig::default(), CardCollection::default());
        assert_eq!(view.target().logo.as_deref(), Some(""));
        assert_eq!(view.target().background.as_deref(), Some(""));
        assert!(view.target().grid.is_empty());
    }

    #[test]
    fn short_mode_falls_back_to_full_description() {
        let mut with_short = card("a");
        with_short.short_description = "teaser".into();
        with_short.full_description = "long".into();
        let mut without_short = card("b");
        without_short.full_description = "only long".into();

        let mut view = renderer(ViewOptions::default());
        view.apply_model(SiteConfig::default(), vec![with_short.clone(), without_short.clone()].into());
        assert_eq!(find_grid_card(&view.target().grid, "a").description, "teaser");
        assert_eq!(find_grid_card(&view.target().grid, "b").description, "only long");

        let mut view = renderer(ViewOptions {
            description: DescriptionMode::Full,
            ..Default::default()
        });
        view.apply_model(SiteConfig::default(), vec![with_short, without_short].into());
        assert_eq!(find_grid_card(&view.target().grid, "a").description, "long");
    }

    #[test]
    fn open_card_immediate_injects_embed() {
        let mut view = renderer(ViewOptions::default());
        let c = card_with_embed("Intro", "<iframe/>");
        view.open_card(c.clone());

        assert_eq!(view.overlay(), &OverlayState::Open(c.clone()));
        let shown = view.target().overlay.as_ref().unwrap();
        assert_eq!(shown.title, "Intro");
        assert_eq!(shown.description, c.full_description);
        assert_eq!(
            shown.video,
            VideoStage::Playing {
                embed_markup: "<iframe/>".into()
            }
        );
    }

    #[test]
    fn open_card_deferred_shows_poster() {
        let mut view = renderer(deferred());
        let c = card_with_embed("Intro", "<iframe/>");
        view.open_card(c.clone());
        assert_eq!(
            view.target().overlay.as_ref().unwrap().video,
            VideoStage::Poster {
                thumbnail_url: c.thumbnail_url.clone()
            }
        );

        view.open_video(c.clone()).unwrap();
        assert_eq!(view.overlay(), &OverlayState::VideoOpen(c));
        assert_eq!(
            view.target().overlay.as_ref().unwrap().video,
            VideoStage::Playing {
                embed_markup: "<iframe/>".into()
            }
        );
    }

    #[test]
    fn open_card_without_embed_has_empty_surface() {
        let mut view = renderer(deferred());
        view.open_card(card("Quiet"));
        assert_eq!(view.target().overlay.as_ref().unwrap().video, VideoStage::Empty);
    }

    #[test]
    fn open_video_without_embed_is_reported() {
        let mut view = renderer(deferred());
        let c = card("Quiet");
        view.open_card(c.clone());
        let err = view.open_video(c.clone()).unwrap_err();
        assert_eq!(err, ViewError::MissingEmbed { title: "Quiet".into() });
        assert_eq!(view.overlay(), &OverlayState::Open(c));
    }

    #[test]
    fn open_video_in_immediate_mode_does_not_restart() {
        let mut view = renderer(ViewOptions::default());
        let c = card_with_embed("Intro", "<iframe/>");
        view.open_card(c.clone());
        let calls_before = view.target().calls.len();
        view.open_video(c.clone()).unwrap();
        assert_eq!(view.target().calls.len(), calls_before);
        assert_eq!(view.overlay(), &OverlayState::VideoOpen(c));
    }

    #[test]
    fn open_video_from_closed_opens_card() {
        let mut view = renderer(deferred());
        let c = card_with_embed("Intro", "<iframe/>");
        view.open_video(c.clone()).unwrap();
        assert_eq!(view.overlay(), &OverlayState::VideoOpen(c));
        assert!(view.target().overlay.is_some());
    }

    #[test]
    fn close_overlay_resets_and_is_idempotent() {
        let mut view = renderer(ViewOptions::default());
        view.open_card(card_with_embed("Intro", "<iframe/>"));
        view.close_overlay();
        assert_eq!(view.overlay(), &OverlayState::Closed);
        assert!(view.target().overlay.is_none());

        let calls = view.target().calls.len();
        view.close_overlay();
        assert_eq!(view.target().calls.len(), calls);
        assert_eq!(view.overlay(), &OverlayState::Closed);
    }

    #[test]
    fn close_on_fresh_renderer_is_noop() {
        let mut view = renderer(ViewOptions::default());
        view.close_overlay();
        assert!(view.target().calls.is_empty());
    }

    #[test]
    fn open_card_at_uses_applied_cards() {
        let mut view = renderer(ViewOptions::default());
        view.apply_model(SiteConfig::default(), vec![card("a"), card("b")].into());
        view.open_card_at(1).unwrap();
        assert_eq!(view.overlay().card().map(|c| c.title.as_str()), Some("b"));
        assert_eq!(view.open_card_at(5), Err(ViewError::UnknownCard(5)));
    }

    #[test]
    fn open_index_tracks_grid_position_of_identical_text() {
        let first = card_with_embed("Tour", "<iframe src=\"part1\"></iframe>");
        let second = card_with_embed("Tour", "<iframe src=\"part2\"></iframe>");
        let mut view = renderer(deferred());
        view.apply_model(SiteConfig::default(), vec![first, second.clone()].into());

        view.open_card_at(1).unwrap();
        assert_eq!(view.open_index(), Some(1));
        assert_eq!(view.target().overlay.as_ref().unwrap().index, Some(1));

        view.open_video(second).unwrap();
        assert_eq!(view.target().overlay.as_ref().unwrap().index, Some(1));

        view.close_overlay();
        assert_eq!(view.open_index(), None);

        view.open_card(card("elsewhere"));
        assert_eq!(view.target().overlay.as_ref().unwrap().index, None);
    }

    #[test]
    fn missing_region_does_not_stop_render() {
        let mut view = ViewRenderer::new(
            RecordingTarget::without(&[Region::Logo]),
            ViewOptions::default(),
        );
        view.apply_model(site("logo.png", "bg.jpg"), vec![card("a")].into());
        assert!(view.target().logo.is_none());
        assert_eq!(view.target().background.as_deref(), Some("bg.jpg"));
        assert_eq!(view.target().grid.len(), 1);
        assert!(view.target().calls.contains(&TargetCall::RenderGrid(1)));
    }

    #[test]
    fn region_ids_are_unique() {
        let mut ids: Vec<&str> = Region::ALL.iter().map(|r| r.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Region::ALL.len());
    }
}
