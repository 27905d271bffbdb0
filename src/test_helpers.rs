//! Shared test utilities: model builders and a recording render target.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut view = ViewRenderer::new(RecordingTarget::default(), ViewOptions::default());
//! view.apply_model(site("logo.png", "bg.jpg"), vec![card("Intro")].into());
//! assert_eq!(view.target().grid.len(), 1);
//! ```

use crate::model::{Card, SiteConfig};
use crate::view::{GridCard, OverlayView, Region, RenderTarget, ViewError};

// =========================================================================
// Model builders
// =========================================================================

/// A card with a title and a thumbnail derived from it; every other field empty.
pub fn card(title: &str) -> Card {
    Card {
        title: title.to_string(),
        thumbnail_url: format!("http://x/{}.png", title.to_lowercase()),
        ..Default::default()
    }
}

pub fn card_with_embed(title: &str, embed: &str) -> Card {
    Card {
        embed_markup: embed.to_string(),
        ..card(title)
    }
}

pub fn site(logo: &str, background: &str) -> SiteConfig {
    SiteConfig {
        logo_url: logo.to_string(),
        background_url: background.to_string(),
    }
}

// =========================================================================
// Recording target
// =========================================================================

/// Successful target calls, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetCall {
    SetLogo(String),
    SetBackground(String),
    /// Number of grid entries rendered.
    RenderGrid(usize),
    ShowOverlay(String),
    HideOverlay,
}

/// In-memory [`RenderTarget`] that keeps the current value of every region
/// and a log of calls. Regions listed in `missing` fail with `MissingRegion`.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub logo: Option<String>,
    pub background: Option<String>,
    pub grid: Vec<GridCard>,
    pub overlay: Option<OverlayView>,
    pub calls: Vec<TargetCall>,
    missing: Vec<Region>,
}

impl RecordingTarget {
    pub fn without(missing: &[Region]) -> Self {
        Self {
            missing: missing.to_vec(),
            ..Default::default()
        }
    }

    fn check(&self, region: Region) -> Result<(), ViewError> {
        if self.missing.contains(&region) {
            Err(ViewError::MissingRegion(region))
        } else {
            Ok(())
        }
    }
}

impl RenderTarget for RecordingTarget {
    fn set_logo(&mut self, url: &str) -> Result<(), ViewError> {
        self.check(Region::Logo)?;
        self.logo = Some(url.to_string());
        self.calls.push(TargetCall::SetLogo(url.to_string()));
        Ok(())
    }

    fn set_background(&mut self, url: &str) -> Result<(), ViewError> {
        self.check(Region::MainContent)?;
        self.background = Some(url.to_string());
        self.calls.push(TargetCall::SetBackground(url.to_string()));
        Ok(())
    }

    fn render_grid(&mut self, cards: &[GridCard]) -> Result<(), ViewError> {
        self.check(Region::CardGrid)?;
        self.grid = cards.to_vec();
        self.calls.push(TargetCall::RenderGrid(cards.len()));
        Ok(())
    }

    fn show_overlay(&mut self, overlay: &OverlayView) -> Result<(), ViewError> {
        self.check(Region::Overlay)?;
        self.overlay = Some(overlay.clone());
        self.calls.push(TargetCall::ShowOverlay(overlay.title.clone()));
        Ok(())
    }

    fn hide_overlay(&mut self) -> Result<(), ViewError> {
        self.check(Region::Overlay)?;
        self.overlay = None;
        self.calls.push(TargetCall::HideOverlay);
        Ok(())
    }
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a grid entry by title. Panics if not found.
pub fn find_grid_card<'a>(grid: &'a [GridCard], title: &str) -> &'a GridCard {
    grid.iter().find(|g| g.title == title).unwrap_or_else(|| {
        let titles: Vec<&str> = grid.iter().map(|g| g.title.as_str()).collect();
        panic!("card '{title}' not in grid. Available: {titles:?}")
    })
}
