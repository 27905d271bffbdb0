//! # kiosk-cards
//!
//! Builds a touch-screen kiosk page from a small published dataset: a logo,
//! a background image, and a strip of cards, each with a thumbnail, a title,
//! descriptions, and an embedded video. Tapping a card opens an overlay with
//! the full description and the video.
//!
//! # Architecture: Load, then Render
//!
//! ```text
//! 1. Load     feed (CSV / JSON)  →  FeedModel         (feed)
//! 2. Render   FeedModel          →  RenderTarget      (view → html | output)
//! ```
//!
//! The loader runs once per invocation and hands its model to the renderer by
//! value. The renderer re-renders everything from that model; there is no
//! diffing and no partial update. A failed load changes nothing.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`feed`] | Fetches the source and normalizes CSV or JSON rows into a [`model::FeedModel`] |
//! | [`model`] | `SiteConfig`, `Card`, `CardCollection`, and the single-owner `AppState` |
//! | [`view`] | `ViewRenderer`: grid rendering and the overlay state machine over a `RenderTarget` |
//! | [`html`] | Maud-rendered static page implementing `RenderTarget` |
//! | [`gesture`] | Per-gesture horizontal/vertical touch classification |
//! | [`config`] | `kiosk.toml` loading, merging over defaults, and CSS generation |
//! | [`output`] | CLI output formatting and the plain-text `RenderTarget` |
//!
//! # Design Decisions
//!
//! ## One Model, Pluggable Sources
//!
//! Spreadsheet exports and JSON feeds describe the same thing with different
//! shapes. Both go through a [`feed::SourceAdapter`] into the same model, so
//! the renderer never knows which one it was fed. Every text field defaults to
//! an empty string: downstream code has no missing-data cases.
//!
//! ## Deployment Variants Are Configuration
//!
//! Whether a card shows its short or full description, and whether the video
//! starts at once or behind a play poster, differ between kiosks. Both are
//! `[display]` settings rather than separate code paths.
//!
//! ## Swappable Render Target
//!
//! The renderer talks to a small capability set ([`view::RenderTarget`]):
//! set the logo, set the background, replace the grid, show or hide the
//! overlay. The HTML page and the text inventory used by `check` are two
//! implementations; tests use a third that records calls.
//!
//! ## Static Output
//!
//! The page is one HTML file with inline CSS and a short script. Card data
//! travels in the markup itself, so opening a card needs no network access
//! beyond the video player.

pub mod config;
pub mod feed;
pub mod gesture;
pub mod html;
pub mod model;
pub mod output;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
