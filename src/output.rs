//! CLI output formatting.
//!
//! Output is information-first: every card leads with its positional index
//! and title, with URLs and descriptions as indented context lines.
//!
//! ```text
//! Feed: https://docs.example.com/pub?output=csv (auto)
//! Logo: https://example.com/logo.png
//! Background: (none)
//! Cards (2)
//! 001 Intro
//!     Thumbnail: https://example.com/t1.png
//!     Description: Welcome to the exhibition...
//!     Video: embedded
//! 002 Outro
//!     Thumbnail: (none)
//!     Video: none
//! ```
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. [`TextTarget`]
//! is a [`RenderTarget`] that produces the same lines, so `check` goes
//! through the same renderer as `build`.

use std::path::Path;

use crate::feed::SourceRef;
use crate::view::{GridCard, OverlayView, RenderTarget, VideoStage, ViewError};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Card header: positional index + title; untitled cards show a placeholder.
fn card_header(index: usize, title: &str) -> String {
    if title.is_empty() {
        format!("{} (untitled)", format_index(index))
    } else {
        format!("{} {}", format_index(index), title)
    }
}

fn or_none(value: &str) -> &str {
    if value.is_empty() { "(none)" } else { value }
}

/// First line of `text`, truncated to `max` characters with `...` appended.
fn truncate_desc(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max && !text.contains('\n') {
        line.to_string()
    } else {
        let cut: String = line.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}

// ============================================================================
// Text rendering target
// ============================================================================

/// Renders the kiosk as plain text lines.
#[derive(Debug, Clone, Default)]
pub struct TextTarget {
    logo: String,
    background: String,
    cards: Vec<String>,
    overlay: Vec<String>,
}

impl TextTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Logo: {}", or_none(&self.logo)),
            format!("Background: {}", or_none(&self.background)),
        ];
        lines.extend(self.cards.iter().cloned());
        lines.extend(self.overlay.iter().cloned());
        lines
    }
}

impl RenderTarget for TextTarget {
    fn set_logo(&mut self, url: &str) -> Result<(), ViewError> {
        self.logo = url.to_string();
        Ok(())
    }

    fn set_background(&mut self, url: &str) -> Result<(), ViewError> {
        self.background = url.to_string();
        Ok(())
    }

    fn render_grid(&mut self, cards: &[GridCard]) -> Result<(), ViewError> {
        self.cards = format_cards(cards);
        Ok(())
    }

    fn show_overlay(&mut self, overlay: &OverlayView) -> Result<(), ViewError> {
        self.overlay = format_overlay(overlay);
        Ok(())
    }

    fn hide_overlay(&mut self) -> Result<(), ViewError> {
        self.overlay.clear();
        Ok(())
    }
}

/// Format the card inventory.
pub fn format_cards(cards: &[GridCard]) -> Vec<String> {
    let mut lines = vec![format!("Cards ({})", cards.len())];
    for entry in cards {
        lines.push(card_header(entry.index + 1, &entry.title));
        lines.push(format!("{}Thumbnail: {}", indent(1), or_none(&entry.thumbnail_url)));
        if !entry.description.is_empty() {
            lines.push(format!(
                "{}Description: {}",
                indent(1),
                truncate_desc(&entry.description, 60)
            ));
        }
        let video = if entry.card.has_embed() { "embedded" } else { "none" };
        lines.push(format!("{}Video: {}", indent(1), video));
    }
    lines
}

/// Format an open overlay.
pub fn format_overlay(overlay: &OverlayView) -> Vec<String> {
    let video = match &overlay.video {
        VideoStage::Empty => "none".to_string(),
        VideoStage::Poster { .. } => "waiting for play".to_string(),
        VideoStage::Playing { embed_markup } => format!("playing ({} bytes of embed)", embed_markup.len()),
    };
    let mut lines = vec![format!("Overlay: {}", or_none(&overlay.title))];
    if !overlay.description.is_empty() {
        lines.push(format!("{}{}", indent(1), truncate_desc(&overlay.description, 60)));
    }
    lines.push(format!("{}Video: {}", indent(1), video));
    lines
}

// ============================================================================
// Command output
// ============================================================================

/// Header naming the source a command loaded.
pub fn format_source(source: &SourceRef) -> String {
    format!("Feed: {} ({})", source.location, source.format)
}

/// Format the result of `check`: source line followed by the rendered text.
pub fn format_check_output(source: &SourceRef, target: &TextTarget) -> Vec<String> {
    let mut lines = vec![format_source(source)];
    lines.extend(target.lines());
    lines
}

pub fn print_check_output(source: &SourceRef, target: &TextTarget) {
    for line in format_check_output(source, target) {
        println!("{}", line);
    }
}

/// Format the result of `build`.
pub fn format_build_output(page: &Path, card_count: usize) -> Vec<String> {
    let noun = if card_count == 1 { "card" } else { "cards" };
    vec![format!("Generated {} ({} {})", page.display(), card_count, noun)]
}

pub fn print_build_output(page: &Path, card_count: usize) {
    for line in format_build_output(page, card_count) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedFormat;
    use crate::test_helpers::{card, card_with_embed};
    use crate::view::{DescriptionMode, ViewOptions, ViewRenderer};

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(123), "123");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn card_header_untitled() {
        assert_eq!(card_header(3, ""), "003 (untitled)");
        assert_eq!(card_header(3, "Intro"), "003 Intro");
    }

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("hello", 10), "hello");
    }

    #[test]
    fn truncate_desc_long() {
        assert_eq!(truncate_desc("hello world", 5), "hello...");
    }

    #[test]
    fn truncate_desc_multiline() {
        assert_eq!(truncate_desc("first\nsecond", 60), "first...");
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("ééééé", 2), "éé...");
    }

    #[test]
    fn text_target_lists_cards() {
        let mut intro = card_with_embed("Intro", "<iframe/>");
        intro.full_description = "Welcome".into();
        intro.thumbnail_url = "t1.png".into();
        let mut outro = card("Outro");
        outro.thumbnail_url = String::new();

        let mut view = ViewRenderer::new(TextTarget::new(), ViewOptions::default());
        view.apply_model(Default::default(), vec![intro, outro].into());
        let lines = view.target().lines();
        assert_eq!(
            lines,
            vec![
                "Logo: (none)",
                "Background: (none)",
                "Cards (2)",
                "001 Intro",
                "    Thumbnail: t1.png",
                "    Description: Welcome",
                "    Video: embedded",
                "002 Outro",
                "    Thumbnail: (none)",
                "    Video: none",
            ]
        );
    }

    #[test]
    fn text_target_shows_and_hides_overlay() {
        let c = card_with_embed("Intro", "<iframe/>");
        let mut view = ViewRenderer::new(
            TextTarget::new(),
            ViewOptions {
                description: DescriptionMode::Full,
                video: crate::view::VideoMode::Deferred,
            },
        );
        view.open_card(c.clone());
        assert!(view.target().lines().contains(&"Overlay: Intro".to_string()));
        assert!(view.target().lines().contains(&"    Video: waiting for play".to_string()));

        view.open_video(c).unwrap();
        assert!(view.target().lines().contains(&"    Video: playing (9 bytes of embed)".to_string()));

        view.close_overlay();
        assert!(!view.target().lines().iter().any(|l| l.starts_with("Overlay")));
    }

    #[test]
    fn check_output_starts_with_source() {
        let source = SourceRef::new("feed.csv", FeedFormat::Csv).unwrap();
        let lines = format_check_output(&source, &TextTarget::new());
        assert_eq!(lines[0], "Feed: feed.csv (csv)");
        assert_eq!(lines[1], "Logo: (none)");
    }

    #[test]
    fn build_output_pluralizes() {
        let page = Path::new("dist/index.html");
        assert_eq!(format_build_output(page, 1), vec!["Generated dist/index.html (1 card)"]);
        assert_eq!(format_build_output(page, 0), vec!["Generated dist/index.html (0 cards)"]);
    }
}
