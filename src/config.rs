//! Kiosk configuration.
//!
//! Loaded from `kiosk.toml`. Every key is optional: user values are merged
//! over the stock defaults table by table, so a config file only needs the
//! keys it changes. Unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! [feed]
//! source = ""              # URL or path of the feed; --source overrides
//! format = "auto"          # csv | json | auto
//! timeout_secs = 30        # HTTP timeout for the single fetch
//! user_agent = "kiosk-cards"
//!
//! [display]
//! description = "short"    # short | full: text shown on each card
//! video = "immediate"      # immediate | deferred: play surface before the embed
//! title = "Kiosk"          # page <title>
//! play_label = "Play"      # accessible label of the play surface
//!
//! [theme]
//! card_width = "18rem"
//! card_gap = "1.5rem"
//! grid_padding = "2rem"
//!
//! [colors]
//! background = "#101014"
//! text = "#f2f2f2"
//! text_muted = "#b0b0b0"
//! card = "#1c1c22"
//! overlay = "rgba(0, 0, 0, 0.85)"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::feed::{DEFAULT_USER_AGENT, FeedFormat, FetchOptions};
use crate::view::{DescriptionMode, VideoMode, ViewOptions};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KioskConfig {
    pub feed: FeedConfig,
    pub display: DisplayConfig,
    pub theme: ThemeConfig,
    pub colors: ColorConfig,
}

impl KioskConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "feed.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.display.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "display.title must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Where the feed comes from and how it is fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// URL or filesystem path. Empty means "must be given on the command line".
    pub source: String,
    pub format: FeedFormat,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: String::new(),
            format: FeedFormat::Auto,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FeedConfig {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Presentation choices that differ between kiosk deployments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub description: DescriptionMode,
    pub video: VideoMode,
    pub title: String,
    pub play_label: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            description: DescriptionMode::Short,
            video: VideoMode::Immediate,
            title: "Kiosk".to_string(),
            play_label: "Play".to_string(),
        }
    }
}

impl DisplayConfig {
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            description: self.description,
            video: self.video,
        }
    }
}

/// Grid layout sizes (CSS values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub card_width: String,
    pub card_gap: String,
    pub grid_padding: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            card_width: "18rem".to_string(),
            card_gap: "1.5rem".to_string(),
            grid_padding: "2rem".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    pub text: String,
    /// Card descriptions and secondary text.
    pub text_muted: String,
    pub card: String,
    /// Backdrop behind the open overlay.
    pub overlay: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#101014".to_string(),
            text: "#f2f2f2".to_string(),
            text_muted: "#b0b0b0".to_string(),
            card: "#1c1c22".to_string(),
            overlay: "rgba(0, 0, 0, 0.85)".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(KioskConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<KioskConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: KioskConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `kiosk.toml` file.
///
/// A missing file yields the stock defaults; a file that exists but does
/// not parse or validate is an error.
pub fn load_config(path: &Path) -> Result<KioskConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `kiosk.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# kiosk-cards configuration
# =========================
# All settings are optional. Values shown are the defaults.
# Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Feed source
# ---------------------------------------------------------------------------
[feed]
# URL (http, https, file) or filesystem path of the feed.
# A published spreadsheet CSV export or a JSON array of rows.
# Can be left empty and given with --source instead.
source = ""

# csv | json | auto. "auto" reads JSON when the server says so or the
# location ends in .json, and CSV otherwise.
format = "auto"

# Seconds before the fetch gives up. There is no retry.
timeout_secs = 30

user_agent = "kiosk-cards"

# ---------------------------------------------------------------------------
# Display
# ---------------------------------------------------------------------------
[display]
# Text on each card: "short" uses the short description and falls back to
# the full one; "full" always shows the full description.
description = "short"

# "immediate" starts the video as soon as a card opens; "deferred" shows the
# card thumbnail as a play button first.
video = "immediate"

# Page title.
title = "Kiosk"

# Accessible label of the deferred play button.
play_label = "Play"

# ---------------------------------------------------------------------------
# Theme / layout
# ---------------------------------------------------------------------------
[theme]
card_width = "18rem"
card_gap = "1.5rem"
grid_padding = "2rem"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#101014"
text = "#f2f2f2"
text_muted = "#b0b0b0"
card = "#1c1c22"
overlay = "rgba(0, 0, 0, 0.85)"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-card: {card};
    --color-overlay: {overlay};
}}"#,
        background = colors.background,
        text = colors.text,
        text_muted = colors.text_muted,
        card = colors.card,
        overlay = colors.overlay,
    )
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --card-width: {card_width};
    --card-gap: {card_gap};
    --grid-padding: {grid_padding};
}}"#,
        card_width = theme.card_width,
        card_gap = theme.card_gap,
        grid_padding = theme.grid_padding,
    )
}
