//! Raw byte transport for feed sources: HTTP(S) via `reqwest`, or local files.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use super::LoadError;

/// Where a feed lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Http(Url),
    File(PathBuf),
}

impl Location {
    /// `http(s)://` and `file://` URLs are taken as URLs; anything else is a
    /// filesystem path, which keeps `C:\feeds\cards.csv` from reading as a
    /// URL with scheme `c`.
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LoadError::Network("no feed source given".into()));
        }
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Location::Http(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Location::File)
                .map_err(|()| LoadError::Network(format!("not a usable file URL: {raw}"))),
            _ => Ok(Location::File(PathBuf::from(raw))),
        }
    }

    pub(crate) fn has_json_extension(&self) -> bool {
        match self {
            Location::Http(url) => url.path().to_ascii_lowercase().ends_with(".json"),
            Location::File(path) => path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json")),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Http(url) => write!(f, "{url}"),
            Location::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// User agent sent when the config does not name one.
pub const DEFAULT_USER_AGENT: &str = "kiosk-cards";

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Text of a fetched feed document.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub text: String,
    /// Response `Content-Type`, when the transport has one.
    pub content_type: Option<String>,
}

impl Fetched {
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("text/html"))
    }
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(options: &FetchOptions) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    pub fn fetch(&self, location: &Location) -> Result<Fetched, LoadError> {
        match location {
            Location::Http(url) => self.fetch_http(url),
            Location::File(path) => {
                let bytes = std::fs::read(path)
                    .map_err(|e| LoadError::Network(format!("{}: {e}", path.display())))?;
                Ok(Fetched {
                    text: decode(bytes)?,
                    content_type: None,
                })
            }
        }
    }

    fn fetch_http(&self, url: &Url) -> Result<Fetched, LoadError> {
        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        debug!(%url, %status, "feed response");
        if !status.is_success() {
            return Err(LoadError::Network(format!("{url} answered {status}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes()?;
        Ok(Fetched {
            text: decode(bytes.to_vec())?,
            content_type,
        })
    }
}

/// Strict UTF-8, with a leading byte-order mark dropped.
fn decode(bytes: Vec<u8>) -> Result<String, LoadError> {
    let text = String::from_utf8(bytes)
        .map_err(|e| LoadError::Parse(format!("feed is not valid UTF-8: {e}")))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}
