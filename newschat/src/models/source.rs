//! Citation attached to a bot answer.
//!
//! The service may send either a bare URL string or an object with optional
//! `url` and `title` fields. Both shapes are kept as-is so the stored blob
//! round-trips unchanged.

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Link target used when a source carries no URL.
pub const NO_URL: &str = "#";

/// A source reference in one of the accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    /// Bare URL string.
    Bare(String),
    /// Object form; either field may be missing.
    Rich {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

/// Display title and link target for a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub title: String,
    pub url: String,
}

impl Source {
    /// Shorthand for the object form.
    pub fn rich(url: Option<&str>, title: Option<&str>) -> Self {
        Self::Rich {
            url: url.map(String::from),
            title: title.map(String::from),
        }
    }

    /// Resolve the title and link for the source at `index` in its list.
    ///
    /// Bare URLs display their hostname; anything without a usable title
    /// falls back to `Source {index + 1}`, and anything without a URL links
    /// to `#`.
    pub fn resolve(&self, index: usize) -> ResolvedSource {
        ResolvedSource {
            title: self.display_title(index),
            url: self.link_url().to_string(),
        }
    }

    /// Title shown for this source.
    pub fn display_title(&self, index: usize) -> String {
        match self {
            Self::Bare(raw) => hostname(raw).unwrap_or_else(|| placeholder(index)),
            Self::Rich { title, .. } => title
                .as_deref()
                .filter(|t| !t.is_empty())
                .map_or_else(|| placeholder(index), String::from),
        }
    }

    /// Link target for this source.
    pub fn link_url(&self) -> &str {
        match self {
            Self::Bare(raw) => raw,
            Self::Rich { url, .. } => url.as_deref().filter(|u| !u.is_empty()).unwrap_or(NO_URL),
        }
    }
}

fn hostname(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(String::from)
}

fn placeholder(index: usize) -> String {
    format!("Source {}", index + 1)
}
