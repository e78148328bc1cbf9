//! Version extraction from game source payloads
//!
//! Both the vanilla site and the FX build embed the protocol and game versions as
//! consecutive field initializers right before a method definition. The vanilla
//! site ships compact code while the FX build ships a reformatted copy, so each
//! encoding gets its own pattern:
//!
//! - Original: `{this.a=123;this.b=1234;this.c=0;this.d=function(){`
//! - Rebuilt:  `\tthis.a = 123, this.b = 1234, this.c = 0, this.d = function() {`

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Protocol and game version codes, kept as raw digit strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionPair {
    pub protocol: String,
    pub game: String,
}

impl VersionPair {
    pub fn new(protocol: impl Into<String>, game: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            game: game.into(),
        }
    }
}

/// Known textual encodings of the version fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    /// Compact code served by the vanilla site
    Original,
    /// Reformatted code produced by the FX build step
    Rebuilt,
}

impl SourceEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceEncoding::Original => "original",
            SourceEncoding::Rebuilt => "rebuilt",
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            SourceEncoding::Original => {
                r"\{this\.\w+=(\d+);this\.\w+=([1-9]\d+);this\.\w+=\d+;this\.\w+=function\(\)\{"
            }
            SourceEncoding::Rebuilt => {
                r"\tthis\.\w+ = (\d+), this\.\w+ = ([1-9]\d+), this\.\w+ = \d+, this\.\w+ = function\(\) \{"
            }
        }
    }
}

/// A single parse attempt for one encoding
struct EncodingMatcher {
    encoding: SourceEncoding,
    regex: Regex,
}

impl EncodingMatcher {
    fn new(encoding: SourceEncoding) -> Self {
        Self {
            encoding,
            regex: Regex::new(encoding.pattern()).unwrap(),
        }
    }

    fn try_match(&self, code: &str) -> Option<VersionPair> {
        let caps = self.regex.captures(code)?;
        Some(VersionPair::new(caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }
}

/// Extracts version pairs by trying each known encoding in order
pub struct VersionExtractor {
    matchers: Vec<EncodingMatcher>,
}

impl VersionExtractor {
    pub fn new() -> Self {
        Self {
            matchers: [SourceEncoding::Original, SourceEncoding::Rebuilt]
                .into_iter()
                .map(EncodingMatcher::new)
                .collect(),
        }
    }

    /// Extract the version pair from a fetched payload
    ///
    /// `None` input means the fetch failed upstream and yields `None` directly.
    /// Text that matches no known encoding also yields `None`.
    pub fn extract(&self, raw: Option<&str>) -> Option<VersionPair> {
        let code: String = raw?.chars().filter(|c| *c != '\n' && *c != '\r').collect();

        self.matchers.iter().find_map(|matcher| {
            let pair = matcher.try_match(&code)?;
            debug!(
                "Matched {} encoding: protocol={} game={}",
                matcher.encoding.as_str(),
                pair.protocol,
                pair.game
            );
            Some(pair)
        })
    }
}

impl Default for VersionExtractor {
    fn default() -> Self {
        Self::new()
    }
}
