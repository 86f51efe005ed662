//! The request document sent to the movie-rendering API.
//!
//! A document is built fresh for every input item and discarded after the
//! call. Basic mode produces a typed [`RequestDocument`]; advanced mode
//! forwards the user's template, so [`RequestBody`] covers both.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::elements::Element;
use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    CreateMovie,
    MergeVideoAudio,
    MergeVideos,
    CheckStatus,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateMovie => "createMovie",
            Self::MergeVideoAudio => "mergeVideoAudio",
            Self::MergeVideos => "mergeVideos",
            Self::CheckStatus => "checkStatus",
        }
    }

    /// Name of the boolean field that switches this operation to advanced
    /// mode. `None` for operations without a request body.
    pub fn advanced_mode_field(self) -> Option<&'static str> {
        match self {
            Self::CreateMovie => Some("advancedMode"),
            Self::MergeVideoAudio => Some("advancedModeMergeVideoAudio"),
            Self::MergeVideos => Some("advancedModeMergeVideos"),
            Self::CheckStatus => None,
        }
    }

    pub fn template_field(self) -> Option<&'static str> {
        match self {
            Self::CreateMovie => Some("jsonTemplate"),
            Self::MergeVideoAudio => Some("jsonTemplateMergeVideoAudio"),
            Self::MergeVideos => Some("jsonTemplateMergeVideos"),
            Self::CheckStatus => None,
        }
    }

    /// Output size and frame rate used when the user leaves them unset.
    pub fn defaults(self) -> OutputDefaults {
        match self {
            Self::MergeVideos => OutputDefaults { width: 1920, height: 1080, fps: 30 },
            _ => OutputDefaults { width: 1920, height: 1080, fps: 25 },
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "createMovie" => Ok(Self::CreateMovie),
            "mergeVideoAudio" => Ok(Self::MergeVideoAudio),
            "mergeVideos" => Ok(Self::MergeVideos),
            "checkStatus" => Ok(Self::CheckStatus),
            other => Err(EngineError::UnsupportedOperation(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputDefaults {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

// ---------------------------------------------------------------------------
// Top-level settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Quality {
    pub fn parse(name: &str) -> Option<Self> {
        serde_json::from_value(Value::String(name.trim().to_ascii_lowercase())).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    Sd,
    Hd,
    FullHd,
    Squared,
    InstagramStory,
    InstagramFeed,
    TwitterLandscape,
    TwitterPortrait,
    Custom,
}

impl Resolution {
    pub fn parse(name: &str) -> Option<Self> {
        serde_json::from_value(Value::String(name.trim().to_ascii_lowercase())).ok()
    }
}

/// Delivery destination notified when rendering finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Export {
    Webhook { webhook: String },
}

impl Export {
    pub fn webhook(url: impl Into<String>) -> Self {
        Self::Webhook { webhook: url.into() }
    }
}

// ---------------------------------------------------------------------------
// Scenes and documents
// ---------------------------------------------------------------------------

/// How a scene enters: attached to the entering scene, not the one before.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Number>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    #[serde(rename = "background-color", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
    pub elements: Vec<Element>,
}

impl Scene {
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }
}

/// A request assembled field by field from basic-mode input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    pub scenes: Vec<Scene>,
    /// Movie-level elements; only createMovie sets this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Element>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exports: Option<Vec<Export>>,
}

/// What actually goes over the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    Document(RequestDocument),
    /// An advanced-mode template with overrides applied. Structure is the
    /// user's, taken verbatim.
    Template(Map<String, Value>),
}

impl RequestBody {
    /// # Errors
    /// Serialization failures (not expected for well-formed documents).
    pub fn to_value(&self) -> Result<Value, EngineError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operations_parse_and_reject_unknown_names() {
        assert_eq!("mergeVideos".parse::<Operation>().unwrap(), Operation::MergeVideos);
        let err = "renderPodcast".parse::<Operation>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported operation: renderPodcast");
    }

    #[test]
    fn settings_enums_use_wire_names() {
        assert_eq!(Quality::parse("very_high"), Some(Quality::VeryHigh));
        assert_eq!(Quality::parse("ultra"), None);
        assert_eq!(Resolution::parse("full-hd"), Some(Resolution::FullHd));
        assert_eq!(
            serde_json::to_value(Export::webhook("https://x")).unwrap(),
            json!({ "type": "webhook", "webhook": "https://x" })
        );
    }
}
