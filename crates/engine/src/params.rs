//! Typed view over the host's parameter accessor.
//!
//! This is the only place that tolerates the host rejecting a field name:
//! a [`FieldMissing`](nodes::FieldMissing) is logged at debug level and the
//! field reads as absent. Builders consume the plain structs resolved here.

use serde_json::{Number, Value};
use tracing::debug;

use nodes::ParameterSource;

use crate::fields::{coerce_bool, coerce_number, coerce_positive_int, coerce_string};
use crate::models::{Export, Operation, Quality, Resolution};

/// Parameter reads for one input item.
#[derive(Clone, Copy)]
pub struct Parameters<'a> {
    source: &'a dyn ParameterSource,
    item: usize,
}

impl<'a> Parameters<'a> {
    pub fn new(source: &'a dyn ParameterSource, item: usize) -> Self {
        Self { source, item }
    }

    /// The raw value, or `None` when unset, `null`, or not registered.
    pub fn value(&self, name: &str) -> Option<Value> {
        match self.source.get_node_parameter(name, self.item) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(missing) => {
                debug!(%missing, "parameter not available, using fallback");
                None
            }
        }
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.value(name).as_ref().and_then(coerce_string)
    }

    /// Text kept verbatim (templates must not be trimmed into validity).
    pub fn raw_string(&self, name: &str) -> Option<String> {
        match self.value(name)? {
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.value(name).as_ref().and_then(coerce_bool)
    }

    pub fn number(&self, name: &str) -> Option<Number> {
        self.value(name).as_ref().and_then(coerce_number)
    }

    pub fn positive_int(&self, name: &str) -> Option<u32> {
        self.value(name).as_ref().and_then(coerce_positive_int)
    }

    /// A collection field: an array yields its entries, a lone object is a
    /// one-entry list, anything else is empty.
    pub fn list(&self, name: &str) -> Vec<Value> {
        match self.value(name) {
            Some(Value::Array(entries)) => entries,
            Some(object @ Value::Object(_)) => vec![object],
            _ => Vec::new(),
        }
    }

    /// A single-entry collection field: an object, or the first array entry.
    pub fn single(&self, name: &str) -> Option<Value> {
        self.list(name).into_iter().next()
    }

    /// Comma-separated string or array of strings.
    pub fn string_list(&self, name: &str) -> Vec<String> {
        match self.value(name) {
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
            Some(Value::Array(entries)) => entries.iter().filter_map(coerce_string).collect(),
            _ => Vec::new(),
        }
    }

    pub fn quality(&self, name: &str) -> Option<Quality> {
        let raw = self.string(name)?;
        let quality = Quality::parse(&raw);
        if quality.is_none() {
            debug!(value = %raw, "ignoring unknown quality");
        }
        quality
    }

    pub fn resolution(&self, name: &str) -> Option<Resolution> {
        let raw = self.string(name)?;
        let resolution = Resolution::parse(&raw);
        if resolution.is_none() {
            debug!(value = %raw, "ignoring unknown resolution");
        }
        resolution
    }
}

// ---------------------------------------------------------------------------
// Resolved configurations
// ---------------------------------------------------------------------------

/// Top-level scalars. Every field is "present and usable" or `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputSettings {
    pub record_id: Option<String>,
    pub webhook_url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<u32>,
    pub quality: Option<Quality>,
    pub cache: Option<bool>,
    pub draft: Option<bool>,
    pub resolution: Option<Resolution>,
}

impl OutputSettings {
    /// Basic-mode output fields.
    pub fn basic(params: &Parameters<'_>) -> Self {
        Self::read(params, "output_width", "output_height")
    }

    /// Advanced-mode override scalars.
    pub fn overrides(params: &Parameters<'_>) -> Self {
        Self::read(params, "outputWidth", "outputHeight")
    }

    fn read(params: &Parameters<'_>, width: &str, height: &str) -> Self {
        Self {
            record_id: params.string("recordId"),
            webhook_url: params.string("webhookUrl"),
            width: params.positive_int(width),
            height: params.positive_int(height),
            fps: params.positive_int("framerate"),
            quality: params.quality("quality"),
            cache: params.boolean("cache"),
            draft: params.boolean("draft"),
            resolution: params.resolution("resolution"),
        }
    }

    pub fn exports(&self) -> Option<Vec<Export>> {
        self.webhook_url.as_ref().map(|url| vec![Export::webhook(url.clone())])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateMovieParams {
    pub settings: OutputSettings,
    pub movie_elements: Vec<Value>,
    pub scene_elements: Vec<Value>,
    /// Each image becomes its own scene.
    pub images: Vec<String>,
    pub image_duration: Option<Number>,
    pub scene_background: Option<String>,
}

impl CreateMovieParams {
    pub fn resolve(params: &Parameters<'_>) -> Self {
        Self {
            settings: OutputSettings::basic(params),
            movie_elements: params.list("movieElements.elementValues"),
            scene_elements: params.list("sceneElements.elementValues"),
            images: params.string_list("images"),
            image_duration: params.number("imageDuration"),
            scene_background: params.string("sceneBackgroundColor"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeVideoAudioParams {
    pub settings: OutputSettings,
    pub video: Option<Value>,
    pub audio: Option<Value>,
    pub text_overlays: Vec<Value>,
}

impl MergeVideoAudioParams {
    pub fn resolve(params: &Parameters<'_>) -> Self {
        Self {
            settings: OutputSettings::basic(params),
            video: params.single("videoElement.videoDetails"),
            audio: params.single("audioElement.audioDetails"),
            text_overlays: params.list("textElements.textDetails"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeVideosParams {
    pub settings: OutputSettings,
    pub videos: Vec<Value>,
    /// Each overlay names its scene with `sceneIndex`.
    pub overlays: Vec<Value>,
}

impl MergeVideosParams {
    pub fn resolve(params: &Parameters<'_>) -> Self {
        Self {
            settings: OutputSettings::basic(params),
            videos: params.list("videoElements.videoDetails"),
            overlays: params.list("sceneOverlays.overlayValues"),
        }
    }
}

/// Advanced-mode input: the template text plus override scalars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateParams {
    pub template: String,
    pub overrides: OutputSettings,
}

impl TemplateParams {
    pub fn resolve(params: &Parameters<'_>, operation: Operation) -> Self {
        let template = operation
            .template_field()
            .and_then(|field| params.raw_string(field))
            .unwrap_or_default();
        Self {
            template,
            overrides: OutputSettings::overrides(params),
        }
    }
}
