//! Element processors.
//!
//! Each processor turns one user-declared element into the remote API's
//! element object: camelCase inputs become kebab-case keys, grouped
//! attributes (rotation, colour correction, chroma key) become nested
//! objects, and values that are non-numeric or out of the accepted domain
//! are dropped instead of forwarded.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::ElementError;
use crate::fields::{Canvas, RawElement};

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Image,
    Video,
    Audio,
    Text,
    Subtitles,
    Voice,
    Component,
    Audiogram,
    Html,
}

impl ElementKind {
    pub const ALL: [ElementKind; 9] = [
        Self::Image,
        Self::Video,
        Self::Audio,
        Self::Text,
        Self::Subtitles,
        Self::Voice,
        Self::Component,
        Self::Audiogram,
        Self::Html,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
            Self::Subtitles => "subtitles",
            Self::Voice => "voice",
            Self::Component => "component",
            Self::Audiogram => "audiogram",
            Self::Html => "html",
        }
    }

    /// Subtitles span the whole movie and cannot live inside a scene.
    pub fn allowed_in_scene(self) -> bool {
        self != Self::Subtitles
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Shared attribute groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    CenterCenter,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Custom,
}

impl Position {
    pub fn parse(name: &str) -> Option<Self> {
        serde_json::from_value(Value::String(name.trim().to_ascii_lowercase())).ok()
    }
}

/// Timing and layering, common to every element.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Timing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_time: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rotate {
    pub angle: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<Number>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Correction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChromaKey {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<Number>,
}

/// Placement and visual transforms for anything that is drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Visual {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_distance: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_crop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<Rotate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_horizontal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_vertical: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction: Option<Correction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chroma_key: Option<ChromaKey>,
}

/// Volume and mute, for anything that makes sound.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sound {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
}

/// Media playback controls for video and audio sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Playback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seek: Option<Number>,
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<Number>,
}

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImageElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(flatten)]
    pub visual: Visual,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(flatten)]
    pub playback: Playback,
    #[serde(flatten)]
    pub sound: Sound,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(flatten)]
    pub visual: Visual,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(flatten)]
    pub playback: Playback,
    #[serde(flatten)]
    pub sound: Sound,
    #[serde(flatten)]
    pub timing: Timing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextElement {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(flatten)]
    pub visual: Visual,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitlesElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub timing: Timing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceElement {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(flatten)]
    pub sound: Sound,
    #[serde(flatten)]
    pub timing: Timing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentElement {
    pub component: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(flatten)]
    pub visual: Visual,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudiogramElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<Number>,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(flatten)]
    pub visual: Visual,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HtmlElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tailwindcss: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait: Option<Number>,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(flatten)]
    pub visual: Visual,
}

/// A normalized element, serialized with its `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Image(ImageElement),
    Video(VideoElement),
    Audio(AudioElement),
    Text(TextElement),
    Subtitles(SubtitlesElement),
    Voice(VoiceElement),
    Component(ComponentElement),
    Audiogram(AudiogramElement),
    Html(HtmlElement),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Image(_) => ElementKind::Image,
            Self::Video(_) => ElementKind::Video,
            Self::Audio(_) => ElementKind::Audio,
            Self::Text(_) => ElementKind::Text,
            Self::Subtitles(_) => ElementKind::Subtitles,
            Self::Voice(_) => ElementKind::Voice,
            Self::Component(_) => ElementKind::Component,
            Self::Audiogram(_) => ElementKind::Audiogram,
            Self::Html(_) => ElementKind::Html,
        }
    }
}

// ---------------------------------------------------------------------------
// Processors
// ---------------------------------------------------------------------------

/// Dispatch on the element's `type`.
///
/// # Errors
/// Only when the discriminator is missing or unknown, or an object-valued
/// field holds unparseable JSON.
pub fn process_element(raw: &RawElement<'_>, canvas: &Canvas) -> Result<Element, ElementError> {
    match raw.kind()? {
        ElementKind::Image => Ok(process_image_element(raw, canvas)),
        ElementKind::Video => Ok(process_video_element(raw, canvas)),
        ElementKind::Audio => Ok(process_audio_element(raw)),
        ElementKind::Text => process_text_element(raw, canvas),
        ElementKind::Subtitles => process_subtitle_element(raw),
        ElementKind::Voice => Ok(process_voice_element(raw)),
        ElementKind::Component => process_component_element(raw, canvas),
        ElementKind::Audiogram => Ok(process_audiogram_element(raw, canvas)),
        ElementKind::Html => Ok(process_html_element(raw, canvas)),
    }
}

pub fn process_image_element(raw: &RawElement<'_>, canvas: &Canvas) -> Element {
    Element::Image(ImageElement {
        src: raw.string("src"),
        prompt: raw.string("prompt"),
        model: raw.string("model"),
        aspect_ratio: raw.string("aspectRatio"),
        timing: timing(raw),
        visual: visual(raw, canvas),
    })
}

pub fn process_video_element(raw: &RawElement<'_>, canvas: &Canvas) -> Element {
    Element::Video(VideoElement {
        src: raw.string("src"),
        playback: playback(raw),
        sound: sound(raw),
        timing: timing(raw),
        visual: visual(raw, canvas),
    })
}

pub fn process_audio_element(raw: &RawElement<'_>) -> Element {
    Element::Audio(AudioElement {
        src: raw.string("src"),
        playback: playback(raw),
        sound: sound(raw),
        timing: timing(raw),
    })
}

const TEXT_SETTINGS: &[(&str, &str)] = &[
    ("fontFamily", "font-family"),
    ("fontSize", "font-size"),
    ("fontWeight", "font-weight"),
    ("fontColor", "font-color"),
    ("backgroundColor", "background-color"),
    ("textAlign", "text-align"),
    ("verticalPosition", "vertical-position"),
    ("horizontalPosition", "horizontal-position"),
    ("lineHeight", "line-height"),
    ("letterSpacing", "letter-spacing"),
    ("textShadow", "text-shadow"),
    ("textDecoration", "text-decoration"),
    ("textTransform", "text-transform"),
];

const SUBTITLE_SETTINGS: &[(&str, &str)] = &[
    ("style", "style"),
    ("fontFamily", "font-family"),
    ("fontSize", "font-size"),
    ("fontColor", "font-color"),
    ("backgroundColor", "background-color"),
    ("wordColor", "word-color"),
    ("lineColor", "line-color"),
    ("boxColor", "box-color"),
    ("outlineColor", "outline-color"),
    ("outlineWidth", "outline-width"),
    ("shadowColor", "shadow-color"),
    ("shadowOffset", "shadow-offset"),
    ("position", "position"),
    ("x", "x"),
    ("y", "y"),
    ("maxWordsPerLine", "max-words-per-line"),
    ("allCaps", "all-caps"),
];

/// Text carries a style preset plus a `settings` object; user-supplied
/// font and layout keys are merged over any `settings` given verbatim.
///
/// # Errors
/// [`ElementError::InvalidObject`] if `settings` is an unparseable string.
pub fn process_text_element(raw: &RawElement<'_>, canvas: &Canvas) -> Result<Element, ElementError> {
    let settings = settings(raw, TEXT_SETTINGS)?;
    Ok(Element::Text(TextElement {
        text: raw.text("text").unwrap_or_default(),
        style: raw.string("style"),
        settings,
        timing: timing(raw),
        visual: visual(raw, canvas),
    }))
}

/// Subtitles are placed by their own settings, not by element geometry.
///
/// # Errors
/// [`ElementError::InvalidObject`] if `settings` is an unparseable string.
pub fn process_subtitle_element(raw: &RawElement<'_>) -> Result<Element, ElementError> {
    let settings = settings(raw, SUBTITLE_SETTINGS)?;
    Ok(Element::Subtitles(SubtitlesElement {
        captions: raw.string("captions"),
        language: raw.string("language"),
        model: raw.string("model"),
        settings,
        timing: timing(raw),
    }))
}

pub fn process_voice_element(raw: &RawElement<'_>) -> Element {
    Element::Voice(VoiceElement {
        text: raw.text("text").unwrap_or_default(),
        voice: raw.string("voice"),
        model: raw.string("model"),
        connection: raw.string("connection"),
        sound: sound(raw),
        timing: timing(raw),
    })
}

/// # Errors
/// [`ElementError::InvalidObject`] if `settings` is an unparseable string.
pub fn process_component_element(
    raw: &RawElement<'_>,
    canvas: &Canvas,
) -> Result<Element, ElementError> {
    let settings = raw.object("settings")?.filter(|s| !s.is_empty());
    Ok(Element::Component(ComponentElement {
        component: raw.string("component").unwrap_or_default(),
        settings,
        timing: timing(raw),
        visual: visual(raw, canvas),
    }))
}

pub fn process_audiogram_element(raw: &RawElement<'_>, canvas: &Canvas) -> Element {
    Element::Audiogram(AudiogramElement {
        color: raw.string("color"),
        opacity: in_range(raw.number("opacity"), 0.0, 1.0),
        amplitude: in_range(raw.number("amplitude"), 0.0, 10.0),
        timing: timing(raw),
        visual: visual(raw, canvas),
    })
}

pub fn process_html_element(raw: &RawElement<'_>, canvas: &Canvas) -> Element {
    Element::Html(HtmlElement {
        html: raw.text("html").filter(|h| !h.trim().is_empty()),
        src: raw.string("src"),
        tailwindcss: raw.boolean("tailwindcss"),
        wait: non_negative(raw.number("wait")),
        timing: timing(raw),
        visual: visual(raw, canvas),
    })
}

// ---------------------------------------------------------------------------
// Attribute groups
// ---------------------------------------------------------------------------

fn timing(raw: &RawElement<'_>) -> Timing {
    Timing {
        start: non_negative(raw.number("start")),
        duration: duration(raw.number("duration")),
        extra_time: non_negative(raw.number("extraTime")),
        z_index: raw.number("zIndex"),
        fade_in: non_negative(raw.number("fadeIn")),
        fade_out: non_negative(raw.number("fadeOut")),
        comment: raw.string("comment"),
        cache: raw.boolean("cache"),
        condition: raw.string("condition"),
    }
}

fn visual(raw: &RawElement<'_>, canvas: &Canvas) -> Visual {
    let x = raw.geometry("x", canvas.width);
    let y = raw.geometry("y", canvas.height);
    let position = raw
        .string("position")
        .and_then(|p| Position::parse(&p))
        .or_else(|| (x.is_some() || y.is_some()).then_some(Position::Custom));

    Visual {
        position,
        x,
        y,
        width: raw.geometry("width", canvas.width),
        height: raw.geometry("height", canvas.height),
        resize: raw.string("resize"),
        zoom: raw.number("zoom"),
        pan: raw.string("pan"),
        pan_distance: raw.number("panDistance"),
        pan_crop: raw.boolean("panCrop"),
        rotate: rotate(raw),
        flip_horizontal: raw.boolean("flipHorizontal"),
        flip_vertical: raw.boolean("flipVertical"),
        mask: raw.string("mask"),
        correction: correction(raw),
        chroma_key: chroma_key(raw),
    }
}

fn rotate(raw: &RawElement<'_>) -> Option<Rotate> {
    let angle = raw.number("rotationAngle");
    let speed = raw.number("rotationSpeed");
    if angle.is_none() && speed.is_none() {
        return None;
    }
    Some(Rotate {
        angle: angle.unwrap_or_else(|| Number::from(0)),
        speed,
    })
}

fn correction(raw: &RawElement<'_>) -> Option<Correction> {
    let correction = Correction {
        brightness: raw.number("brightness"),
        contrast: raw.number("contrast"),
        gamma: raw.number("gamma"),
        saturation: raw.number("saturation"),
    };
    (correction != Correction::default()).then_some(correction)
}

fn chroma_key(raw: &RawElement<'_>) -> Option<ChromaKey> {
    raw.string("chromaKeyColor").map(|color| ChromaKey {
        color,
        tolerance: raw.number("chromaKeyTolerance"),
    })
}

fn sound(raw: &RawElement<'_>) -> Sound {
    Sound {
        volume: in_range(raw.number("volume"), 0.0, 10.0),
        muted: raw.boolean("muted"),
    }
}

fn playback(raw: &RawElement<'_>) -> Playback {
    Playback {
        seek: non_negative(raw.number("seek")),
        loop_count: raw.number("loop"),
        speed: raw.number("speed").filter(|n| n.as_f64().is_some_and(|s| s > 0.0)),
    }
}

/// Merge an explicit `settings` object with the renamed scalar keys.
fn settings(
    raw: &RawElement<'_>,
    keys: &[(&str, &str)],
) -> Result<Option<Map<String, Value>>, ElementError> {
    let mut settings = raw.object("settings")?.unwrap_or_default();
    for (from, to) in keys {
        if let Some(value) = raw.scalar(from) {
            settings.insert((*to).to_owned(), value);
        }
    }
    Ok((!settings.is_empty()).then_some(settings))
}

/// `-1` (auto / full length) and `-2` (match container) are sentinels.
fn duration(value: Option<Number>) -> Option<Number> {
    value.filter(|n| {
        n.as_f64()
            .is_some_and(|d| d >= 0.0 || d == -1.0 || d == -2.0)
    })
}

fn non_negative(value: Option<Number>) -> Option<Number> {
    value.filter(|n| n.as_f64().is_some_and(|v| v >= 0.0))
}

fn in_range(value: Option<Number>, min: f64, max: f64) -> Option<Number> {
    value.filter(|n| n.as_f64().is_some_and(|v| (min..=max).contains(&v)))
}
