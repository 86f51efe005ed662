//! Per-operation request builders.
//!
//! Basic-mode builders validate first (a hard stop for the item), then
//! process elements with per-element failure isolation, then assemble the
//! document. The advanced path lives in [`template`].

pub mod create_movie;
pub mod merge_video_audio;
pub mod merge_videos;
pub mod template;

pub use create_movie::build_create_movie;
pub use merge_video_audio::build_merge_video_audio;
pub use merge_videos::build_merge_videos;
pub use template::{apply_overrides, build_from_template};

use crate::fields::Canvas;
use crate::models::{OutputDefaults, RequestDocument};
use crate::params::OutputSettings;

/// A document with top-level fields applied and no content yet.
pub(crate) fn base_document(settings: &OutputSettings, defaults: OutputDefaults) -> RequestDocument {
    RequestDocument {
        id: settings.record_id.clone(),
        fps: settings.fps.unwrap_or(defaults.fps),
        width: settings.width.unwrap_or(defaults.width),
        height: settings.height.unwrap_or(defaults.height),
        quality: settings.quality,
        cache: settings.cache,
        draft: settings.draft,
        resolution: settings.resolution,
        scenes: Vec::new(),
        elements: None,
        exports: settings.exports(),
    }
}

pub(crate) fn canvas(document: &RequestDocument) -> Canvas {
    Canvas::new(document.width, document.height)
}
