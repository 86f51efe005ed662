//! mergeVideos: one scene per video source, in input order.
//!
//! A scene after the first enters with the transition declared on its own
//! video (`transition_style` / `transition_duration`). Overlays are appended
//! to the scene named by their `sceneIndex`.

use serde_json::Value;
use tracing::warn;

use crate::builders::{base_document, canvas};
use crate::elements::{process_element, process_text_element, ElementKind};
use crate::error::{EngineError, ValidationGroup};
use crate::fields::RawElement;
use crate::models::{Operation, RequestDocument, Scene, Transition};
use crate::params::MergeVideosParams;
use crate::shared::{process_batch, process_video_elements, BatchContext, ElementSource};
use crate::validation::{ensure_valid, validate_element, validate_slot};

/// # Errors
/// [`EngineError::Validation`] if a video lacks a source or an overlay is
/// malformed.
pub fn build_merge_videos(params: &MergeVideosParams) -> Result<RequestDocument, EngineError> {
    let mut errors: Vec<String> = params
        .videos
        .iter()
        .enumerate()
        .flat_map(|(i, video)| validate_slot(i + 1, video, ElementKind::Video))
        .collect();
    errors.extend(params.overlays.iter().enumerate().flat_map(|(i, overlay)| {
        validate_element(i + 1, overlay, Some(ElementKind::Text), true)
            .into_iter()
            .map(|e| format!("Overlay {e}"))
    }));
    ensure_valid(ValidationGroup::Scene, errors)?;

    let mut document = base_document(&params.settings, Operation::MergeVideos.defaults());
    let canvas = canvas(&document);

    let mut scenes: Vec<Scene> = params
        .videos
        .iter()
        .enumerate()
        .map(|(i, video)| Scene {
            transition: if i > 0 { entering_transition(video) } else { None },
            ..Scene::default()
        })
        .collect();

    // Scenes stay positional even if their video fails to process.
    let videos = process_video_elements(
        &params.videos,
        &BatchContext::new(canvas, ElementSource::Video),
    );
    for processed in videos.elements {
        scenes[processed.index].elements.push(processed.element);
    }

    let overlays = process_batch(
        &params.overlays,
        &BatchContext::new(canvas, ElementSource::Overlay),
        |raw, canvas| {
            if raw.has("type") {
                process_element(raw, canvas)
            } else {
                process_text_element(raw, canvas)
            }
        },
    );
    let scene_count = scenes.len();
    for processed in overlays.elements {
        let target = scene_index(&params.overlays[processed.index]);
        match target.and_then(|i| scenes.get_mut(i)) {
            Some(scene) => scene.elements.push(processed.element),
            None => warn!(
                overlay = processed.index,
                scene = ?target,
                scenes = scene_count,
                "dropping overlay that targets a missing scene"
            ),
        }
    }

    document.scenes = scenes;
    Ok(document)
}

fn entering_transition(video: &Value) -> Option<Transition> {
    let raw = RawElement::from_value(video)?;
    let style = raw.string("transition_style")?;
    Some(Transition {
        style,
        duration: raw.number("transition_duration"),
    })
}

/// Absent means the first scene; a present but unusable index means none.
fn scene_index(overlay: &Value) -> Option<usize> {
    let raw = RawElement::from_value(overlay)?;
    if !raw.has("sceneIndex") {
        return Some(0);
    }
    raw.float("sceneIndex")
        .filter(|i| *i >= 0.0 && i.fract() == 0.0)
        .map(|i| i as usize)
}
