//! mergeVideoAudio: a single scene holding the video, then the audio track,
//! then any text overlays. Subtitle overlays caption the whole movie and are
//! lifted into the top-level `elements`.

use serde_json::{Map, Value};

use crate::builders::{base_document, canvas};
use crate::elements::{process_element, process_text_element, ElementKind};
use crate::error::{EngineError, ValidationGroup};
use crate::fields::RawElement;
use crate::models::{Operation, RequestDocument, Scene};
use crate::params::MergeVideoAudioParams;
use crate::shared::{
    process_audio_elements, process_batch, process_movie_elements, process_video_elements,
    BatchContext, ElementSource,
};
use crate::validation::{ensure_valid, validate_element, validate_slot};

/// # Errors
/// [`EngineError::Validation`] if the video or audio lacks a source, or a
/// text overlay is malformed.
pub fn build_merge_video_audio(params: &MergeVideoAudioParams) -> Result<RequestDocument, EngineError> {
    let empty = Value::Object(Map::new());
    let video = params.video.as_ref().unwrap_or(&empty);
    let audio = params.audio.as_ref().unwrap_or(&empty);

    let mut media_errors = validate_slot(1, video, ElementKind::Video);
    media_errors.extend(validate_slot(2, audio, ElementKind::Audio));
    ensure_valid(ValidationGroup::Scene, media_errors)?;

    // Placement is decided below, so subtitles pass here.
    let text_errors = params
        .text_overlays
        .iter()
        .enumerate()
        .flat_map(|(i, overlay)| validate_element(i + 1, overlay, Some(ElementKind::Text), false))
        .collect();
    ensure_valid(ValidationGroup::Text, text_errors)?;

    let mut document = base_document(&params.settings, Operation::MergeVideoAudio.defaults());
    let canvas = canvas(&document);

    let (subtitles, overlays): (Vec<Value>, Vec<Value>) = params
        .text_overlays
        .iter()
        .cloned()
        .partition(is_subtitles);

    let mut elements = process_video_elements(
        std::slice::from_ref(video),
        &BatchContext::new(canvas, ElementSource::Video),
    )
    .into_elements();
    elements.extend(
        process_audio_elements(
            std::slice::from_ref(audio),
            &BatchContext::new(canvas, ElementSource::Audio),
        )
        .into_elements(),
    );
    elements.extend(
        process_batch(
            &overlays,
            &BatchContext::new(canvas, ElementSource::Overlay),
            |raw, canvas| {
                if raw.has("type") {
                    process_element(raw, canvas)
                } else {
                    process_text_element(raw, canvas)
                }
            },
        )
        .into_elements(),
    );

    let captions = process_movie_elements(
        &subtitles,
        &BatchContext::new(canvas, ElementSource::Overlay),
    )
    .into_elements();

    document.scenes = vec![Scene::new(elements)];
    document.elements = (!captions.is_empty()).then_some(captions);
    Ok(document)
}

fn is_subtitles(overlay: &Value) -> bool {
    RawElement::from_value(overlay).is_some_and(|raw| raw.kind() == Ok(ElementKind::Subtitles))
}
