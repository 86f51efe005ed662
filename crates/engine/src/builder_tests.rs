//! Request-body tests across every operation, driven through the same
//! parameter source the node uses.

use serde_json::{json, Value};

use nodes::JsonParameters;

use crate::error::{EngineError, ValidationGroup};
use crate::models::Operation;
use crate::request::build_request_body;

fn body(params: Value, operation: Operation, advanced: bool) -> Result<Value, EngineError> {
    let source = JsonParameters::single(params);
    build_request_body(&source, operation, 0, advanced)?.to_value()
}

fn validation_error(result: Result<Value, EngineError>) -> (ValidationGroup, Vec<String>) {
    match result {
        Err(EngineError::Validation { group, messages }) => (group, messages),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

// ============================================================
// createMovie
// ============================================================

#[test]
fn create_movie_keeps_movie_and_scene_element_counts() {
    let doc = body(
        json!({
            "movieElements": { "elementValues": [
                { "type": "audio", "src": "music.mp3" },
                { "type": "subtitles", "language": "en" }
            ]},
            "sceneElements": { "elementValues": [
                { "type": "image", "src": "a.jpg" },
                { "type": "text", "text": "Hello" },
                { "type": "voice", "text": "Welcome" }
            ]}
        }),
        Operation::CreateMovie,
        false,
    )
    .unwrap();

    assert_eq!(doc["elements"].as_array().unwrap().len(), 2);
    assert_eq!(doc["scenes"].as_array().unwrap().len(), 1);
    assert_eq!(doc["scenes"][0]["elements"].as_array().unwrap().len(), 3);
    assert_eq!(doc["width"], 1920);
    assert_eq!(doc["height"], 1080);
    assert_eq!(doc["fps"], 25);
}

#[test]
fn create_movie_duration_values_survive_serialization() {
    let doc = body(
        json!({
            "sceneElements": { "elementValues": [
                { "type": "image", "src": "a.jpg", "duration": -2 },
                { "type": "image", "src": "b.jpg", "duration": -1 },
                { "type": "image", "src": "c.jpg", "duration": 0 },
                { "type": "image", "src": "d.jpg", "duration": 5.5 },
                { "type": "image", "src": "e.jpg", "duration": "later" }
            ]}
        }),
        Operation::CreateMovie,
        false,
    )
    .unwrap();

    let elements = &doc["scenes"][0]["elements"];
    assert_eq!(elements[0]["duration"], json!(-2));
    assert_eq!(elements[1]["duration"], json!(-1));
    assert_eq!(elements[2]["duration"], json!(0));
    assert_eq!(elements[3]["duration"], json!(5.5));
    assert!(elements[4].get("duration").is_none());
}

#[test]
fn create_movie_drops_only_the_element_that_fails_to_process() {
    let doc = body(
        json!({
            "sceneElements": { "elementValues": [
                { "type": "image", "src": "a.jpg" },
                { "type": "component", "component": "basic/001", "settings": "{not json" },
                { "type": "text", "text": "still here" }
            ]}
        }),
        Operation::CreateMovie,
        false,
    )
    .unwrap();

    let elements = doc["scenes"][0]["elements"].as_array().unwrap();
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0]["type"], "image");
    assert_eq!(elements[1]["type"], "text");
}

#[test]
fn create_movie_turns_each_image_into_a_scene() {
    let doc = body(
        json!({
            "images": "a.jpg, b.jpg",
            "imageDuration": 3,
            "sceneBackgroundColor": "#000000"
        }),
        Operation::CreateMovie,
        false,
    )
    .unwrap();

    let scenes = doc["scenes"].as_array().unwrap();
    assert_eq!(scenes.len(), 3);
    assert_eq!(scenes[0]["elements"], json!([]));
    assert_eq!(scenes[1]["elements"][0]["src"], "a.jpg");
    assert_eq!(scenes[2]["elements"][0]["src"], "b.jpg");
    assert_eq!(scenes[2]["elements"][0]["duration"], 3);
    assert_eq!(scenes[2]["background-color"], "#000000");
    assert_eq!(doc["elements"], json!([]));
}

#[test]
fn create_movie_slides_follow_the_scene_element_scene() {
    let doc = body(
        json!({
            "sceneElements": { "elementValues": [{ "type": "text", "text": "Title" }] },
            "images": ["a.jpg"]
        }),
        Operation::CreateMovie,
        false,
    )
    .unwrap();

    let scenes = doc["scenes"].as_array().unwrap();
    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0]["elements"].as_array().unwrap().len(), 1);
    assert_eq!(scenes[0]["elements"][0]["type"], "text");
    assert_eq!(scenes[1]["elements"][0]["type"], "image");
}

#[test]
fn create_movie_rejects_malformed_scene_elements_before_movie_elements() {
    let (group, messages) = validation_error(body(
        json!({
            "sceneElements": { "elementValues": [
                { "type": "text", "text": "" },
                { "type": "subtitles" }
            ]},
            "movieElements": { "elementValues": [{ "src": "no-type.mp3" }] }
        }),
        Operation::CreateMovie,
        false,
    ));

    assert_eq!(group, ValidationGroup::Scene);
    assert_eq!(
        messages,
        vec![
            "Element 1 (text): Text is required".to_owned(),
            "Element 2 (subtitles): subtitles elements are not allowed in a scene".to_owned(),
        ]
    );
}

#[test]
fn create_movie_reports_movie_element_errors_under_their_own_group() {
    let err = body(
        json!({ "movieElements": { "elementValues": [{ "src": "no-type.mp3" }] } }),
        Operation::CreateMovie,
        false,
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Movie element validation errors: Element 1: type is required"
    );
}

#[test]
fn basic_settings_and_webhook_reach_the_document() {
    let doc = body(
        json!({
            "recordId": "rec-7",
            "webhookUrl": "https://hooks.example/done",
            "output_width": 1280,
            "output_height": "720",
            "framerate": 30,
            "quality": "high",
            "draft": true
        }),
        Operation::CreateMovie,
        false,
    )
    .unwrap();

    assert_eq!(doc["id"], "rec-7");
    assert_eq!(doc["width"], 1280);
    assert_eq!(doc["height"], 720);
    assert_eq!(doc["fps"], 30);
    assert_eq!(doc["quality"], "high");
    assert_eq!(doc["draft"], true);
    assert_eq!(
        doc["exports"],
        json!([{ "type": "webhook", "webhook": "https://hooks.example/done" }])
    );
}

// ============================================================
// mergeVideoAudio
// ============================================================

#[test]
fn merge_video_audio_orders_video_audio_then_overlays() {
    let doc = body(
        json!({
            "videoElement": { "videoDetails": { "src": "clip.mp4", "muted": true } },
            "audioElement": { "audioDetails": { "src": "voice.mp3", "volume": 2 } },
            "textElements": { "textDetails": [{ "text": "Caption", "fontColor": "#FFFFFF" }] }
        }),
        Operation::MergeVideoAudio,
        false,
    )
    .unwrap();

    let scenes = doc["scenes"].as_array().unwrap();
    assert_eq!(scenes.len(), 1);
    let kinds: Vec<&str> = scenes[0]["elements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["video", "audio", "text"]);
    assert_eq!(scenes[0]["elements"][0]["muted"], true);
    assert_eq!(scenes[0]["elements"][1]["volume"], 2);
    assert!(doc.get("elements").is_none());
}

#[test]
fn merge_video_audio_lifts_subtitle_overlays_to_movie_level() {
    let doc = body(
        json!({
            "videoElement": { "videoDetails": { "src": "clip.mp4" } },
            "audioElement": { "audioDetails": { "src": "voice.mp3" } },
            "textElements": { "textDetails": [
                { "type": "subtitles", "language": "en" },
                { "text": "Caption" }
            ]}
        }),
        Operation::MergeVideoAudio,
        false,
    )
    .unwrap();

    let kinds: Vec<&str> = doc["scenes"][0]["elements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["video", "audio", "text"]);
    assert_eq!(doc["elements"].as_array().unwrap().len(), 1);
    assert_eq!(doc["elements"][0]["type"], "subtitles");
    assert_eq!(doc["elements"][0]["language"], "en");
}

#[test]
fn media_slots_are_checked_as_their_slot_kind() {
    let doc = body(
        json!({
            "videoElement": { "videoDetails": { "type": "image", "src": "clip.mp4" } },
            "audioElement": { "audioDetails": { "src": "voice.mp3" } }
        }),
        Operation::MergeVideoAudio,
        false,
    )
    .unwrap();
    assert_eq!(doc["scenes"][0]["elements"][0]["type"], "video");

    let err = body(
        json!({ "videoElements": { "videoDetails": [{ "type": "image", "prompt": "a cat" }] } }),
        Operation::MergeVideos,
        false,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Scene element validation errors: Element 1 (video): src is required"
    );
}

#[test]
fn merge_video_audio_requires_both_sources() {
    let (group, messages) = validation_error(body(
        json!({ "videoElement": { "videoDetails": { "src": "clip.mp4" } } }),
        Operation::MergeVideoAudio,
        false,
    ));
    assert_eq!(group, ValidationGroup::Scene);
    assert_eq!(messages, vec!["Element 2 (audio): src is required".to_owned()]);
}

#[test]
fn merge_video_audio_text_overlay_errors_use_text_group() {
    let err = body(
        json!({
            "videoElement": { "videoDetails": { "src": "clip.mp4" } },
            "audioElement": { "audioDetails": { "src": "voice.mp3" } },
            "textElements": { "textDetails": [{ "text": "   ", "fontColor": "white" }] }
        }),
        Operation::MergeVideoAudio,
        false,
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Text element validation errors: Element 1 (text): Text is required, \
         Element 1 (text): Font color must be a valid hex color (#RRGGBB)"
    );
}

// ============================================================
// mergeVideos
// ============================================================

#[test]
fn merge_videos_attaches_transitions_to_the_entering_scene() {
    let doc = body(
        json!({
            "videoElements": { "videoDetails": [
                { "src": "a.mp4", "transition_style": "wipe" },
                { "src": "b.mp4", "transition_style": "fade", "transition_duration": 2 },
                { "src": "c.mp4", "transition_style": "" }
            ]}
        }),
        Operation::MergeVideos,
        false,
    )
    .unwrap();

    let scenes = doc["scenes"].as_array().unwrap();
    assert_eq!(scenes.len(), 3);
    assert!(scenes[0].get("transition").is_none());
    assert_eq!(scenes[1]["transition"], json!({ "style": "fade", "duration": 2 }));
    assert!(scenes[2].get("transition").is_none());
    assert_eq!(scenes[2]["elements"][0]["src"], "c.mp4");
    assert_eq!(doc["fps"], 30);
}

#[test]
fn merge_videos_with_no_sources_still_sets_output_fields() {
    let doc = body(
        json!({ "output_width": 1280 }),
        Operation::MergeVideos,
        false,
    )
    .unwrap();

    assert_eq!(doc["scenes"], json!([]));
    assert_eq!(doc["width"], 1280);
    assert_eq!(doc["height"], 1080);
    assert_eq!(doc["fps"], 30);
}

#[test]
fn merge_videos_routes_overlays_by_scene_index() {
    let doc = body(
        json!({
            "videoElements": { "videoDetails": [{ "src": "a.mp4" }, { "src": "b.mp4" }] },
            "sceneOverlays": { "overlayValues": [
                { "text": "first" },
                { "text": "second", "sceneIndex": 1 },
                { "text": "lost", "sceneIndex": 5 }
            ]}
        }),
        Operation::MergeVideos,
        false,
    )
    .unwrap();

    let scenes = doc["scenes"].as_array().unwrap();
    assert_eq!(scenes[0]["elements"].as_array().unwrap().len(), 2);
    assert_eq!(scenes[0]["elements"][1]["text"], "first");
    assert_eq!(scenes[1]["elements"].as_array().unwrap().len(), 2);
    assert_eq!(scenes[1]["elements"][1]["text"], "second");
}

#[test]
fn merge_videos_requires_a_source_per_video() {
    let err = body(
        json!({ "videoElements": { "videoDetails": [{ "src": "a.mp4" }, { "muted": true }] } }),
        Operation::MergeVideos,
        false,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Scene element validation errors: Element 2 (video): src is required"
    );
}

// ============================================================
// Advanced mode
// ============================================================

#[test]
fn advanced_mode_adds_overrides_without_touching_structure() {
    let doc = body(
        json!({
            "jsonTemplate": r#"{"width":1280,"height":720,"elements":[]}"#,
            "recordId": "override-123"
        }),
        Operation::CreateMovie,
        true,
    )
    .unwrap();

    assert_eq!(doc["id"], "override-123");
    assert_eq!(doc["width"], 1280);
    assert_eq!(doc["height"], 720);
    assert_eq!(doc["elements"], json!([]));
    assert!(doc.get("scenes").is_none());
}

#[test]
fn advanced_mode_reads_the_template_for_its_own_operation() {
    let doc = body(
        json!({
            "jsonTemplate": r#"{"scenes":["wrong"]}"#,
            "jsonTemplateMergeVideos": r#"{"scenes":[{"elements":[]}]}"#,
            "outputWidth": 640,
            "framerate": 24
        }),
        Operation::MergeVideos,
        true,
    )
    .unwrap();

    assert_eq!(doc["scenes"], json!([{ "elements": [] }]));
    assert_eq!(doc["width"], 640);
    assert_eq!(doc["fps"], 24);
}

#[test]
fn advanced_mode_rejects_an_unparseable_template() {
    let err = body(
        json!({ "jsonTemplate": "{invalid-json}" }),
        Operation::CreateMovie,
        true,
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("Invalid JSON template:"));
}

#[test]
fn check_status_builds_no_body() {
    let err = body(json!({ "jobId": "job1" }), Operation::CheckStatus, false).unwrap_err();
    assert!(matches!(err, EngineError::NoRequestBody(_)));
}
