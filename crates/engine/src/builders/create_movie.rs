//! createMovie: movie-level elements plus one scene of scene-level elements,
//! optionally followed by one scene per slideshow image.
//!
//! The scene-element scene is always `scenes[0]`, even when empty, so its
//! position does not depend on whether slideshow images were given.

use serde_json::{json, Value};

use crate::builders::{base_document, canvas};
use crate::elements::process_image_element;
use crate::error::{EngineError, ValidationGroup};
use crate::models::{Operation, RequestDocument, Scene};
use crate::params::CreateMovieParams;
use crate::shared::{process_batch, process_movie_elements, BatchContext, ElementSource};
use crate::validation::{ensure_valid, validate_movie_elements, validate_scene_elements};

/// # Errors
/// [`EngineError::Validation`] if scene or movie elements are malformed.
pub fn build_create_movie(params: &CreateMovieParams) -> Result<RequestDocument, EngineError> {
    ensure_valid(
        ValidationGroup::Scene,
        validate_scene_elements(&params.scene_elements),
    )?;
    ensure_valid(
        ValidationGroup::Movie,
        validate_movie_elements(&params.movie_elements),
    )?;

    let mut document = base_document(&params.settings, Operation::CreateMovie.defaults());
    let canvas = canvas(&document);

    let movie = process_movie_elements(
        &params.movie_elements,
        &BatchContext::new(canvas, ElementSource::Movie),
    );
    let scene = process_movie_elements(
        &params.scene_elements,
        &BatchContext::new(canvas, ElementSource::Scene),
    );

    let mut scenes = Vec::with_capacity(1 + params.images.len());
    scenes.push(Scene {
        background_color: params.scene_background.clone(),
        transition: None,
        elements: scene.into_elements(),
    });

    let slides: Vec<Value> = params
        .images
        .iter()
        .map(|src| json!({ "src": src, "duration": params.image_duration }))
        .collect();
    let slides = process_batch(
        &slides,
        &BatchContext::new(canvas, ElementSource::Scene),
        |raw, canvas| Ok(process_image_element(raw, canvas)),
    );
    scenes.extend(slides.into_elements().into_iter().map(|image| Scene {
        background_color: params.scene_background.clone(),
        transition: None,
        elements: vec![image],
    }));

    document.scenes = scenes;
    document.elements = Some(movie.into_elements());
    Ok(document)
}
