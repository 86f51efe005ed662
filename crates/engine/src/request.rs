//! Request-builder dispatch.

use tracing::debug;

use nodes::ParameterSource;

use crate::builders::{build_create_movie, build_from_template, build_merge_video_audio, build_merge_videos};
use crate::error::EngineError;
use crate::models::{Operation, RequestBody};
use crate::params::{CreateMovieParams, MergeVideoAudioParams, MergeVideosParams, Parameters, TemplateParams};

/// Whether `operation` runs in advanced (template) mode for this item.
///
/// Unset means basic mode.
pub fn is_advanced_mode(params: &Parameters<'_>, operation: Operation) -> bool {
    operation
        .advanced_mode_field()
        .and_then(|field| params.boolean(field))
        .unwrap_or(false)
}

/// Build the request body for one item.
///
/// # Errors
/// Template syntax errors, basic-mode validation errors, or
/// [`EngineError::NoRequestBody`] for `checkStatus`.
pub fn build_request_body(
    source: &dyn ParameterSource,
    operation: Operation,
    item_index: usize,
    is_advanced_mode: bool,
) -> Result<RequestBody, EngineError> {
    let params = Parameters::new(source, item_index);
    debug!(%operation, item = item_index, is_advanced_mode, "building request body");

    if is_advanced_mode && operation != Operation::CheckStatus {
        let template = TemplateParams::resolve(&params, operation);
        return build_from_template(&template).map(RequestBody::Template);
    }

    let document = match operation {
        Operation::CreateMovie => build_create_movie(&CreateMovieParams::resolve(&params))?,
        Operation::MergeVideoAudio => build_merge_video_audio(&MergeVideoAudioParams::resolve(&params))?,
        Operation::MergeVideos => build_merge_videos(&MergeVideosParams::resolve(&params))?,
        Operation::CheckStatus => return Err(EngineError::NoRequestBody(operation.to_string())),
    };
    Ok(RequestBody::Document(document))
}
