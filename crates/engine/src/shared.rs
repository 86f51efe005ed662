//! Batch processors shared by every operation builder.
//!
//! A batch applies one element processor across a list of raw entries. An
//! entry whose processor fails is dropped with a warning; the rest of the
//! batch is kept. This is distinct from validation, which rejects the whole
//! request before any processing happens.

use serde_json::Value;
use tracing::warn;

use crate::elements::{process_audio_element, process_element, process_video_element, Element};
use crate::error::ElementError;
use crate::fields::{Canvas, RawElement};

/// Where a batch's entries were declared. Carried for diagnostics only;
/// it never reaches the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementSource {
    Movie,
    Scene,
    Video,
    Audio,
    Overlay,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchContext {
    pub canvas: Canvas,
    pub source: ElementSource,
}

impl BatchContext {
    pub fn new(canvas: Canvas, source: ElementSource) -> Self {
        Self { canvas, source }
    }
}

/// A processed element tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedElement {
    pub element: Element,
    pub source: ElementSource,
    /// Position in the raw input list.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedElement {
    pub source: ElementSource,
    pub index: usize,
    pub error: ElementError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub elements: Vec<ProcessedElement>,
    pub dropped: Vec<DroppedElement>,
}

impl Batch {
    pub fn into_elements(self) -> Vec<Element> {
        self.elements.into_iter().map(|p| p.element).collect()
    }
}

/// Apply `processor` to every entry, isolating failures.
pub fn process_batch<F>(raw: &[Value], ctx: &BatchContext, processor: F) -> Batch
where
    F: Fn(&RawElement<'_>, &Canvas) -> Result<Element, ElementError>,
{
    let mut batch = Batch::default();

    for (index, value) in raw.iter().enumerate() {
        let result = RawElement::from_value(value)
            .ok_or(ElementError::NotAnObject)
            .and_then(|element| processor(&element, &ctx.canvas));

        match result {
            Ok(element) => batch.elements.push(ProcessedElement {
                element,
                source: ctx.source,
                index,
            }),
            Err(error) => {
                warn!(
                    source = ?ctx.source,
                    index,
                    %error,
                    "skipping element that failed to process"
                );
                batch.dropped.push(DroppedElement {
                    source: ctx.source,
                    index,
                    error,
                });
            }
        }
    }

    batch
}

/// Entries are videos regardless of any `type` they carry.
pub fn process_video_elements(raw: &[Value], ctx: &BatchContext) -> Batch {
    process_batch(raw, ctx, |element, canvas| {
        Ok(process_video_element(element, canvas))
    })
}

/// Entries are audio tracks regardless of any `type` they carry.
pub fn process_audio_elements(raw: &[Value], ctx: &BatchContext) -> Batch {
    process_batch(raw, ctx, |element, _| Ok(process_audio_element(element)))
}

/// Mixed entries, dispatched on their own `type`.
pub fn process_movie_elements(raw: &[Value], ctx: &BatchContext) -> Batch {
    process_batch(raw, ctx, process_element)
}
