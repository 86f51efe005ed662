//! Advanced mode: a user-supplied JSON template plus scalar overrides.
//!
//! Only the top-level scalars below can be overridden. `scenes` and
//! `elements` always come from the template untouched.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::EngineError;
use crate::params::{OutputSettings, TemplateParams};

/// Parse the template and apply overrides.
///
/// # Errors
/// [`EngineError::InvalidTemplate`] if the text is not a JSON object.
pub fn build_from_template(params: &TemplateParams) -> Result<Map<String, Value>, EngineError> {
    let parsed: Value =
        serde_json::from_str(&params.template).map_err(EngineError::invalid_template)?;

    let Value::Object(template) = parsed else {
        return Err(EngineError::InvalidTemplate(
            "template must be a JSON object".to_owned(),
        ));
    };

    Ok(apply_overrides(template, &params.overrides))
}

/// Return `template` with every present override assigned to its key.
pub fn apply_overrides(template: Map<String, Value>, overrides: &OutputSettings) -> Map<String, Value> {
    let mut document = template;

    if let Some(id) = &overrides.record_id {
        document.insert("id".to_owned(), Value::String(id.clone()));
    }
    if let Some(width) = overrides.width {
        document.insert("width".to_owned(), Value::from(width));
    }
    if let Some(height) = overrides.height {
        document.insert("height".to_owned(), Value::from(height));
    }
    if let Some(fps) = overrides.fps {
        document.insert("fps".to_owned(), Value::from(fps));
    }
    if let Some(cache) = overrides.cache {
        document.insert("cache".to_owned(), Value::Bool(cache));
    }
    if let Some(draft) = overrides.draft {
        document.insert("draft".to_owned(), Value::Bool(draft));
    }
    insert_serialized(&mut document, "quality", overrides.quality.as_ref());
    insert_serialized(&mut document, "resolution", overrides.resolution.as_ref());
    insert_serialized(&mut document, "exports", overrides.exports().as_ref());

    document
}

fn insert_serialized<T: Serialize>(document: &mut Map<String, Value>, key: &str, value: Option<&T>) {
    let Some(value) = value else { return };
    match serde_json::to_value(value) {
        Ok(value) => {
            document.insert(key.to_owned(), value);
        }
        Err(error) => debug!(key, %error, "skipping override that failed to serialize"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quality;
    use serde_json::json;

    fn params(template: &str, overrides: OutputSettings) -> TemplateParams {
        TemplateParams {
            template: template.to_owned(),
            overrides,
        }
    }

    #[test]
    fn overrides_add_scalars_and_keep_structure() {
        let doc = build_from_template(&params(
            r#"{"width":1280,"height":720,"elements":[],"scenes":[{"elements":[{"type":"text","text":"x"}]}]}"#,
            OutputSettings {
                record_id: Some("override-123".into()),
                quality: Some(Quality::High),
                webhook_url: Some("https://hook".into()),
                ..OutputSettings::default()
            },
        ))
        .unwrap();

        assert_eq!(doc["id"], "override-123");
        assert_eq!(doc["width"], 1280);
        assert_eq!(doc["height"], 720);
        assert_eq!(doc["quality"], "high");
        assert_eq!(doc["elements"], json!([]));
        assert_eq!(doc["scenes"][0]["elements"][0]["text"], "x");
        assert_eq!(doc["exports"], json!([{ "type": "webhook", "webhook": "https://hook" }]));
    }

    #[test]
    fn present_overrides_replace_template_scalars() {
        let doc = build_from_template(&params(
            r#"{"fps":24,"draft":true}"#,
            OutputSettings {
                fps: Some(60),
                draft: Some(false),
                ..OutputSettings::default()
            },
        ))
        .unwrap();
        assert_eq!(doc["fps"], 60);
        assert_eq!(doc["draft"], false);
    }

    #[test]
    fn malformed_template_is_rejected() {
        let err = build_from_template(&params("{invalid-json}", OutputSettings::default())).unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON template:"));

        let err = build_from_template(&params("[1, 2]", OutputSettings::default())).unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON template: template must be a JSON object");
    }
}
