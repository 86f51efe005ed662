//! Credential document for the movie API.

use redact::Secret;
use serde::Deserialize;

/// Name under which the host stores these credentials.
pub const CREDENTIALS_NAME: &str = "json2VideoApiCredentials";

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Json2VideoCredentials {
    pub api_key: Secret<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_key_is_redacted_in_debug_output() {
        let creds: Json2VideoCredentials =
            serde_json::from_value(json!({ "apiKey": "sk-live-123" })).unwrap();
        assert_eq!(creds.api_key.expose_secret(), "sk-live-123");
        assert!(!format!("{creds:?}").contains("sk-live-123"));
    }
}
