//! Text translation.

use babel_log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::json_body;
use crate::{ApiError, BabelClient, Result};

pub const TRANSLATE_PATH: &str = "/translate-text";

/// A translation request. `src` and `dest` are language codes from the
/// [`LanguageCatalog`](crate::LanguageCatalog); `src` may be `auto`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub src: String,
    pub dest: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, src: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            src: src.into(),
            dest: dest.into(),
        }
    }
}

impl BabelClient {
    /// Translate text, returning the translated string.
    pub async fn translate(&self, request: &TranslationRequest) -> Result<String> {
        if request.dest.is_empty() {
            return Err(ApiError::Integrity("destination language is required".to_string()));
        }

        debug!("Translating {} chars {} -> {}", request.text.len(), request.src, request.dest);
        let response = self
            .http()
            .post(self.config().api_url(TRANSLATE_PATH))
            .json(request)
            .send()
            .await?;

        if !response.is_success() {
            return Err(ApiError::status(response.status()));
        }

        json_body(&response)?
            .get("translated-text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::UnexpectedResponse("missing translated-text".to_string()))
    }
}
