//! Supported language catalog.

use serde_json::Value;
use std::fmt;

use crate::client::json_body;
use crate::{ApiError, BabelClient, Result};

pub const LANGUAGES_PATH: &str = "/fetch-languages";

/// Code for automatic source-language detection.
pub const AUTO_DETECT: &str = "auto";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub name: String,
}

impl Language {
    /// Label shown in pickers, e.g. `en - English`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.name)
    }
}

/// Languages in the order the server listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCatalog {
    languages: Vec<Language>,
}

impl LanguageCatalog {
    /// Build a catalog from the server's `code -> name` object.
    pub fn from_json(body: &Value) -> Result<Self> {
        let map = body.as_object().ok_or_else(|| {
            ApiError::UnexpectedResponse("expected an object of language codes".to_string())
        })?;

        let languages = map
            .iter()
            .map(|(code, name)| Language {
                code: code.clone(),
                name: match name {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            })
            .collect();
        Ok(Self { languages })
    }

    /// Languages usable as a source: every entry.
    pub fn source(&self) -> &[Language] {
        &self.languages
    }

    /// Languages usable as a destination: every entry but `auto`.
    pub fn destination(&self) -> impl Iterator<Item = &Language> {
        self.languages.iter().filter(|l| l.code != AUTO_DETECT)
    }

    pub fn get(&self, code: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl BabelClient {
    /// Fetch the languages the translator supports.
    pub async fn fetch_languages(&self) -> Result<LanguageCatalog> {
        let response = self
            .http()
            .get(self.config().api_url(LANGUAGES_PATH))
            .send()
            .await?;

        if !response.is_success() {
            return Err(ApiError::status(response.status()));
        }

        LanguageCatalog::from_json(&json_body(&response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> LanguageCatalog {
        LanguageCatalog::from_json(&json!({
            "auto": "Detect Language",
            "en": "English",
            "fr": "French"
        }))
        .unwrap()
    }

    #[test]
    fn test_source_keeps_server_order() {
        let codes: Vec<_> = catalog().source().iter().map(|l| l.code.clone()).collect();
        assert_eq!(codes, vec!["auto", "en", "fr"]);
    }

    #[test]
    fn test_destination_skips_auto() {
        let catalog = catalog();
        let labels: Vec<_> = catalog.destination().map(Language::label).collect();
        assert_eq!(labels, vec!["en - English", "fr - French"]);
    }

    #[test]
    fn test_lookup() {
        let catalog = catalog();
        assert!(catalog.contains("fr"));
        assert!(!catalog.contains("de"));
        assert_eq!(catalog.get("en").map(|l| l.to_string()).as_deref(), Some("en - English"));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            LanguageCatalog::from_json(&json!(["en", "fr"])),
            Err(ApiError::UnexpectedResponse(_))
        ));
    }
}
