//! Translate interface - text from English into a target language

use async_trait::async_trait;
use serde::Serialize;

/// Request body sent to the translation endpoint
#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    pub text: Vec<String>,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslateRequest {
    pub fn new(text: &str, source_lang: &str, target_lang: &str) -> Self {
        Self {
            text: vec![text.to_string()],
            source_lang: source_lang.to_uppercase(),
            target_lang: target_lang.to_uppercase(),
        }
    }
}

/// Translator trait
///
/// Implementations never fail: when no translation can be produced the
/// original `text` is returned unchanged.
#[async_trait]
pub trait TranslateInterface: Send + Sync {
    /// Translate `text` into `target_lang`
    ///
    /// # Arguments
    /// * `text` - The English text to translate
    /// * `target_lang` - Language code such as "DE" (case-insensitive)
    async fn translate(&self, text: &str, target_lang: &str) -> String;
}
