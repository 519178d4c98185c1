use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::interface::TranslateInterface;

/// Translator double: answers from a fixed phrase table and records every call.
/// Unknown phrases come back unchanged, like a real translator that failed.
#[derive(Default)]
pub struct RecordingTranslator {
    phrases: HashMap<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, translated: &str) -> Self {
        self.phrases.insert(text.to_string(), translated.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslateInterface for RecordingTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> String {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), target_lang.to_string()));
        self.phrases
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }
}
