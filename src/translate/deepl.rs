use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use super::interface::{TranslateInterface, TranslateRequest};
use crate::config::DeepLConfig;

/// Environment variable holding the DeepL credential
pub const API_KEY_ENV: &str = "DEEPL_API_KEY";

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("DeepL returned {0}")]
    Status(StatusCode),

    #[error("request to DeepL failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("malformed DeepL response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// DeepL translator
///
/// Every failure is absorbed here and signalled only by handing back the
/// untranslated input.
pub struct DeepLTranslator {
    client: Client,
    endpoint: String,
    source_lang: String,
    api_key: Option<String>,
}

impl DeepLTranslator {
    /// Create a new DeepL translator
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `config` - Endpoint and source language settings
    /// * `api_key` - Credential read once at startup; `None` or blank disables translation
    pub fn new(client: Client, config: &DeepLConfig, api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());

        if api_key.is_none() {
            warn!("DeepL API key not found. Translation will be skipped.");
        } else {
            info!("DeepL translation service initialized successfully.");
        }

        Self {
            client,
            endpoint: config.endpoint.clone(),
            source_lang: config.source_language.clone(),
            api_key,
        }
    }

    async fn request_translation(
        &self,
        api_key: &str,
        text: &str,
        target_lang: &str,
    ) -> Result<Option<String>, TranslateError> {
        let request = TranslateRequest::new(text, &self.source_lang, target_lang);

        info!("Sending translation request to DeepL API...");
        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("DeepL-Auth-Key {}", api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status));
        }

        let body = response.text().await?;
        info!("Raw DeepL response: {}", body);

        let value: Value = serde_json::from_str(&body)?;
        Ok(first_translation(&value))
    }
}

#[async_trait]
impl TranslateInterface for DeepLTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> String {
        if text.trim().is_empty() || target_lang.trim().is_empty() {
            warn!("Text or target language missing for translation.");
            return text.to_string();
        }

        let Some(api_key) = self.api_key.as_deref() else {
            warn!("DeepL API key missing. Returning original text.");
            return text.to_string();
        };

        match self.request_translation(api_key, text, target_lang).await {
            Ok(translated) => {
                let translated = translated.unwrap_or_else(|| text.to_string());
                info!("Translated text to {}: {}", target_lang, translated);
                translated
            }
            Err(TranslateError::Status(status)) => {
                warn!("DeepL returned {}.", status);
                text.to_string()
            }
            Err(e) => {
                error!("DeepL translation error: {}", e);
                text.to_string()
            }
        }
    }
}

/// Object field lookup ignoring ASCII case
fn field<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    value
        .as_object()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, v)| v)
}

/// Text of the first entry in `{ "translations": [ { "text": ... } ] }`
fn first_translation(body: &Value) -> Option<String> {
    field(body, "translations")?
        .as_array()?
        .first()
        .and_then(|entry| field(entry, "text"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
