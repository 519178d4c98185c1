use std::io::Write;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use super::time_greeting::TimeGreetingService;
use crate::config::GreetingConfig;
use crate::translate::TranslateInterface;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GreetingError {
    #[error("Invalid configuration. 'Greeting:Message' or 'Greeting:Language' is missing.")]
    MissingConfiguration,
}

/// Combines the time greeting with the configured message and translates it
pub struct GreetingService {
    config: GreetingConfig,
    translator: Arc<dyn TranslateInterface>,
    time_greeting: Arc<TimeGreetingService>,
}

impl GreetingService {
    pub fn new(
        config: GreetingConfig,
        translator: Arc<dyn TranslateInterface>,
        time_greeting: Arc<TimeGreetingService>,
    ) -> Self {
        Self {
            config,
            translator,
            time_greeting,
        }
    }

    /// Build the final message.
    ///
    /// The combined sentence is translated as a whole. When that comes back
    /// unchanged the time greeting is translated on its own and recombined
    /// with the untranslated message.
    pub async fn compose(&self) -> Result<String, GreetingError> {
        info!("GreetingService started.");

        let message = non_blank(&self.config.message);
        let language = non_blank(&self.config.language);
        let (Some(message), Some(language)) = (message, language) else {
            return Err(GreetingError::MissingConfiguration);
        };

        info!("Configuration loaded: Message='{}', Language='{}'", message, language);

        let time_greeting = self.time_greeting.get_time_greeting().await;
        let combined = format!("{}! {}", time_greeting, message);
        info!("Combining greeting and message before translation: {}", combined);

        let mut translated = self.translator.translate(&combined, language).await;

        if translated == combined {
            let translated_time_greeting =
                self.translator.translate(&time_greeting, language).await;
            translated = format!("{}! {}", translated_time_greeting, message);
        }

        info!("Final translated message: {}", translated);
        Ok(translated)
    }

    /// Compose and print the greeting to stdout
    pub async fn run(&self) {
        let mut stdout = std::io::stdout();
        self.run_with(&mut stdout).await;
    }

    /// Compose and write the greeting as one line. A configuration error
    /// is logged and nothing is written.
    pub async fn run_with<W: Write + Send>(&self, out: &mut W) {
        match self.compose().await {
            Ok(message) => {
                if let Err(e) = writeln!(out, "{}", message).and_then(|_| out.flush()) {
                    error!("Failed to write greeting: {}", e);
                    return;
                }
                info!("Final message displayed: {}", message);
            }
            Err(e) => error!("{}", e),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
