use chrono::Timelike;
use std::sync::Arc;
use tracing::info;

use crate::translate::TranslateInterface;

/// Language used when `Greeting.Language` is absent
pub const DEFAULT_LANGUAGE: &str = "EN";

/// Source of the current hour of day (0..24)
pub trait Clock: Send + Sync {
    fn current_hour(&self) -> u32;
}

/// Local wall clock
pub struct LocalClock;

impl Clock for LocalClock {
    fn current_hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// Phrase for an hour of day: [0,12) morning, [12,18) afternoon, [18,24) evening
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// Time-of-day greeting, passed through the translator
pub struct TimeGreetingService {
    translator: Arc<dyn TranslateInterface>,
    clock: Arc<dyn Clock>,
    language: String,
}

impl TimeGreetingService {
    pub fn new(
        translator: Arc<dyn TranslateInterface>,
        clock: Arc<dyn Clock>,
        language: Option<String>,
    ) -> Self {
        Self {
            translator,
            clock,
            language: language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        }
    }

    pub async fn get_time_greeting(&self) -> String {
        let greeting = greeting_for_hour(self.clock.current_hour());

        let translated = self.translator.translate(greeting, &self.language).await;
        info!("Time-based greeting translated: {}", translated);
        translated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::testing::RecordingTranslator;

    pub struct FixedClock(pub u32);

    impl Clock for FixedClock {
        fn current_hour(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn hour_buckets_are_half_open() {
        for hour in 0..12 {
            assert_eq!(greeting_for_hour(hour), "Good morning", "hour {}", hour);
        }
        for hour in 12..18 {
            assert_eq!(greeting_for_hour(hour), "Good afternoon", "hour {}", hour);
        }
        for hour in 18..24 {
            assert_eq!(greeting_for_hour(hour), "Good evening", "hour {}", hour);
        }
    }

    #[test]
    fn boundaries() {
        assert_eq!(greeting_for_hour(11), "Good morning");
        assert_eq!(greeting_for_hour(12), "Good afternoon");
        assert_eq!(greeting_for_hour(17), "Good afternoon");
        assert_eq!(greeting_for_hour(18), "Good evening");
    }

    #[tokio::test]
    async fn translates_selected_phrase_into_configured_language() {
        let translator = Arc::new(RecordingTranslator::new().with("Good afternoon", "Guten Tag"));
        let service = TimeGreetingService::new(
            translator.clone(),
            Arc::new(FixedClock(12)),
            Some("DE".to_string()),
        );

        assert_eq!(service.get_time_greeting().await, "Guten Tag");
        assert_eq!(
            translator.calls(),
            vec![("Good afternoon".to_string(), "DE".to_string())]
        );
    }

    #[tokio::test]
    async fn language_defaults_to_english() {
        let translator = Arc::new(RecordingTranslator::new());
        let service = TimeGreetingService::new(translator.clone(), Arc::new(FixedClock(18)), None);

        assert_eq!(service.get_time_greeting().await, "Good evening");
        assert_eq!(translator.calls()[0].1, "EN");
    }
}
