pub mod interface;
pub mod deepl;

#[cfg(test)]
pub mod testing;

pub use interface::TranslateInterface;
pub use deepl::{DeepLTranslator, API_KEY_ENV};
