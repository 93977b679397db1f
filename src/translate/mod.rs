pub mod google;

use crate::error::Result;
use async_trait::async_trait;

pub use google::GoogleTranslator;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate every text from `source_lang` to `target_lang`.
    ///
    /// The output has one entry per input, in the same order.
    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>>;
}
