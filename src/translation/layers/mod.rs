/*!
 * Transformation layers.
 *
 * Each layer is one stage of the pipeline: it inspects the current text,
 * declines input it cannot work with, and otherwise produces a
 * `LayerResult`. Layers communicate only through the `TranslationContext`;
 * none of them knows which layer runs before or after it.
 */

use async_trait::async_trait;

use crate::translation::context::TranslationContext;
use crate::translation::result::LayerResult;

/// Common trait for all transformation layers
///
/// Implementations report recoverable problems through a failed
/// `LayerResult` instead of panicking, so one broken layer degrades the
/// translation instead of aborting it.
#[async_trait]
pub trait TranslationLayer: Send + Sync {
    /// Stable layer name used in diagnostics
    fn name(&self) -> &str;

    /// One-line description of what the layer does
    fn description(&self) -> &str;

    /// Whether the layer can do useful work on this input
    fn can_handle(&self, text: &str, context: &TranslationContext) -> bool;

    /// Transform the current text
    ///
    /// `text` is the pipeline input; layers read the running translation
    /// through `context.current_text(text)` and write their output back to
    /// `context.translated_text`.
    async fn process(&self, text: &str, context: &mut TranslationContext) -> LayerResult;
}

pub mod grammar;
pub mod postprocessing;
pub mod preprocessing;
pub mod substitution;
pub mod word_order;

// Re-export the built-in layers
pub use grammar::GrammarLayer;
pub use postprocessing::PostprocessingLayer;
pub use preprocessing::PreprocessingLayer;
pub use substitution::{MAX_PHRASE_TOKENS, SubstitutionLayer};
pub use word_order::{WordOrderLayer, syntactic_order_for};
