/*!
 * Rule-driven translation over ordered processing layers.
 *
 * This module contains the core functionality of the offline translation
 * engine. It is split into several submodules:
 *
 * - `engine`: Engine lifecycle, request entry points, and event streams
 * - `pipeline`: Ordered layer execution over a shared context
 * - `layers`: The five standard processing layers
 * - `rules`: Rule model, file loading, and the regex rule engine
 * - `context`: Per-request configuration and working state
 * - `result`: Layer and translation result types
 * - `cache`: Bounded word and phrase caches with hit metrics
 */

// Re-export main types for easier usage
pub use self::engine::{EngineState, EngineStatistics, TranslationEngine};
pub use self::pipeline::{PipelineRun, PipelineState, PipelineStatistics, TranslationPipeline};

// Re-export context and result types
pub use self::context::{MetadataValue, TranslationContext, TranslationMode, metadata_keys};
pub use self::result::{CacheMetrics, LayerDebugInfo, LayerResult, TranslationResult};

// Re-export cache types
pub use self::cache::CacheManager;

// Submodules
pub mod cache;
pub mod context;
pub mod engine;
pub mod layers;
pub mod pipeline;
pub mod result;
pub mod rules;
