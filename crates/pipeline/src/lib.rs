//! Batch generation of collection items: selection, layering, upload and
//! persistence, plus the group-level shuffle and metadata export.

pub mod catalog;
pub mod compositor;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod pg;
pub mod staging;
pub mod store;

pub use catalog::CatalogReader;
pub use error::PipelineError;
pub use orchestrator::{run_batch, run_batch_with_rng, shuffle_group, BatchOutcome, GenerationContext};
pub use store::CompositeStore;
