//! # Letitgo Pipeline
//!
//! This crate turns medical-record documents into index-ready units and
//! writes them to the search engine.
//!
//! ## Architecture
//!
//! The pipeline follows the Source-Processor-Loader pattern:
//!
//! 1. **Source**: Reads origins and docs produced upstream
//! 2. **Processor**: Decomposes an origin into flat nodes
//! 3. **Loader**: Writes nodes and property records in bulk
//! 4. **Orchestrator**: Provisions indices and drives one ingest call end to end

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod source;

pub use errors::PipelineError;
pub use loader::IndexWriter;
pub use orchestrator::{Ingestor, OriginReport};
pub use processor::{Decomposer, NodeIdPolicy};
