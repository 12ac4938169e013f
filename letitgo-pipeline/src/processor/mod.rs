//! Processor module for the letitgo pipeline.
//!
//! Decomposes origins into flat, independently indexable nodes.

mod decomposer;

pub use decomposer::{Decomposer, NodeIdPolicy};
