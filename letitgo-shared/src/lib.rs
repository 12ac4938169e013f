//! # Letitgo Shared
//!
//! Document model shared by the repository and pipeline crates.
//!
//! Two shapes of input are supported:
//!
//! - [`Origin`]: a loosely structured record grouped by key, flattened into [`Node`]s.
//! - [`Doc`]: an explicitly typed form made of [`Group`]s and [`Property`]s,
//!   indexed through the [`Record`] envelope.

pub mod doc;
pub mod errors;
pub mod node;
pub mod origin;

pub use doc::{Doc, ElementType, Group, Property, Record};
pub use errors::ModelError;
pub use node::{Kvs, Node};
pub use origin::Origin;

/// A unit that can be written to the search index in a bulk request.
///
/// The designated id becomes the `_id` of the stored document, so two units
/// with the same id overwrite each other.
pub trait BulkDocument: serde::Serialize {
    /// The index document id for this unit.
    fn document_id(&self) -> String;
}
