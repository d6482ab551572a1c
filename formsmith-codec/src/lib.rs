//! Schema interchange for formsmith.
//!
//! A [`SchemaDoc`] is the persisted form of a [`FormDocument`]: what the
//! persistence service stores and what the standalone renderer and public
//! embed consume. This crate converts between the two.
//!
//! # Round trip
//!
//! For a document whose every node already has an id,
//! `serialize(deserialize(serialize(d))) == serialize(d)`. Column widths are
//! always written as `100/n` and re-derived on load.
//!
//! # Legacy input
//!
//! Older documents may lack ids or carry duplicates. [`deserialize`] fills
//! and repairs them rather than rejecting the document; see [`codec`].
//!
//! [`FormDocument`]: formsmith_model::FormDocument

pub mod codec;
mod error;
mod render;
mod schema;

pub use codec::{deserialize, from_json, serialize, to_json, to_json_pretty};
pub use error::{CodecError, CodecResult};
pub use render::TaskItemView;
pub use schema::{SchemaColumn, SchemaDoc, SchemaField, SchemaRow};
