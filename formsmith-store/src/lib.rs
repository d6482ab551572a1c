//! Persistence boundary for formsmith.
//!
//! The builder never talks to a database directly; it hands a [`SchemaDoc`]
//! to a [`FormStore`] and gets a [`FormId`] back. Two backends ship here:
//! an in-memory map for tests and previews, and a directory of JSON files.
//!
//! [`SchemaDoc`]: formsmith_codec::SchemaDoc
//! [`FormId`]: formsmith_types::FormId

mod error;
mod file;
mod memory;
mod store;

pub use error::{PersistenceError, PersistenceResult};
pub use file::{FileFormStore, FileStoreConfig};
pub use memory::MemoryFormStore;
pub use store::{load_document, save_document, FormStore, FormSummary};
