//! The store trait and document-level helpers on top of it.

use crate::error::PersistenceResult;
use async_trait::async_trait;
use formsmith_codec::{deserialize, serialize, SchemaDoc};
use formsmith_model::{FormDocument, FormPurpose};
use formsmith_types::FormId;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Listing entry for a stored form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: FormId,
    pub name: String,
    pub purpose: FormPurpose,
    pub field_count: usize,
}

impl FormSummary {
    pub fn of(id: FormId, schema: &SchemaDoc) -> Self {
        Self {
            id,
            name: schema.name.clone(),
            purpose: schema.purpose,
            field_count: schema.fields().count(),
        }
    }
}

/// Where form documents live between editing sessions.
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Stores `schema`. With `id` the existing entry is replaced (or created
    /// under that id); without one a fresh id is assigned.
    async fn save(&self, id: Option<&FormId>, schema: &SchemaDoc) -> PersistenceResult<FormId>;

    async fn load(&self, id: &FormId) -> PersistenceResult<SchemaDoc>;

    /// All stored forms, ordered by id.
    async fn list(&self) -> PersistenceResult<Vec<FormSummary>>;

    /// Removes a form. Deleting an unknown id is a `NotFound` error.
    async fn delete(&self, id: &FormId) -> PersistenceResult<()>;
}

/// Serializes and saves a document.
pub async fn save_document<S: FormStore + ?Sized>(
    store: &S,
    id: Option<&FormId>,
    document: &FormDocument,
) -> PersistenceResult<FormId> {
    let id = store.save(id, &serialize(document)).await?;
    info!("Saved form {:?} as {}", document.name, id);
    Ok(id)
}

/// Loads and rehydrates a document.
pub async fn load_document<S: FormStore + ?Sized>(
    store: &S,
    id: &FormId,
) -> PersistenceResult<FormDocument> {
    let schema = store.load(id).await?;
    let document = deserialize(&schema)?;
    info!("Loaded form {} ({:?})", id, document.name);
    Ok(document)
}
