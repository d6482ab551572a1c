//! In-memory store.

use crate::error::{PersistenceError, PersistenceResult};
use crate::store::{FormStore, FormSummary};
use async_trait::async_trait;
use formsmith_codec::SchemaDoc;
use formsmith_types::FormId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Keeps forms in a map. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryFormStore {
    forms: Arc<RwLock<HashMap<FormId, SchemaDoc>>>,
}

impl MemoryFormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.forms.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.forms.read().await.is_empty()
    }
}

#[async_trait]
impl FormStore for MemoryFormStore {
    async fn save(&self, id: Option<&FormId>, schema: &SchemaDoc) -> PersistenceResult<FormId> {
        let id = id.cloned().unwrap_or_default();
        debug!("Storing form {} in memory", id);
        self.forms.write().await.insert(id.clone(), schema.clone());
        Ok(id)
    }

    async fn load(&self, id: &FormId) -> PersistenceResult<SchemaDoc> {
        self.forms
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound(id.clone()))
    }

    async fn list(&self) -> PersistenceResult<Vec<FormSummary>> {
        let forms = self.forms.read().await;
        let mut summaries: Vec<_> = forms
            .iter()
            .map(|(id, schema)| FormSummary::of(id.clone(), schema))
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn delete(&self, id: &FormId) -> PersistenceResult<()> {
        self.forms
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PersistenceError::NotFound(id.clone()))
    }
}
