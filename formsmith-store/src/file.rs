//! Directory-backed store: one `<id>.json` file per form.

use crate::error::{PersistenceError, PersistenceResult};
use crate::store::{FormStore, FormSummary};
use async_trait::async_trait;
use formsmith_codec::SchemaDoc;
use formsmith_types::FormId;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

const EXTENSION: &str = "json";

/// Configuration for [`FileFormStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStoreConfig {
    /// Directory holding the form files. Created on first save.
    pub root: PathBuf,
    /// Write indented JSON.
    pub pretty: bool,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("forms"),
            pretty: true,
        }
    }
}

pub struct FileFormStore {
    config: FileStoreConfig,
}

impl FileFormStore {
    pub fn new(config: FileStoreConfig) -> Self {
        Self { config }
    }

    /// Store rooted at `root` with default settings.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self::new(FileStoreConfig {
            root: root.into(),
            ..FileStoreConfig::default()
        })
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    fn path_for(&self, id: &FormId) -> PersistenceResult<PathBuf> {
        let raw = id.as_str();
        let safe = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe {
            return Err(PersistenceError::Backend(format!(
                "form id {raw:?} is not usable as a file name"
            )));
        }
        Ok(self.config.root.join(format!("{raw}.{EXTENSION}")))
    }

    async fn read_schema(path: &Path) -> PersistenceResult<SchemaDoc> {
        let bytes = fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn not_found(id: &FormId) -> impl FnOnce(std::io::Error) -> PersistenceError + '_ {
    move |e| {
        if e.kind() == ErrorKind::NotFound {
            PersistenceError::NotFound(id.clone())
        } else {
            PersistenceError::Io(e)
        }
    }
}

#[async_trait]
impl FormStore for FileFormStore {
    async fn save(&self, id: Option<&FormId>, schema: &SchemaDoc) -> PersistenceResult<FormId> {
        let id = id.cloned().unwrap_or_default();
        let path = self.path_for(&id)?;

        if !fs::try_exists(&self.config.root).await? {
            fs::create_dir_all(&self.config.root).await?;
            info!("Created form directory: {:?}", self.config.root);
        }

        let content = if self.config.pretty {
            serde_json::to_vec_pretty(schema)?
        } else {
            serde_json::to_vec(schema)?
        };

        // Write beside the target and rename so readers never see a partial file.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, &content).await?;
        fs::rename(&staging, &path).await?;
        debug!("Wrote form {} ({} bytes) to {:?}", id, content.len(), path);
        Ok(id)
    }

    async fn load(&self, id: &FormId) -> PersistenceResult<SchemaDoc> {
        let path = self.path_for(id)?;
        let bytes = fs::read(&path).await.map_err(not_found(id))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn list(&self) -> PersistenceResult<Vec<FormSummary>> {
        let mut read_dir = match fs::read_dir(&self.config.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match Self::read_schema(&path).await {
                Ok(schema) => summaries.push(FormSummary::of(FormId::from_string(stem), &schema)),
                Err(e) => warn!("Skipping unreadable form file {:?}: {e}", path),
            }
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn delete(&self, id: &FormId) -> PersistenceResult<()> {
        let path = self.path_for(id)?;
        fs::remove_file(&path).await.map_err(not_found(id))?;
        debug!("Deleted form {} at {:?}", id, path);
        Ok(())
    }
}
