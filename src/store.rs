//! Admin dataset access.
//!
//! The analysis core only reads guidelines, knowledge-base articles, and the
//! active prompt template; ownership of that data sits with an external
//! admin collaborator. [`AdminStore`] is the seam, and [`FileAdminStore`] is
//! the reference implementation backed by a single JSON document, seeded
//! with a default prompt template on first read.
//!
//! The dataset is read at prompt-assembly time; concurrent admin edits can
//! make one analysis observe a mix of old and new data. That staleness is
//! accepted.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;

use crate::models::{AdminData, Guideline, KnowledgeBaseArticle, SystemPrompt};
use crate::prompt::DEFAULT_TEMPLATE;

/// Read access to the admin-owned dataset.
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// All guidelines, in storage order.
    async fn guidelines(&self) -> Result<Vec<Guideline>>;

    /// All knowledge-base articles, in storage order.
    async fn knowledge_base(&self) -> Result<Vec<KnowledgeBaseArticle>>;

    /// The currently active prompt template, if any.
    async fn active_prompt(&self) -> Result<Option<SystemPrompt>>;
}

/// File-backed [`AdminStore`] over a single JSON document.
pub struct FileAdminStore {
    path: PathBuf,
}

impl FileAdminStore {
    /// Create a store reading from `path`. The file is created and seeded
    /// with [`default_admin_data`] on first read.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole dataset, seeding defaults if the file is missing.
    pub async fn read(&self) -> Result<AdminData> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => serde_json::from_str(&content).with_context(|| {
                format!("Failed to parse admin data file: {}", self.path.display())
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let data = default_admin_data();
                self.write(&data).await?;
                Ok(data)
            }
            Err(e) => Err(e).with_context(|| {
                format!("Failed to read admin data file: {}", self.path.display())
            }),
        }
    }

    /// Persist the whole dataset, creating parent directories as needed.
    pub async fn write(&self, data: &AdminData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }
        let content = serde_json::to_string_pretty(data)?;
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write admin data file: {}", self.path.display()))
    }
}

#[async_trait]
impl AdminStore for FileAdminStore {
    async fn guidelines(&self) -> Result<Vec<Guideline>> {
        Ok(self.read().await?.guidelines)
    }

    async fn knowledge_base(&self) -> Result<Vec<KnowledgeBaseArticle>> {
        Ok(self.read().await?.knowledge_base)
    }

    async fn active_prompt(&self) -> Result<Option<SystemPrompt>> {
        let data = self.read().await?;
        let by_id = data.active_prompt_id.as_ref().and_then(|id| {
            data.system_prompts
                .iter()
                .find(|p| &p.id == id)
                .cloned()
        });
        Ok(by_id.or_else(|| data.system_prompts.iter().find(|p| p.is_active).cloned()))
    }
}

/// The seeded dataset: no guidelines or articles, one active default prompt.
pub fn default_admin_data() -> AdminData {
    AdminData {
        guidelines: Vec::new(),
        knowledge_base: Vec::new(),
        system_prompts: vec![SystemPrompt {
            id: "default".to_string(),
            content: DEFAULT_TEMPLATE.to_string(),
            version: 1,
            created_at: Utc::now(),
            is_active: true,
        }],
        active_prompt_id: Some("default".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::validate_template;

    #[tokio::test]
    async fn test_seeds_default_on_first_read() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileAdminStore::new(tmp.path().join("data/admin-data.json"));

        let prompt = store.active_prompt().await.unwrap().unwrap();
        assert_eq!(prompt.id, "default");
        assert!(validate_template(&prompt.content).valid);

        // The seeded file persists
        assert!(store.path().exists());
        assert!(store.guidelines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileAdminStore::new(tmp.path().join("admin.json"));

        let mut data = default_admin_data();
        data.guidelines.push(Guideline {
            id: "g1".to_string(),
            name: "Īsi teikumi".to_string(),
            content: "Raksti īsus teikumus.".to_string(),
            priority: 8,
            created_at: Utc::now(),
        });
        store.write(&data).await.unwrap();

        let read_back = store.read().await.unwrap();
        assert_eq!(read_back.guidelines.len(), 1);
        assert_eq!(read_back.guidelines[0].name, "Īsi teikumi");
    }

    #[tokio::test]
    async fn test_no_active_prompt() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileAdminStore::new(tmp.path().join("admin.json"));

        let mut data = default_admin_data();
        data.active_prompt_id = None;
        data.system_prompts[0].is_active = false;
        store.write(&data).await.unwrap();

        assert!(store.active_prompt().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("admin.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let store = FileAdminStore::new(&path);
        assert!(store.read().await.is_err());
    }
}
