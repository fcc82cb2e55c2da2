use std::time::Duration;

use crate::core::config::MediaConfig;
use crate::core::error::Result;
use crate::features::media::dtos::MediaUploadDto;
use crate::features::media::models::{MediaContent, StoredMedia};
use crate::modules::storage::{token_prefix, DiskStore, MemoryStore, StorageError};
use crate::shared::constants::{DEFAULT_CONTENT_TYPE, MEDIA_TTL};

/// Where uploads are kept
#[derive(Clone)]
pub enum MediaBackend {
    /// Ephemeral, self-expiring storage
    Memory(MemoryStore),
    /// Durable directory, no expiry
    Disk(DiskStore),
}

/// Hosts uploaded documents under unguessable tokens so the fax provider
/// can fetch them from `<public_base_url>/media/<token>`.
pub struct MediaService {
    backend: MediaBackend,
    public_base_url: String,
}

impl MediaService {
    /// Pick the backend from configuration.
    ///
    /// HIPAA mode, or no upload directory, means memory.
    pub fn new(config: &MediaConfig, public_base_url: &str) -> Self {
        let backend = match config.durable_dir() {
            Some(dir) => MediaBackend::Disk(DiskStore::new(dir)),
            None => MediaBackend::Memory(MemoryStore::new(MEDIA_TTL)),
        };
        Self::with_backend(backend, public_base_url)
    }

    pub fn with_backend(backend: MediaBackend, public_base_url: &str) -> Self {
        Self {
            backend,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The in-memory store, when uploads are ephemeral
    pub fn memory_store(&self) -> Option<&MemoryStore> {
        match &self.backend {
            MediaBackend::Memory(store) => Some(store),
            MediaBackend::Disk(_) => None,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            MediaBackend::Memory(_) => "memory",
            MediaBackend::Disk(_) => "disk",
        }
    }

    /// Time an in-memory upload stays fetchable
    pub fn ttl(&self) -> Option<Duration> {
        self.memory_store().map(|_| MEDIA_TTL)
    }

    /// Host an upload and return the absolute URL it can be fetched from
    pub async fn store(&self, upload: MediaUploadDto) -> Result<String> {
        let content_type = upload
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let size = upload.data.len();

        let name = match &self.backend {
            MediaBackend::Memory(store) => store.insert(upload.data, content_type).await?,
            MediaBackend::Disk(store) => {
                store
                    .store(
                        &upload.data,
                        upload.original_filename.as_deref(),
                        &content_type,
                    )
                    .await?
            }
        };

        tracing::info!(
            backend = self.backend_name(),
            token = %format!("{}...", token_prefix(&name)),
            size_bytes = size,
            "Hosted upload for fax retrieval"
        );

        Ok(self.public_url(&name))
    }

    /// Resolve a token previously returned by [`store`](Self::store)
    pub async fn retrieve(&self, token: &str) -> Result<StoredMedia> {
        let token = token.trim();
        if token.is_empty() {
            return Err(StorageError::NotFound.into());
        }

        match &self.backend {
            MediaBackend::Memory(store) => {
                let file = store.get(token).await?;
                Ok(StoredMedia {
                    size: file.data.len() as u64,
                    content: MediaContent::Memory(file.data),
                    content_type: file.content_type,
                    modified: None,
                    ephemeral: true,
                })
            }
            MediaBackend::Disk(store) => {
                let opened = store.open(token).await?;
                Ok(StoredMedia {
                    content: MediaContent::File(opened.file),
                    size: opened.size,
                    content_type: opened.content_type,
                    modified: opened.modified,
                    ephemeral: false,
                })
            }
        }
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/media/{}", self.public_base_url, name)
    }
}
