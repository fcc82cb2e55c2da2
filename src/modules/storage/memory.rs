use axum::body::Bytes;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::token::generate_hex_token;
use super::{StorageError, StorageResult};
use crate::shared::constants::MEDIA_TOKEN_BYTES;

/// An upload held in memory until the fax provider fetches it
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    pub content_type: String,
    pub expires_at: DateTime<Utc>,
}

impl UploadedFile {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Token-keyed upload map with expiry.
///
/// Readers share the lock; inserts and evictions take it exclusively.
/// Eviction is idempotent, so lazy expiry on read and the background sweep
/// may race freely.
#[derive(Clone)]
pub struct MemoryStore {
    files: Arc<RwLock<HashMap<String, UploadedFile>>>,
    ttl: Duration,
}

impl MemoryStore {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::minutes(30)),
        }
    }

    /// Store `data` under a fresh token and return the token
    pub async fn insert(&self, data: Bytes, content_type: String) -> StorageResult<String> {
        let token = generate_hex_token(MEDIA_TOKEN_BYTES)?;
        let expires_at = Utc::now() + self.ttl;

        self.files.write().await.insert(
            token.clone(),
            UploadedFile {
                data,
                content_type,
                expires_at,
            },
        );

        Ok(token)
    }

    pub async fn get(&self, token: &str) -> StorageResult<UploadedFile> {
        self.get_at(token, Utc::now()).await
    }

    /// Look up `token` as of `now`, evicting it if it has expired
    pub async fn get_at(&self, token: &str, now: DateTime<Utc>) -> StorageResult<UploadedFile> {
        let file = {
            let files = self.files.read().await;
            files.get(token).cloned()
        };

        let file = file.ok_or(StorageError::NotFound)?;

        if file.is_expired_at(now) {
            self.files.write().await.remove(token);
            tracing::debug!("Evicted expired file on access: {}...", token_prefix(token));
            return Err(StorageError::NotFound);
        }

        Ok(file)
    }

    pub async fn sweep(&self) -> usize {
        self.sweep_at(Utc::now()).await
    }

    /// Remove every entry expired as of `now`; returns how many were removed
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let mut files = self.files.write().await;
        let before = files.len();
        files.retain(|token, file| {
            let expired = file.is_expired_at(now);
            if expired {
                tracing::info!("Cleaned up expired file: {}...", token_prefix(token));
            }
            !expired
        });
        before - files.len()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    #[cfg(test)]
    pub async fn insert_with_expiry(
        &self,
        token: &str,
        data: &'static [u8],
        expires_at: DateTime<Utc>,
    ) {
        self.files.write().await.insert(
            token.to_string(),
            UploadedFile {
                data: Bytes::from_static(data),
                content_type: "text/plain".to_string(),
                expires_at,
            },
        );
    }
}

/// First 8 characters of a token, enough to correlate log lines
pub fn token_prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}
