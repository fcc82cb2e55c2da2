use chrono::{DateTime, Utc};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use super::memory::token_prefix;
use super::token::generate_hex_token;
use super::{StorageError, StorageResult};
use crate::shared::constants::{DEFAULT_CONTENT_TYPE, MEDIA_TOKEN_BYTES};
use crate::shared::validation::EXTENSION_REGEX;

/// A stored upload opened for reading
#[derive(Debug)]
pub struct DiskFile {
    pub file: fs::File,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub content_type: String,
}

/// Durable upload directory.
///
/// Files are named `<token><ext>` and are never expired by this process.
#[derive(Debug, Clone)]
pub struct DiskStore {
    upload_dir: PathBuf,
}

impl DiskStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Write `data` under a fresh token and return the stored file name
    pub async fn store(
        &self,
        data: &[u8],
        original_filename: Option<&str>,
        content_type: &str,
    ) -> StorageResult<String> {
        fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| StorageError::Prepare(e.to_string()))?;

        let token = generate_hex_token(MEDIA_TOKEN_BYTES)?;
        let filename = format!("{}{}", token, extension_for(original_filename, content_type));
        let dest = self.upload_dir.join(&filename);

        fs::write(&dest, data)
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;

        tracing::info!(
            file = %format!("{}...", token_prefix(&filename)),
            size_bytes = data.len(),
            "Stored upload on disk"
        );

        Ok(filename)
    }

    /// Map a requested name to a path inside the upload directory.
    ///
    /// Anything that would leave the directory (`..`, absolute paths, symlinks
    /// pointing outside) is reported as not found.
    pub fn resolve(&self, name: &str) -> StorageResult<PathBuf> {
        let mut relative = PathBuf::new();
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !relative.pop() {
                        return Err(StorageError::NotFound);
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(StorageError::NotFound),
            }
        }
        if relative.as_os_str().is_empty() {
            return Err(StorageError::NotFound);
        }

        let path = self.upload_dir.join(relative);

        if let (Ok(base), Ok(canonical)) = (self.upload_dir.canonicalize(), path.canonicalize()) {
            if canonical.strip_prefix(&base).is_err() {
                return Err(StorageError::NotFound);
            }
        }

        Ok(path)
    }

    /// Open a stored file; the content type is guessed from its extension
    pub async fn open(&self, name: &str) -> StorageResult<DiskFile> {
        let path = self.resolve(name)?;

        let file = fs::File::open(&path)
            .await
            .map_err(|_| StorageError::NotFound)?;
        let metadata = file
            .metadata()
            .await
            .map_err(|e| StorageError::Read(e.to_string()))?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound);
        }

        Ok(DiskFile {
            file,
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            content_type: content_type_for(&path).to_string(),
        })
    }
}

/// Extension for a stored upload.
///
/// The original filename's extension wins; otherwise only PDF and TIFF
/// content types map to an extension.
pub fn extension_for(original_filename: Option<&str>, content_type: &str) -> String {
    let from_name = original_filename
        .and_then(|name| Path::new(name).extension())
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .filter(|ext| EXTENSION_REGEX.is_match(ext));

    if let Some(ext) = from_name {
        return ext;
    }

    match content_type {
        "application/pdf" => ".pdf".to_string(),
        "image/tiff" => ".tiff".to_string(),
        _ => String::new(),
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "tif" | "tiff" => "image/tiff",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" => "text/plain; charset=utf-8",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
