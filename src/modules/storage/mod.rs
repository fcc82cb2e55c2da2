//! Storage module for uploaded media
//!
//! Two backends hold uploads under unguessable tokens: an in-memory map with
//! expiry, and a directory on disk. [`token`] produces the tokens both use.

mod disk;
mod memory;
pub mod token;

pub use disk::DiskStore;
pub use memory::{token_prefix, MemoryStore};

use thiserror::Error;

use crate::core::error::AppError;
use token::TokenError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Media not found")]
    NotFound,

    #[error("Failed to generate secure token: {0}")]
    Token(#[from] TokenError),

    #[error("Failed to prepare upload storage: {0}")]
    Prepare(String),

    #[error("Failed to store uploaded file: {0}")]
    Write(String),

    #[error("Failed to read uploaded file: {0}")]
    Read(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound => AppError::NotFound("404 page not found".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        StorageError::Token(e).into()
    }
}
