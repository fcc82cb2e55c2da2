use axum::body::{Body, Bytes};
use chrono::{DateTime, Utc};
use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::ByteRange;

/// Where the bytes of a resolved upload live
#[derive(Debug)]
pub enum MediaContent {
    Memory(Bytes),
    /// Open handle into the upload directory, streamed on demand
    File(File),
}

/// Media resolved from a token, ready to be served
#[derive(Debug)]
pub struct StoredMedia {
    pub content: MediaContent,
    pub size: u64,
    pub content_type: String,
    /// Modification time of durable uploads
    pub modified: Option<DateTime<Utc>>,
    /// Held in memory only; responses must not be cached
    pub ephemeral: bool,
}

impl StoredMedia {
    /// Body carrying the whole upload
    pub fn into_body(self) -> Body {
        match self.content {
            MediaContent::Memory(data) => Body::from(data),
            MediaContent::File(file) => Body::from_stream(ReaderStream::new(file)),
        }
    }

    /// Body carrying only `range`, which must lie within `size`
    pub async fn into_range_body(self, range: ByteRange) -> std::io::Result<Body> {
        match self.content {
            MediaContent::Memory(data) => {
                let start = range.start as usize;
                let end = range.end as usize;
                Ok(Body::from(data.slice(start..=end)))
            }
            MediaContent::File(mut file) => {
                file.seek(SeekFrom::Start(range.start)).await?;
                let stream = ReaderStream::new(file.take(range.length()));
                Ok(Body::from_stream(stream))
            }
        }
    }
}
