use axum::body::Bytes;

/// A document received from the fax form, before it is hosted
#[derive(Debug, Clone)]
pub struct MediaUploadDto {
    pub data: Bytes,
    /// Filename as sent by the browser, used only to pick an extension
    pub original_filename: Option<String>,
    /// Declared MIME type, if the browser sent one
    pub content_type: Option<String>,
}
