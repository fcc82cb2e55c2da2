use std::collections::HashMap;

use axum::{
    body::{Body, Bytes},
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::header,
    Form,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// URL-encoded form extractor that rejects with a plain 400
pub struct AppForm<T>(pub T);

impl<T, S> FromRequest<S> for AppForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => {
                tracing::debug!("Rejected form body: {}", rejection);
                Err(AppError::BadRequest("invalid form".to_string()))
            }
        }
    }
}

/// A file part of a multipart body
#[derive(Debug, Clone)]
pub struct FilePart {
    pub data: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Form body that may be either URL-encoded or multipart.
///
/// Text fields end up in one map. File parts are kept separately; a file
/// input left empty by the browser (no name, no bytes) is dropped.
#[derive(Debug, Default)]
pub struct FormFields {
    fields: HashMap<String, String>,
    files: HashMap<String, FilePart>,
}

impl FormFields {
    /// Field value, or "" when absent
    pub fn value(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Field value with surrounding whitespace removed
    pub fn trimmed(&self, name: &str) -> &str {
        self.value(name).trim()
    }

    /// Checkbox semantics: only "on" counts as checked
    pub fn checked(&self, name: &str) -> bool {
        self.value(name) == "on"
    }

    pub fn take_file(&mut self, name: &str) -> Option<FilePart> {
        self.files.remove(name)
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = FormFields::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                form.files.entry(name).or_insert(FilePart {
                    data,
                    file_name: Some(file_name).filter(|n| !n.is_empty()),
                    content_type,
                });
            } else {
                let value = field.text().await?;
                form.fields.entry(name).or_insert(value);
            }
        }

        Ok(form)
    }
}

fn is_multipart(req: &Request<Body>) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("multipart/form-data"))
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                tracing::debug!("Rejected multipart body: {}", e);
                AppError::BadRequest("invalid multipart form".to_string())
            })?;
            return FormFields::from_multipart(multipart).await.map_err(|e| {
                tracing::debug!("Failed to read multipart field: {}", e);
                AppError::BadRequest("invalid multipart form".to_string())
            });
        }

        let AppForm(fields) = AppForm::<HashMap<String, String>>::from_request(req, state).await?;
        Ok(FormFields {
            fields,
            files: HashMap::new(),
        })
    }
}
