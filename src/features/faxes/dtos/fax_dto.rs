use serde::{Deserialize, Serialize};

use crate::core::extractor::{FilePart, FormFields};
use crate::modules::telnyx::Fax;
use crate::shared::constants::MEDIA_FILE_FIELD;

/// Query string of the send form: values to prefill
#[derive(Debug, Default, Deserialize)]
pub struct HomeQueryDto {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub connection_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShowFaxQueryDto {
    #[serde(default)]
    pub id: Option<String>,
}

/// Paging parameters; anything that is not a positive integer is ignored
#[derive(Debug, Default, Deserialize)]
pub struct ListFaxesQueryDto {
    #[serde(default)]
    pub page_number: Option<String>,
    #[serde(default)]
    pub page_size: Option<String>,
}

/// Raw send-form submission, before defaults and normalization
#[derive(Debug, Default)]
pub struct SendFaxDto {
    pub connection_id: String,
    pub from: String,
    pub to: String,
    pub media_url: String,
    pub media_file: Option<FilePart>,
    pub webhook_url: String,
    pub store_preview: bool,
    pub store_media: bool,
    pub quality: String,
}

impl From<FormFields> for SendFaxDto {
    fn from(mut form: FormFields) -> Self {
        Self {
            connection_id: form.trimmed("connection_id").to_string(),
            from: form.trimmed("from").to_string(),
            to: form.trimmed("to").to_string(),
            media_url: form.trimmed("media_url").to_string(),
            webhook_url: form.trimmed("webhook_url").to_string(),
            store_preview: form.checked("store_preview"),
            store_media: form.checked("store_media"),
            quality: form.trimmed("quality").to_string(),
            media_file: form.take_file(MEDIA_FILE_FIELD),
        }
    }
}

/// Context of the send form page
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub prefill_from: String,
    pub prefill_connection_id: String,
    /// Hide inputs whose value is already known
    pub hide_from: bool,
    pub hide_connection_id: bool,
    pub show_settings: bool,
    pub hipaa: bool,
    pub has_api_key: bool,
    /// Minutes an uploaded file stays fetchable, when uploads are ephemeral
    pub media_ttl_minutes: Option<u64>,
}

/// Context of the fax list page
#[derive(Debug, Serialize)]
pub struct FaxListView {
    pub faxes: Vec<Fax>,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: Option<i64>,
    pub has_prev: bool,
    pub has_next: bool,
}
