use serde::{Deserialize, Serialize};

/// Single-resource response wrapper: `{"data": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// List response wrapper with pagination metadata
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub page_number: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub total_pages: Option<i64>,
    #[serde(default)]
    pub total_results: Option<i64>,
}

/// A fax as reported by the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fax {
    pub id: String,
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page_count: Option<i64>,
    #[serde(default)]
    pub store_media: Option<bool>,
    #[serde(default)]
    pub store_preview: Option<bool>,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /faxes`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateFaxRequest {
    pub connection_id: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_media: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

/// One page of faxes
#[derive(Debug, Clone)]
pub struct FaxPage {
    pub faxes: Vec<Fax>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaxApplicationInbound {
    #[serde(default)]
    pub channel_limit: Option<i64>,
    #[serde(default)]
    pub sip_subdomain: Option<String>,
    #[serde(default)]
    pub sip_subdomain_receive_settings: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaxApplicationOutbound {
    #[serde(default)]
    pub channel_limit: Option<i64>,
    #[serde(default)]
    pub outbound_voice_profile_id: Option<String>,
}

/// Provider-side fax application (inbound routing, webhooks)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaxApplication {
    pub id: String,
    #[serde(default)]
    pub application_name: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub webhook_event_url: String,
    #[serde(default)]
    pub webhook_event_failover_url: Option<String>,
    #[serde(default)]
    pub webhook_timeout_secs: Option<i64>,
    #[serde(default)]
    pub fax_email_recipient: Option<String>,
    #[serde(default)]
    pub anchorsite_override: Option<String>,
    #[serde(default)]
    pub inbound: Option<FaxApplicationInbound>,
    #[serde(default)]
    pub outbound: Option<FaxApplicationOutbound>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `PATCH /fax_applications/{id}`.
///
/// Name and webhook URL are always sent; the provider requires them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateFaxApplicationRequest {
    pub application_name: String,
    pub webhook_event_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_event_failover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_timeout_secs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax_email_recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbound: Option<InboundUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InboundUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sip_subdomain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sip_subdomain_receive_settings: Option<String>,
}

/// Provider error body: `{"errors": [{"title": ..., "detail": ...}]}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}
