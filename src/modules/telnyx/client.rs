use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::models::{
    ApiErrorBody, CreateFaxRequest, DataEnvelope, Fax, FaxApplication, FaxPage, ListEnvelope,
    UpdateFaxApplicationRequest,
};
use crate::core::error::{AppError, Result};
use crate::shared::constants::{FAX_CREATE_TIMEOUT, FAX_REQUEST_TIMEOUT};

/// Remote fax operations used by the web pages
#[async_trait]
pub trait FaxApi: Send + Sync {
    async fn create_fax(&self, request: CreateFaxRequest) -> Result<Fax>;

    async fn get_fax(&self, id: &str) -> Result<Fax>;

    async fn list_faxes(&self, page_number: i64, page_size: i64) -> Result<FaxPage>;

    async fn get_fax_application(&self, id: &str) -> Result<FaxApplication>;

    async fn update_fax_application(
        &self,
        id: &str,
        request: UpdateFaxApplicationRequest,
    ) -> Result<FaxApplication>;
}

/// HTTP client for the Telnyx v2 REST API
pub struct TelnyxClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TelnyxClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        timeout: Duration,
        action: &str,
    ) -> Result<T> {
        let response = request
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to {}: {}", action, e);
                AppError::ExternalServiceError(format!("Failed to {}: {}", action, e))
            })?;

        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                tracing::error!("Failed to parse response to {}: {}", action, e);
                AppError::ExternalServiceError(format!("Failed to parse response: {}", e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        let detail = describe_error(&body);
        tracing::error!("Telnyx API error ({}) trying to {}: {}", status, action, body);

        Err(AppError::ExternalServiceError(format!(
            "Failed to {}: {} {}",
            action, status, detail
        )))
    }
}

/// Human-readable summary of a provider error body
fn describe_error(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|parsed| {
            parsed
                .errors
                .iter()
                .filter_map(|e| e.detail.clone().or_else(|| e.title.clone()))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl FaxApi for TelnyxClient {
    async fn create_fax(&self, request: CreateFaxRequest) -> Result<Fax> {
        tracing::debug!("Creating fax to {}", request.to);
        let envelope: DataEnvelope<Fax> = self
            .send(
                self.http_client.post(self.url("/faxes")).json(&request),
                FAX_CREATE_TIMEOUT,
                "send fax",
            )
            .await?;
        tracing::info!("Fax {} queued", envelope.data.id);
        Ok(envelope.data)
    }

    async fn get_fax(&self, id: &str) -> Result<Fax> {
        let path = format!("/faxes/{}", urlencoding::encode(id));
        let envelope: DataEnvelope<Fax> = self
            .send(
                self.http_client.get(self.url(&path)),
                FAX_REQUEST_TIMEOUT,
                "fetch fax",
            )
            .await?;
        Ok(envelope.data)
    }

    async fn list_faxes(&self, page_number: i64, page_size: i64) -> Result<FaxPage> {
        let envelope: ListEnvelope<Fax> = self
            .send(
                self.http_client.get(self.url("/faxes")).query(&[
                    ("page[number]", page_number),
                    ("page[size]", page_size),
                ]),
                FAX_REQUEST_TIMEOUT,
                "list faxes",
            )
            .await?;
        Ok(FaxPage {
            faxes: envelope.data,
            meta: envelope.meta.unwrap_or_default(),
        })
    }

    async fn get_fax_application(&self, id: &str) -> Result<FaxApplication> {
        let path = format!("/fax_applications/{}", urlencoding::encode(id));
        let envelope: DataEnvelope<FaxApplication> = self
            .send(
                self.http_client.get(self.url(&path)),
                FAX_REQUEST_TIMEOUT,
                "fetch fax application",
            )
            .await?;
        Ok(envelope.data)
    }

    async fn update_fax_application(
        &self,
        id: &str,
        request: UpdateFaxApplicationRequest,
    ) -> Result<FaxApplication> {
        let path = format!("/fax_applications/{}", urlencoding::encode(id));
        let envelope: DataEnvelope<FaxApplication> = self
            .send(
                self.http_client.patch(self.url(&path)).json(&request),
                FAX_REQUEST_TIMEOUT,
                "update fax application",
            )
            .await?;
        tracing::info!("Fax application {} updated", id);
        Ok(envelope.data)
    }
}
