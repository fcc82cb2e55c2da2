use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::config::MediaConfig;
use crate::core::error::{AppError, Result};
use crate::features::media::MediaService;
use crate::modules::telnyx::{
    CreateFaxRequest, Fax, FaxApi, FaxApplication, FaxPage, PageMeta,
    UpdateFaxApplicationRequest,
};
use crate::shared::templates::TemplateEngine;

pub const TEST_BASE_URL: &str = "https://fax.example";

/// Templates shipped with the crate
pub fn project_templates() -> Arc<TemplateEngine> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
    Arc::new(TemplateEngine::from_dir(&dir).unwrap())
}

/// Memory-backed media service under [`TEST_BASE_URL`]
pub fn memory_media() -> Arc<MediaService> {
    let config = MediaConfig {
        hipaa: false,
        upload_dir: None,
        cleanup_interval: Duration::from_secs(300),
    };
    Arc::new(MediaService::new(&config, TEST_BASE_URL))
}

/// In-process stand-in for the fax provider that records what it was sent
#[derive(Default)]
pub struct FakeFaxApi {
    created: Mutex<Vec<CreateFaxRequest>>,
    pages: Mutex<Vec<(i64, i64)>>,
    application: Mutex<Option<FaxApplication>>,
    updates: Mutex<Vec<UpdateFaxApplicationRequest>>,
    fail_updates: bool,
}

impl FakeFaxApi {
    pub fn with_application(application: FaxApplication) -> Self {
        Self {
            application: Mutex::new(Some(application)),
            ..Default::default()
        }
    }

    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    pub fn last_created(&self) -> Option<CreateFaxRequest> {
        self.created.lock().unwrap().last().cloned()
    }

    pub fn last_page(&self) -> Option<(i64, i64)> {
        self.pages.lock().unwrap().last().copied()
    }

    pub fn last_update(&self) -> Option<UpdateFaxApplicationRequest> {
        self.updates.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl FaxApi for FakeFaxApi {
    async fn create_fax(&self, request: CreateFaxRequest) -> Result<Fax> {
        let fax = Fax {
            id: format!("fax-{}", self.created.lock().unwrap().len() + 1),
            connection_id: Some(request.connection_id.clone()),
            from: Some(request.from.clone()),
            to: Some(request.to.clone()),
            media_url: request.media_url.clone(),
            status: Some("queued".to_string()),
            ..Default::default()
        };
        self.created.lock().unwrap().push(request);
        Ok(fax)
    }

    async fn get_fax(&self, id: &str) -> Result<Fax> {
        if id == "missing" {
            return Err(AppError::ExternalServiceError(
                "Failed to fetch fax: 404 Not Found".to_string(),
            ));
        }
        Ok(Fax {
            id: id.to_string(),
            status: Some("delivered".to_string()),
            ..Default::default()
        })
    }

    async fn list_faxes(&self, page_number: i64, page_size: i64) -> Result<FaxPage> {
        self.pages.lock().unwrap().push((page_number, page_size));
        Ok(FaxPage {
            faxes: vec![Fax {
                id: "fax-listed".to_string(),
                status: Some("delivered".to_string()),
                ..Default::default()
            }],
            meta: PageMeta {
                page_number: Some(page_number),
                page_size: Some(page_size),
                total_pages: Some(5),
                total_results: None,
            },
        })
    }

    async fn get_fax_application(&self, id: &str) -> Result<FaxApplication> {
        self.application
            .lock()
            .unwrap()
            .clone()
            .filter(|app| app.id == id)
            .ok_or_else(|| {
                AppError::ExternalServiceError(
                    "Failed to fetch fax application: 404 Not Found".to_string(),
                )
            })
    }

    async fn update_fax_application(
        &self,
        id: &str,
        request: UpdateFaxApplicationRequest,
    ) -> Result<FaxApplication> {
        if self.fail_updates {
            return Err(AppError::ExternalServiceError(
                "Failed to update fax application: 422 invalid webhook".to_string(),
            ));
        }
        let mut current = self.get_fax_application(id).await?;
        current.application_name = request.application_name.clone();
        current.webhook_event_url = request.webhook_event_url.clone();
        self.updates.lock().unwrap().push(request);
        Ok(current)
    }
}
