use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::faxes::dtos::{
    FaxListView, HomeQueryDto, HomeView, ListFaxesQueryDto, SendFaxDto,
};
use crate::features::media::dtos::MediaUploadDto;
use crate::features::media::MediaService;
use crate::modules::telnyx::{CreateFaxRequest, Fax, FaxApi};
use crate::shared::constants::{ALLOWED_FAX_QUALITIES, DEFAULT_PAGE_SIZE};
use crate::shared::validation::{first_non_empty, normalize_phone_number};

/// Values used when the form leaves a field empty
#[derive(Debug, Clone, Default)]
pub struct FaxDefaults {
    pub from: Option<String>,
    pub connection_id: Option<String>,
}

/// Sending and browsing faxes
pub struct FaxService {
    api: Arc<dyn FaxApi>,
    media: Arc<MediaService>,
    defaults: FaxDefaults,
    hipaa: bool,
    settings_enabled: bool,
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

impl FaxService {
    pub fn new(
        api: Arc<dyn FaxApi>,
        media: Arc<MediaService>,
        defaults: FaxDefaults,
        hipaa: bool,
        settings_enabled: bool,
    ) -> Self {
        Self {
            api,
            media,
            defaults,
            hipaa,
            settings_enabled,
        }
    }

    /// Send form prefill: query string first, configured defaults second
    pub fn home_view(&self, query: HomeQueryDto) -> HomeView {
        let prefill_from = first_non_empty(&[
            query.from.unwrap_or_default(),
            self.defaults.from.clone().unwrap_or_default(),
        ])
        .unwrap_or_default();
        let prefill_connection_id = first_non_empty(&[
            query.connection_id.unwrap_or_default(),
            self.defaults.connection_id.clone().unwrap_or_default(),
        ])
        .unwrap_or_default();

        HomeView {
            hide_from: !prefill_from.trim().is_empty(),
            hide_connection_id: !prefill_connection_id.trim().is_empty(),
            prefill_from,
            prefill_connection_id,
            show_settings: self.settings_enabled,
            hipaa: self.hipaa,
            has_api_key: true,
            media_ttl_minutes: self.media.ttl().map(|ttl| ttl.as_secs() / 60),
        }
    }

    /// Validate the submission, host any uploaded file and create the fax.
    ///
    /// An uploaded file wins over a `media_url`. In HIPAA mode the provider
    /// is always told not to keep media or previews.
    pub async fn send_fax(&self, mut dto: SendFaxDto) -> Result<Fax> {
        let connection_id = first_non_empty(&[
            dto.connection_id.clone(),
            self.defaults.connection_id.clone().unwrap_or_default(),
        ])
        .unwrap_or_default();
        let from = first_non_empty(&[
            normalize_phone_number(&dto.from),
            self.defaults.from.clone().unwrap_or_default(),
        ])
        .unwrap_or_default();
        let to = normalize_phone_number(&dto.to);

        if connection_id.is_empty() || from.is_empty() || to.is_empty() {
            return Err(AppError::BadRequest(
                "connection_id, from and to are required".to_string(),
            ));
        }

        let uploaded_url = match dto.media_file.take() {
            Some(file) => Some(
                self.media
                    .store(MediaUploadDto {
                        data: file.data,
                        original_filename: file.file_name,
                        content_type: file.content_type,
                    })
                    .await?,
            ),
            None => None,
        };

        let media_url = uploaded_url
            .or_else(|| Some(dto.media_url.clone()).filter(|u| !u.is_empty()))
            .ok_or_else(|| {
                AppError::BadRequest("media_url or media_file is required".to_string())
            })?;

        let request = self.build_request(&dto, connection_id, from, to, media_url);
        self.api.create_fax(request).await
    }

    fn build_request(
        &self,
        dto: &SendFaxDto,
        connection_id: String,
        from: String,
        to: String,
        media_url: String,
    ) -> CreateFaxRequest {
        let (store_preview, store_media) = if self.hipaa {
            (Some(false), Some(false))
        } else {
            (
                dto.store_preview.then_some(true),
                dto.store_media.then_some(true),
            )
        };

        CreateFaxRequest {
            connection_id,
            from,
            to,
            media_url: Some(media_url),
            webhook_url: Some(dto.webhook_url.clone()).filter(|u| !u.is_empty()),
            store_preview,
            store_media,
            quality: ALLOWED_FAX_QUALITIES
                .contains(&dto.quality.as_str())
                .then(|| dto.quality.clone()),
        }
    }

    pub async fn get_fax(&self, id: &str) -> Result<Fax> {
        self.api.get_fax(id).await
    }

    pub async fn list_faxes(&self, query: ListFaxesQueryDto) -> Result<FaxListView> {
        let page_number = positive_or(query.page_number.as_deref(), 1);
        let page_size = positive_or(query.page_size.as_deref(), DEFAULT_PAGE_SIZE);

        let page = self.api.list_faxes(page_number, page_size).await?;

        let has_next = match page.meta.total_pages {
            Some(total) => page_number < total,
            None => page.faxes.len() as i64 >= page_size,
        };

        Ok(FaxListView {
            has_prev: page_number > 1,
            has_next,
            total_pages: page.meta.total_pages,
            faxes: page.faxes,
            page_number,
            page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::FilePart;
    use crate::shared::test_helpers::{memory_media, FakeFaxApi};
    use axum::body::Bytes;

    fn service(api: Arc<FakeFaxApi>, hipaa: bool, defaults: FaxDefaults) -> FaxService {
        FaxService::new(api, memory_media(), defaults, hipaa, false)
    }

    fn dto(to: &str, media_url: &str) -> SendFaxDto {
        SendFaxDto {
            connection_id: "conn".to_string(),
            from: "5550001111".to_string(),
            to: to.to_string(),
            media_url: media_url.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_numbers_are_normalized() {
        let api = Arc::new(FakeFaxApi::default());
        let service = service(api.clone(), false, FaxDefaults::default());
        service
            .send_fax(dto("(555) 123-4567", "https://docs.example/a.pdf"))
            .await
            .unwrap();

        let sent = api.last_created().unwrap();
        assert_eq!(sent.from, "+15550001111");
        assert_eq!(sent.to, "+15551234567");
        assert_eq!(sent.media_url.as_deref(), Some("https://docs.example/a.pdf"));
        assert_eq!(sent.store_media, None);
        assert_eq!(sent.quality, None);
    }

    #[tokio::test]
    async fn test_defaults_fill_missing_fields() {
        let api = Arc::new(FakeFaxApi::default());
        let service = service(
            api.clone(),
            false,
            FaxDefaults {
                from: Some("+15559990000".to_string()),
                connection_id: Some("default-conn".to_string()),
            },
        );
        let mut submission = dto("+442071234567", "https://docs.example/a.pdf");
        submission.from.clear();
        submission.connection_id.clear();
        service.send_fax(submission).await.unwrap();

        let sent = api.last_created().unwrap();
        assert_eq!(sent.from, "+15559990000");
        assert_eq!(sent.connection_id, "default-conn");
        assert_eq!(sent.to, "+442071234567");
    }

    #[tokio::test]
    async fn test_missing_required_fields() {
        let service = service(Arc::new(FakeFaxApi::default()), false, FaxDefaults::default());
        let err = service
            .send_fax(dto("", "https://docs.example/a.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("required")));

        let err = service.send_fax(dto("5551234567", "")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("media_url")));
    }

    #[tokio::test]
    async fn test_uploaded_file_wins_over_media_url() {
        let api = Arc::new(FakeFaxApi::default());
        let service = service(api.clone(), false, FaxDefaults::default());
        let mut submission = dto("5551234567", "https://docs.example/ignored.pdf");
        submission.media_file = Some(FilePart {
            data: Bytes::from_static(b"%PDF"),
            file_name: Some("doc.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
        });
        service.send_fax(submission).await.unwrap();

        let media_url = api.last_created().unwrap().media_url.unwrap();
        assert!(media_url.starts_with("https://fax.example/media/"));
        let token = media_url.rsplit('/').next().unwrap();
        let stored = service.media.retrieve(token).await.unwrap();
        let data = axum::body::to_bytes(stored.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&data[..], b"%PDF");
    }

    #[tokio::test]
    async fn test_hipaa_forces_storage_flags_off() {
        let api = Arc::new(FakeFaxApi::default());
        let service = service(api.clone(), true, FaxDefaults::default());
        let mut submission = dto("5551234567", "https://docs.example/a.pdf");
        submission.store_media = true;
        submission.store_preview = true;
        service.send_fax(submission).await.unwrap();

        let sent = api.last_created().unwrap();
        assert_eq!(sent.store_media, Some(false));
        assert_eq!(sent.store_preview, Some(false));
    }

    #[tokio::test]
    async fn test_checked_flags_and_quality_pass_through() {
        let api = Arc::new(FakeFaxApi::default());
        let service = service(api.clone(), false, FaxDefaults::default());
        let mut submission = dto("5551234567", "https://docs.example/a.pdf");
        submission.store_preview = true;
        submission.quality = "very_high".to_string();
        submission.webhook_url = "https://hooks.example/fax".to_string();
        service.send_fax(submission).await.unwrap();

        let sent = api.last_created().unwrap();
        assert_eq!(sent.store_preview, Some(true));
        assert_eq!(sent.store_media, None);
        assert_eq!(sent.quality.as_deref(), Some("very_high"));
        assert_eq!(sent.webhook_url.as_deref(), Some("https://hooks.example/fax"));

        let mut submission = dto("5551234567", "https://docs.example/a.pdf");
        submission.quality = "potato".to_string();
        service.send_fax(submission).await.unwrap();
        assert_eq!(api.last_created().unwrap().quality, None);
    }

    #[test]
    fn test_home_view_prefers_query_over_defaults() {
        let service = service(
            Arc::new(FakeFaxApi::default()),
            false,
            FaxDefaults {
                from: Some("+15559990000".to_string()),
                connection_id: None,
            },
        );
        let view = service.home_view(HomeQueryDto {
            from: Some("+15551112222".to_string()),
            connection_id: None,
        });
        assert_eq!(view.prefill_from, "+15551112222");
        assert!(view.hide_from);
        assert!(!view.hide_connection_id);
        assert_eq!(view.media_ttl_minutes, Some(30));
    }

    #[tokio::test]
    async fn test_paging_defaults_and_bounds() {
        let api = Arc::new(FakeFaxApi::default());
        let service = service(api.clone(), false, FaxDefaults::default());

        let view = service
            .list_faxes(ListFaxesQueryDto {
                page_number: Some("0".to_string()),
                page_size: Some("abc".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(view.page_number, 1);
        assert_eq!(view.page_size, 10);
        assert!(!view.has_prev);
        assert_eq!(api.last_page(), Some((1, 10)));

        service
            .list_faxes(ListFaxesQueryDto {
                page_number: Some("3".to_string()),
                page_size: Some("25".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(api.last_page(), Some((3, 25)));
    }
}
