use axum::{
    extract::{Query, State},
    response::Html,
};
use minijinja::{context, Value};

use crate::core::error::{AppError, Result};
use crate::core::extractor::FormFields;
use crate::features::faxes::dtos::{HomeQueryDto, ListFaxesQueryDto, SendFaxDto, ShowFaxQueryDto};
use crate::features::faxes::routes::FaxState;

/// Send form
pub async fn home(
    State(state): State<FaxState>,
    Query(query): Query<HomeQueryDto>,
) -> Result<Html<String>> {
    let view = state.service.home_view(query);
    state.templates.page("index.html", Value::from_serialize(&view))
}

/// Submit a fax (URL-encoded or multipart with an attached document)
pub async fn send_fax(State(state): State<FaxState>, form: FormFields) -> Result<Html<String>> {
    let fax = state.service.send_fax(SendFaxDto::from(form)).await?;
    state.templates.page("fax_show.html", context! { fax => fax })
}

/// Details of one fax: `/fax?id=...`
pub async fn show_fax(
    State(state): State<FaxState>,
    Query(query): Query<ShowFaxQueryDto>,
) -> Result<Html<String>> {
    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("missing id".to_string()))?;

    let fax = state.service.get_fax(id.trim()).await?;
    state.templates.page("fax_show.html", context! { fax => fax })
}

/// Paged fax history
pub async fn list_faxes(
    State(state): State<FaxState>,
    Query(query): Query<ListFaxesQueryDto>,
) -> Result<Html<String>> {
    let view = state.service.list_faxes(query).await?;
    state.templates.page("faxes.html", Value::from_serialize(&view))
}

#[cfg(test)]
mod tests {
    use crate::features::faxes::routes::{routes, FaxState};
    use crate::features::faxes::services::{FaxDefaults, FaxService};
    use crate::shared::test_helpers::{memory_media, project_templates, FakeFaxApi};
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use std::sync::Arc;

    fn server(api: Arc<FakeFaxApi>, defaults: FaxDefaults) -> TestServer {
        let state = FaxState {
            service: Arc::new(FaxService::new(api, memory_media(), defaults, false, true)),
            templates: project_templates(),
        };
        TestServer::new(routes(state)).unwrap()
    }

    #[tokio::test]
    async fn test_home_prefills_defaults() {
        let server = server(
            Arc::new(FakeFaxApi::default()),
            FaxDefaults {
                from: Some("+15559990000".to_string()),
                connection_id: None,
            },
        );
        let response = server.get("/").await;
        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("+15559990000"));
        assert!(html.contains("/settings"));
    }

    #[tokio::test]
    async fn test_send_urlencoded_fax() {
        let api = Arc::new(FakeFaxApi::default());
        let server = server(api.clone(), FaxDefaults::default());
        let response = server
            .post("/fax")
            .form(&[
                ("connection_id", "conn"),
                ("from", "5550001111"),
                ("to", "5551234567"),
                ("media_url", "https://docs.example/a.pdf"),
            ])
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("fax-1"));
        assert_eq!(api.last_created().unwrap().to, "+15551234567");
    }

    #[tokio::test]
    async fn test_send_multipart_fax_hosts_upload() {
        let api = Arc::new(FakeFaxApi::default());
        let server = server(api.clone(), FaxDefaults::default());
        let form = MultipartForm::new()
            .add_text("connection_id", "conn")
            .add_text("from", "+15550001111")
            .add_text("to", "+15551234567")
            .add_part(
                "media_file",
                Part::bytes(b"%PDF-1.4".to_vec())
                    .file_name("doc.pdf")
                    .mime_type("application/pdf"),
            );
        let response = server.post("/fax").multipart(form).await;
        response.assert_status_ok();

        let media_url = api.last_created().unwrap().media_url.unwrap();
        assert!(media_url.starts_with("https://fax.example/media/"));
    }

    #[tokio::test]
    async fn test_send_without_media_is_400() {
        let server = server(Arc::new(FakeFaxApi::default()), FaxDefaults::default());
        let response = server
            .post("/fax")
            .form(&[("connection_id", "c"), ("from", "+15550001111"), ("to", "+15551234567")])
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("media_url or media_file is required");
    }

    #[tokio::test]
    async fn test_show_fax() {
        let server = server(Arc::new(FakeFaxApi::default()), FaxDefaults::default());
        server.get("/fax").await.assert_status(StatusCode::BAD_REQUEST);

        let response = server.get("/fax").add_query_param("id", "abc").await;
        response.assert_status_ok();
        assert!(response.text().contains("abc"));

        server
            .get("/fax")
            .add_query_param("id", "missing")
            .await
            .assert_status(StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_list_faxes_page() {
        let api = Arc::new(FakeFaxApi::default());
        let server = server(api.clone(), FaxDefaults::default());
        let response = server
            .get("/faxes")
            .add_query_param("page_number", "2")
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("fax-listed"));
        assert_eq!(api.last_page(), Some((2, 10)));
    }

    #[tokio::test]
    async fn test_other_methods_are_405() {
        let server = server(Arc::new(FakeFaxApi::default()), FaxDefaults::default());
        server
            .delete("/fax")
            .await
            .assert_status(StatusCode::METHOD_NOT_ALLOWED);
        server
            .post("/faxes")
            .await
            .assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }
}
