pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::enhance::handlers as enhance;
use crate::export::handlers as export;
use crate::matching::handlers as matching;
use crate::parser::handlers as parser;
use crate::state::AppState;
use crate::store::handlers as store;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/themes", get(export::handle_list_themes))
        // Document Parser
        .route(
            "/api/v1/resumes/upload",
            post(parser::handle_upload)
                .layer(DefaultBodyLimit::max(parser::MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        // Content Store
        .route("/api/v1/resumes", get(store::handle_list_resumes))
        .route(
            "/api/v1/resumes/:id",
            get(store::handle_get_resume).delete(store::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/contact",
            patch(store::handle_update_contact),
        )
        .route(
            "/api/v1/resumes/:id/sections/:section_id/entries",
            post(store::handle_add_entry),
        )
        .route(
            "/api/v1/resumes/:id/entries/:entry_id",
            delete(store::handle_delete_entry),
        )
        .route(
            "/api/v1/resumes/:id/entries/:entry_id/variations",
            post(store::handle_add_variation),
        )
        .route(
            "/api/v1/resumes/:id/entries/:entry_id/variations/:variation_id",
            patch(store::handle_edit_variation).delete(store::handle_delete_variation),
        )
        .route(
            "/api/v1/resumes/:id/entries/:entry_id/selection",
            put(store::handle_set_selection),
        )
        // Enhancement Client
        .route(
            "/api/v1/resumes/:id/entries/:entry_id/enhance",
            post(enhance::handle_enhance_entry),
        )
        // Matcher
        .route("/api/v1/resumes/:id/match", post(matching::handle_match))
        // Company Analyzer
        .route(
            "/api/v1/company/analyze",
            post(analysis::handle_analyze_company),
        )
        // Exporter
        .route("/api/v1/resumes/:id/export", post(export::handle_export))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::db::memory_pool;
    use crate::export::renderer::fake::FakeRenderer;
    use crate::llm_client::mock::ScriptedGenerator;
    use crate::llm_client::LlmError;
    use crate::matching::selector::{KeywordSelector, SelectorBackend};
    use crate::models::resume::Resume;
    use crate::parser::sample_docx;

    const BOUNDARY: &str = "tailor-test-boundary";

    fn test_config() -> Config {
        Config {
            openai_api_key: "test-key".to_string(),
            openai_model: "scripted".to_string(),
            openai_base_url: "http://localhost:0".to_string(),
            llm_max_retries: 0,
            matcher_backend: SelectorBackend::Keyword,
            database_url: "sqlite::memory:".to_string(),
            typst_bin: "typst".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }

    async fn app_with(generator: Arc<ScriptedGenerator>) -> Router {
        let state = AppState {
            db: memory_pool().await,
            llm: generator,
            config: test_config(),
            selector: Arc::new(KeywordSelector),
            renderer: Arc::new(FakeRenderer::default()),
        };
        build_router(state)
    }

    fn upload_request(file_name: &str, data: &[u8]) -> Request<Body> {
        upload_request_with(file_name, data, &[])
    }

    fn upload_request_with(file_name: &str, data: &[u8], fields: &[(&str, &str)]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "\r\n--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Uploads the sample DOCX and returns the stored resume.
    async fn upload(app: &Router) -> Resume {
        let response = app
            .clone()
            .oneshot(upload_request("resume.docx", &sample_docx()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["method"], "rule_based");
        serde_json::from_value(body["resume"].clone()).unwrap()
    }

    async fn fetch_resume(app: &Router, id: Uuid) -> Resume {
        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/api/v1/resumes/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_value(body_json(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["service"], "tailor-api");
        assert_eq!(body["matcher"], "keyword");
    }

    #[tokio::test]
    async fn test_upload_then_list_and_get() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let resume = upload(&app).await;
        assert!(!resume.sections.is_empty());

        let response = app
            .clone()
            .oneshot(Request::get("/api/v1/resumes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let list = body_json(response).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["name"], "Jane Doe");

        let response = app
            .oneshot(
                Request::get(format!("/api/v1/resumes/{}", resume.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_parse_error() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let response = app
            .oneshot(upload_request("resume.txt", b"plain text resume"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "PARSE_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_resume_is_not_found() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let response = app
            .oneshot(
                Request::get(format!("/api/v1/resumes/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_enhance_rejects_empty_job_description_without_calling_service() {
        let generator = Arc::new(ScriptedGenerator::new(vec![]));
        let app = app_with(generator.clone()).await;
        let resume = upload(&app).await;
        let entry_id = resume.sections[1].entries[0].id;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/resumes/{}/entries/{entry_id}/enhance", resume.id),
                json!({ "text": "   " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_enhance_quota_maps_to_429() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Err(LlmError::Quota {
            message: "insufficient_quota".to_string(),
        })]));
        let app = app_with(generator).await;
        let resume = upload(&app).await;
        let entry_id = resume.sections[1].entries[0].id;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/resumes/{}/entries/{entry_id}/enhance", resume.id),
                json!({ "text": "Senior Rust Engineer" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "QUOTA_ERROR");
    }

    #[tokio::test]
    async fn test_enhance_match_export_flow() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(json!({
            "variations": ["Cut p99 latency 40% by rewriting the Rust cache"]
        })
        .to_string())]));
        let app = app_with(generator).await;
        let resume = upload(&app).await;
        let entry_id = resume.sections[1].entries[0].id;
        let jd = json!({ "text": "Senior Rust Engineer\nRequirements: Rust, latency", "company": "Acme" });

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/resumes/{}/entries/{entry_id}/enhance", resume.id),
                jd.clone(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let enhanced = body_json(response).await;
        let new_id = enhanced["variations"][0]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/resumes/{}/match", resume.id),
                jd,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let outcome = body_json(response).await;
        let selection = outcome["selections"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["entry_id"] == entry_id.to_string())
            .unwrap();
        assert_eq!(selection["variation_id"], new_id.as_str());

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/resumes/{}/export", resume.id),
                json!({ "format": "markdown" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"jane-doe-resume.md\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let markdown = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(markdown.contains("- Cut p99 latency 40% by rewriting the Rust cache"));
    }

    #[tokio::test]
    async fn test_export_with_cleared_selection_is_incomplete() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let resume = upload(&app).await;
        let entry_id = resume.sections[1].entries[0].id;

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/v1/resumes/{}/entries/{entry_id}/selection", resume.id),
                json!({ "variation_id": null }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/resumes/{}/export", resume.id),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INCOMPLETE_SELECTION");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains(&entry_id.to_string()));
    }

    #[tokio::test]
    async fn test_company_analyze() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/company/analyze",
                json!({ "text": "Series A startup, fast-paced, equity", "company": "Acme" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["company"]["company_type"], "startup");
        assert_eq!(body["company"]["tone"], "aggressive_startup");
    }

    #[tokio::test]
    async fn test_malformed_ai_parse_flag_is_rejected() {
        let generator = Arc::new(ScriptedGenerator::new(vec![]));
        let app = app_with(generator.clone()).await;
        let response = app
            .oneshot(upload_request_with(
                "resume.docx",
                &sample_docx(),
                &[("ai_parse", "maybe")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_update_contact_keeps_omitted_fields() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let resume = upload(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                &format!("/api/v1/resumes/{}/contact", resume.id),
                json!({ "name": " Janet Doe ", "title": "Staff Engineer" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Janet Doe");
        assert_eq!(body["contact"]["name"], "Janet Doe");
        assert_eq!(body["contact"]["title"], "Staff Engineer");
        assert_eq!(body["contact"]["email"], "jane@example.com");

        let stored = fetch_resume(&app, resume.id).await;
        assert_eq!(stored.contact.name, "Janet Doe");
    }

    #[tokio::test]
    async fn test_add_and_delete_entry() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let resume = upload(&app).await;
        let section_id = resume.sections[1].id;
        let before = resume.sections[1].entries.len();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/resumes/{}/sections/{section_id}/entries", resume.id),
                json!({ "kind": "bullet", "text": "Mentored four engineers" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let entry = body_json(response).await;
        assert_eq!(entry["variations"].as_array().unwrap().len(), 1);
        assert_eq!(entry["variations"][0]["source"]["type"], "user");
        assert_eq!(entry["selected"], entry["variations"][0]["id"]);

        let stored = fetch_resume(&app, resume.id).await;
        assert_eq!(stored.sections[1].entries.len(), before + 1);
        assert!(stored.is_export_ready());

        let entry_id = entry["id"].as_str().unwrap();
        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/api/v1/resumes/{}/entries/{entry_id}", resume.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let stored = fetch_resume(&app, resume.id).await;
        assert_eq!(stored.sections[1].entries.len(), before);
    }

    #[tokio::test]
    async fn test_add_entry_to_unknown_section_is_not_found() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let resume = upload(&app).await;
        let response = app
            .oneshot(json_request(
                "POST",
                &format!(
                    "/api/v1/resumes/{}/sections/{}/entries",
                    resume.id,
                    Uuid::new_v4()
                ),
                json!({ "kind": "bullet", "text": "Orphan" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_variation_with_select() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let resume = upload(&app).await;
        let entry_id = resume.sections[1].entries[0].id;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/resumes/{}/entries/{entry_id}/variations", resume.id),
                json!({ "text": "Cut p99 latency 40% with a Rust cache", "select": true }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let variation = body_json(response).await;
        let variation_id: Uuid = variation["id"].as_str().unwrap().parse().unwrap();

        let stored = fetch_resume(&app, resume.id).await;
        let entry = stored.entry(entry_id).unwrap();
        assert_eq!(entry.variations.len(), 2);
        assert_eq!(entry.selected, Some(variation_id));
    }

    #[tokio::test]
    async fn test_edit_variation_rejects_empty_text() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let resume = upload(&app).await;
        let entry = &resume.sections[1].entries[0];
        let uri = format!(
            "/api/v1/resumes/{}/entries/{}/variations/{}",
            resume.id, entry.id, entry.variations[0].id
        );

        let response = app
            .clone()
            .oneshot(json_request("PATCH", &uri, json!({ "text": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                &uri,
                json!({ "text": "Reduced p99 latency by 40%" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["text"], "Reduced p99 latency by 40%");
    }

    #[tokio::test]
    async fn test_deleting_selected_variation_blocks_export() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let resume = upload(&app).await;
        let entry = &resume.sections[1].entries[0];
        let selected = entry.selected.unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::delete(format!(
                    "/api/v1/resumes/{}/entries/{}/variations/{selected}",
                    resume.id, entry.id
                ))
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let stored = fetch_resume(&app, resume.id).await;
        assert_eq!(stored.entry(entry.id).unwrap().selected, None);

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/resumes/{}/export", resume.id),
                json!({ "format": "markdown" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INCOMPLETE_SELECTION");
    }

    #[tokio::test]
    async fn test_export_without_body_renders_default_pdf() {
        let app = app_with(Arc::new(ScriptedGenerator::new(vec![]))).await;
        let resume = upload(&app).await;

        let response = app
            .oneshot(
                Request::post(format!("/api/v1/resumes/{}/export", resume.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
