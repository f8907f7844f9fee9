// Integration tests for the KOMPAS service HTTP surface

use actix_web::{middleware, test, web, App};
use async_trait::async_trait;
use kompas_service::core::Matcher;
use kompas_service::models::{ColleagueSuggestion, CompetencyScore, ErrorResponse, Person};
use kompas_service::routes::{self, AppState};
use kompas_service::services::{PdfRenderer, RenderError, ScoreStore, StoreError, SupabaseClient, SupabaseTables};
use serde_json::json;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory store keyed by project id
struct MemoryStore {
    people: Vec<(String, Person)>,
    scores: Vec<(String, CompetencyScore)>,
}

#[async_trait]
impl ScoreStore for MemoryStore {
    async fn fetch_people(&self, project_id: &str) -> Result<Vec<Person>, StoreError> {
        Ok(self
            .people
            .iter()
            .filter(|(project, _)| project == project_id)
            .map(|(_, p)| p.clone())
            .collect())
    }

    async fn fetch_scores(
        &self,
        project_id: &str,
        competency_ids: &[String],
    ) -> Result<Vec<CompetencyScore>, StoreError> {
        Ok(self
            .scores
            .iter()
            .filter(|(project, s)| project == project_id && competency_ids.contains(&s.category_id))
            .map(|(_, s)| s.clone())
            .collect())
    }
}

struct BrokenStore;

#[async_trait]
impl ScoreStore for BrokenStore {
    async fn fetch_people(&self, _project_id: &str) -> Result<Vec<Person>, StoreError> {
        Err(StoreError::MissingCredentials)
    }

    async fn fetch_scores(
        &self,
        _project_id: &str,
        _competency_ids: &[String],
    ) -> Result<Vec<CompetencyScore>, StoreError> {
        Err(StoreError::MissingCredentials)
    }
}

/// Renderer that echoes the document into a fake PDF and counts calls
#[derive(Default)]
struct EchoRenderer {
    calls: AtomicUsize,
}

#[async_trait]
impl PdfRenderer for EchoRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut bytes = b"%PDF-1.7\n".to_vec();
        bytes.extend_from_slice(html.as_bytes());
        Ok(bytes)
    }
}

/// Renderer that fails once a given number of documents went through
struct FailingRenderer {
    succeed_first: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl PdfRenderer for FailingRenderer {
    async fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.succeed_first {
            Ok(b"%PDF-1.7\n".to_vec())
        } else {
            Err(RenderError::Pdf("renderer crashed: secret internal detail".to_string()))
        }
    }
}

fn person(id: &str, name: &str) -> Person {
    Person {
        id: id.to_string(),
        full_name: name.to_string(),
    }
}

fn score(target: &str, category: &str, name: &str, avg: Option<f64>) -> CompetencyScore {
    CompetencyScore {
        target_id: target.to_string(),
        category_id: category.to_string(),
        category_name: name.to_string(),
        safe_avg: avg,
    }
}

fn memory_store() -> MemoryStore {
    let project = "proj-1".to_string();
    MemoryStore {
        people: vec![
            (project.clone(), person("p1", "Anna Holm")),
            (project.clone(), person("p2", "Bo Lund")),
            (project.clone(), person("p3", "Carl Dahl")),
            ("proj-2".to_string(), person("x1", "Other Project")),
        ],
        scores: vec![
            (project.clone(), score("p1", "lead", "Leadership", Some(4.8))),
            (project.clone(), score("p2", "lead", "Leadership", Some(4.1))),
            (project.clone(), score("p1", "comm", "Communication", Some(4.9))),
            (project.clone(), score("p3", "comm", "Communication", Some(3.2))),
            (project.clone(), score("p2", "plan", "Planning", None)),
            ("proj-2".to_string(), score("x1", "lead", "Leadership", Some(5.0))),
        ],
    }
}

fn state(store: Arc<dyn ScoreStore>, renderer: Arc<dyn PdfRenderer>) -> AppState {
    AppState {
        store,
        renderer,
        matcher: Matcher::default(),
        admin_page: PathBuf::from("does-not-exist/admin.html"),
    }
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(routes::json_config(16 * 1024 * 1024))
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn items(names: &[&str]) -> serde_json::Value {
    json!(names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "filename": name, "html": format!("<p>item {}</p>", i) }))
        .collect::<Vec<_>>())
}

#[actix_web::test]
async fn test_colleague_support_priority_order() {
    let app = app!(state(Arc::new(memory_store()), Arc::new(EchoRenderer::default())));

    let req = test::TestRequest::post()
        .uri("/api/colleague-support")
        .set_json(json!({ "project_id": "proj-1", "competencies": ["lead", "comm", "plan"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Vec<ColleagueSuggestion> = test::read_body_json(resp).await;
    assert_eq!(
        body,
        vec![
            ColleagueSuggestion { full_name: "Anna Holm".into(), competency: "Leadership".into() },
            ColleagueSuggestion { full_name: "Carl Dahl".into(), competency: "Communication".into() },
        ]
    );
}

#[actix_web::test]
async fn test_colleague_support_excludes_target() {
    let app = app!(state(Arc::new(memory_store()), Arc::new(EchoRenderer::default())));

    let req = test::TestRequest::post()
        .uri("/api/colleague-support")
        .set_json(json!({ "project_id": "proj-1", "competencies": ["comm", "lead"], "target_id": "p1" }))
        .to_request();
    let body: Vec<ColleagueSuggestion> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.len(), 2);
    assert!(body.iter().all(|s| s.full_name != "Anna Holm"));
    assert_eq!(body[0].full_name, "Carl Dahl");
    assert_eq!(body[1].full_name, "Bo Lund");
}

#[actix_web::test]
async fn test_colleague_support_unknown_project_is_empty() {
    let app = app!(state(Arc::new(memory_store()), Arc::new(EchoRenderer::default())));

    let req = test::TestRequest::post()
        .uri("/api/colleague-support")
        .set_json(json!({ "project_id": "nope", "competencies": ["lead"] }))
        .to_request();
    let body: Vec<ColleagueSuggestion> = test::call_and_read_body_json(&app, req).await;

    assert!(body.is_empty());
}

#[actix_web::test]
async fn test_colleague_support_fails_open() {
    let app = app!(state(Arc::new(BrokenStore), Arc::new(EchoRenderer::default())));

    let req = test::TestRequest::post()
        .uri("/api/colleague-support")
        .set_json(json!({ "project_id": "proj-1", "competencies": ["lead"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Vec<ColleagueSuggestion> = test::read_body_json(resp).await;
    assert!(body.is_empty());
}

#[actix_web::test]
async fn test_combined_render_returns_single_pdf() {
    let renderer = Arc::new(EchoRenderer::default());
    let app = app!(state(Arc::new(memory_store()), renderer.clone()));

    let req = test::TestRequest::post()
        .uri("/api/pdf/render")
        .set_json(json!({ "mode": "combined", "title": "Team report", "items": items(&["a", "b", "c"]) }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("content-type").unwrap(), "application/pdf");
    assert_eq!(
        resp.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"Team_report.pdf\""
    );

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF"));
    let text = String::from_utf8_lossy(&body);
    assert_eq!(text.matches("<section").count(), 3);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_separate_render_returns_zip_entries() {
    let renderer = Arc::new(EchoRenderer::default());
    let app = app!(state(Arc::new(memory_store()), renderer.clone()));

    let req = test::TestRequest::post()
        .uri("/api/pdf/render")
        .set_json(json!({ "mode": "separate", "items": items(&["A B?.html", "second one", "???"]) }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("content-type").unwrap(), "application/zip");
    assert_eq!(
        resp.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"results.zip\""
    );

    let body = test::read_body(resp).await;
    let mut archive = zip::ZipArchive::new(Cursor::new(body.to_vec())).unwrap();
    let names: Vec<String> = archive.file_names().map(String::from).collect();
    assert_eq!(archive.len(), 3);
    assert!(names.contains(&"A_B.pdf".to_string()));
    assert!(names.contains(&"second_one.pdf".to_string()));
    assert!(names.contains(&"profile.pdf".to_string()));

    let mut content = String::new();
    archive.by_name("second_one.pdf").unwrap().read_to_string(&mut content).unwrap();
    assert!(content.contains("<p>item 1</p>"));
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 3);
}

#[actix_web::test]
async fn test_separate_render_entry_named_after_sanitized_filename() {
    let app = app!(state(Arc::new(memory_store()), Arc::new(EchoRenderer::default())));

    let req = test::TestRequest::post()
        .uri("/api/pdf/render")
        .set_json(json!({ "mode": "separate", "items": items(&["A B?", "x", "y"]) }))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;

    let archive = zip::ZipArchive::new(Cursor::new(body.to_vec())).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    assert!(names.contains(&"A_B.pdf"));
}

#[actix_web::test]
async fn test_rendered_files_skip_response_compression() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(Arc::new(memory_store()), Arc::new(EchoRenderer::default()))))
            .app_data(routes::json_config(16 * 1024 * 1024))
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes),
    )
    .await;

    for mode in ["combined", "separate"] {
        let req = test::TestRequest::post()
            .uri("/api/pdf/render")
            .insert_header(("accept-encoding", "gzip"))
            .set_json(json!({ "mode": mode, "items": items(&["a", "b"]) }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let encoding = resp.headers().get("content-encoding").map(|v| v.to_str().unwrap().to_string());
        assert!(encoding.is_none() || encoding.as_deref() == Some("identity"), "mode {} got {:?}", mode, encoding);

        let body = test::read_body(resp).await;
        let magic: &[u8] = if mode == "combined" { b"%PDF" } else { b"PK" };
        assert!(body.starts_with(magic));
    }
}

#[actix_web::test]
async fn test_empty_items_is_bad_request() {
    let renderer = Arc::new(EchoRenderer::default());
    let app = app!(state(Arc::new(memory_store()), renderer.clone()));

    let req = test::TestRequest::post()
        .uri("/api/pdf/render")
        .set_json(json!({ "mode": "combined", "items": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "items must be non-empty");
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_unknown_mode_is_bad_request() {
    let app = app!(state(Arc::new(memory_store()), Arc::new(EchoRenderer::default())));

    let req = test::TestRequest::post()
        .uri("/api/pdf/render")
        .set_json(json!({ "mode": "merged", "items": items(&["a"]) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_too_many_items_is_payload_too_large() {
    let renderer = Arc::new(EchoRenderer::default());
    let app = app!(state(Arc::new(memory_store()), renderer.clone()));

    let names: Vec<String> = (0..501).map(|i| format!("f{}", i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let req = test::TestRequest::post()
        .uri("/api/pdf/render")
        .set_json(json!({ "mode": "separate", "items": items(&refs) }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 413);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_render_failure_is_generic_500_without_partial_zip() {
    let renderer = Arc::new(FailingRenderer {
        succeed_first: 2,
        calls: AtomicUsize::new(0),
    });
    let app = app!(state(Arc::new(memory_store()), renderer));

    let req = test::TestRequest::post()
        .uri("/api/pdf/render")
        .set_json(json!({ "mode": "separate", "items": items(&["a", "b", "c"]) }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    assert_eq!(resp.headers().get("content-type").unwrap(), "application/json");

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "PDF rendering failed");
    assert!(!body.message.contains("secret"));
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = app!(state(Arc::new(memory_store()), Arc::new(EchoRenderer::default())));

    let req = test::TestRequest::post()
        .uri("/api/pdf/render")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"mode\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_missing_admin_page_is_not_found() {
    let app = app!(state(Arc::new(memory_store()), Arc::new(EchoRenderer::default())));

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_admin_page_served_when_present() {
    let dir = std::env::temp_dir().join(format!("kompas-admin-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let page = dir.join("admin.html");
    std::fs::write(&page, "<h1>admin</h1>").unwrap();

    let mut app_state = state(Arc::new(memory_store()), Arc::new(EchoRenderer::default()));
    app_state.admin_page = page;
    let app = app!(app_state);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"<h1>admin</h1>");
}

#[actix_web::test]
async fn test_health_check() {
    let app = app!(state(Arc::new(memory_store()), Arc::new(EchoRenderer::default())));

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

// Supabase client against a mock PostgREST server

fn supabase_client(url: String) -> SupabaseClient {
    SupabaseClient::new(
        Some(url),
        Some("service-secret".to_string()),
        SupabaseTables::default(),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_supabase_fetch_people() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/project_people")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("select".into(), "id,full_name".into()),
            mockito::Matcher::UrlEncoded("project_id".into(), "eq.proj-1".into()),
        ]))
        .match_header("apikey", "service-secret")
        .match_header("authorization", "Bearer service-secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id":"p1","full_name":"Anna Holm"},{"id":"p2","full_name":"Bo Lund"}]"#)
        .create_async()
        .await;

    let client = supabase_client(server.url());
    let people = client.fetch_people("proj-1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(people, vec![person("p1", "Anna Holm"), person("p2", "Bo Lund")]);
}

#[tokio::test]
async fn test_supabase_fetch_scores_with_in_filter() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/v_kompas_series")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("project_id".into(), "eq.proj-1".into()),
            mockito::Matcher::UrlEncoded("category_id".into(), r#"in.("lead","comm")"#.into()),
        ]))
        .with_status(200)
        .with_body(
            r#"[
                {"target_id":"p1","category_id":"lead","category_name":"Leadership","safe_avg":4.5},
                {"target_id":"p2","category_id":"comm","category_name":"Communication","safe_avg":null}
            ]"#,
        )
        .create_async()
        .await;

    let client = supabase_client(server.url());
    let rows = client
        .fetch_scores("proj-1", &["lead".to_string(), "comm".to_string()])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].safe_avg, Some(4.5));
    assert_eq!(rows[1].safe_avg, None);
}

#[tokio::test]
async fn test_supabase_error_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/rest/v1/project_people")
        .match_query(mockito::Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message":"Invalid API key"}"#)
        .create_async()
        .await;

    let client = supabase_client(server.url());
    let err = client.fetch_people("proj-1").await.unwrap_err();

    assert!(matches!(err, StoreError::ApiError { status, .. } if status.as_u16() == 401));
}

#[tokio::test]
async fn test_supabase_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/rest/v1/project_people")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"not":"an array"}"#)
        .create_async()
        .await;

    let client = supabase_client(server.url());
    let err = client.fetch_people("proj-1").await.unwrap_err();

    assert!(matches!(err, StoreError::InvalidResponse(_)));
}

#[actix_web::test]
async fn test_colleague_support_through_supabase_client() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/rest/v1/project_people")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"id":"p1","full_name":"Anna Holm"},{"id":"p2","full_name":"Bo Lund"}]"#)
        .create_async()
        .await;
    server
        .mock("GET", "/rest/v1/v_kompas_series")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            r#"[
                {"target_id":"p1","category_id":"lead","category_name":"Leadership","safe_avg":3.0},
                {"target_id":"p2","category_id":"lead","category_name":"Leadership","safe_avg":3.0}
            ]"#,
        )
        .create_async()
        .await;

    let store = Arc::new(supabase_client(server.url()));
    let app = app!(state(store, Arc::new(EchoRenderer::default())));

    let req = test::TestRequest::post()
        .uri("/api/colleague-support")
        .set_json(json!({ "project_id": "proj-1", "competencies": ["lead"] }))
        .to_request();
    let body: Vec<ColleagueSuggestion> = test::call_and_read_body_json(&app, req).await;

    // Equal scores fall back to name order
    assert_eq!(body, vec![ColleagueSuggestion { full_name: "Anna Holm".into(), competency: "Leadership".into() }]);
}
