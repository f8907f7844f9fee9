use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use kompas_service::config::Settings;
use kompas_service::core::Matcher;
use kompas_service::routes::{self, AppState};
use kompas_service::services::{ChromiumRenderer, SupabaseClient, SupabaseTables};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    info!("Starting KOMPAS service...");

    if !settings.supabase.has_credentials() {
        warn!("SUPABASE_URL or SUPABASE_SERVICE_KEY is missing; /api/colleague-support will return empty results");
    }

    // Initialize Supabase client
    let tables = SupabaseTables {
        people: settings.supabase.people_table.clone(),
        scores: settings.supabase.scores_view.clone(),
    };

    let store = SupabaseClient::new(
        settings.supabase.url.clone(),
        settings.supabase.service_key.clone(),
        tables,
        Duration::from_secs(settings.supabase.timeout_secs),
    )
    .map_err(|e| {
        error!("Failed to create Supabase client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!("Supabase client initialized");

    // Browser is launched lazily on the first render
    let renderer = ChromiumRenderer::new(settings.renderer.chrome_executable.clone().map(PathBuf::from));

    let app_state = AppState {
        store: Arc::new(store),
        renderer: Arc::new(renderer),
        matcher: Matcher::default(),
        admin_page: PathBuf::from(&settings.admin.page_path),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let max_body_bytes = settings.server.max_body_bytes;

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config(max_body_bytes))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
