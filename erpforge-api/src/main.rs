use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use erpforge_agents::Orchestrator;
use erpforge_api::config::ApiConfig;
use erpforge_api::handlers;
use erpforge_api::storage::{initialize_database, SqliteStore};
use erpforge_llm_sdk::claude::ClaudeClient;
use erpforge_llm_sdk::voyage::VoyageClient;
use erpforge_workspace::FileStore;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "erpforge-api", about = "ERP project generation API server")]
struct Args {
    /// Override the configured bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let (config, config_path) = ApiConfig::load().map_err(|e| anyhow::anyhow!(e))?;
    info!(config = %config_path.display(), "configuration loaded");

    let api_keys = config.api_keys.clone().unwrap_or_else(|| {
        erpforge_api::config::ApiKeysConfig {
            anthropic_api_key: None,
            voyage_api_key: None,
        }
    });
    let anthropic_key = api_keys
        .anthropic_api_key
        .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
        .ok_or_else(|| anyhow::anyhow!("no Anthropic API key configured"))?;
    let voyage_key = api_keys
        .voyage_api_key
        .or_else(|| std::env::var("VOYAGE_API_KEY").ok())
        .ok_or_else(|| anyhow::anyhow!("no Voyage API key configured"))?;

    let llm = Arc::new(ClaudeClient::new(anthropic_key)?);
    let embedder = Arc::new(VoyageClient::new(voyage_key)?);

    let connection = initialize_database(&config.database.path)?;
    let store = Arc::new(SqliteStore::new(connection));
    let files = FileStore::new(&config.workspace.root);
    std::fs::create_dir_all(&config.workspace.root)?;

    let orchestrator = Arc::new(Orchestrator::new(
        store.clone(),
        store,
        llm,
        embedder,
        files,
    ));

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let allowed_origins = config
        .cors
        .map(|c| c.allowed_origins)
        .unwrap_or_default();

    info!("Starting erpforge-api server at http://{}:{}", host, port);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allow_any_header();
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(orchestrator.clone()))
            .service(handlers::health::health)
            .service(handlers::projects::create_project)
            .service(handlers::projects::list_projects)
            .service(handlers::projects::get_project)
            .service(handlers::projects::delete_project)
            .service(handlers::chat::post_message)
            .service(handlers::chat::get_messages)
            .service(handlers::chat::generate_prd)
            .service(handlers::chat::get_prd)
            .service(handlers::agents::run_agent)
            .service(handlers::agents::get_qa_report)
            .service(handlers::documents::upload_document)
            .service(handlers::documents::list_documents)
            .service(handlers::files::list_files)
            .service(handlers::files::file_tree)
            .service(handlers::files::read_file)
            .service(handlers::files::write_file)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
