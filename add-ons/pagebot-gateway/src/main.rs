//! Axum-based gateway: exposes the pagebot responder to page glue. Config-driven via BotConfig.

mod handlers;

use axum::http::Method;
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use pagebot_core::{BotConfig, BuiltinSource, JsonFileSource, KnowledgeBase, KnowledgeSource, Responder};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Builds the responder from config: knowledge file when configured, bundled content otherwise.
fn load_responder(config: &BotConfig) -> pagebot_core::Result<Responder> {
    let source: Box<dyn KnowledgeSource> = match config.knowledge_path.as_deref() {
        Some(path) if !path.trim().is_empty() => Box::new(JsonFileSource::new(path)),
        _ => Box::new(BuiltinSource),
    };
    let knowledge = KnowledgeBase::from_source(source.as_ref())?;

    if let Some(key) = config.default_topic.as_deref() {
        if knowledge.topic(key).is_none() {
            tracing::warn!(
                target: "pagebot::gateway",
                default_topic = key,
                "default_topic is not a known topic; unmatched page paths will resolve to nothing"
            );
        }
    }

    Ok(Responder::with_policy(knowledge, config.policy.clone())
        .with_default_topic(config.default_topic.clone()))
}

/// Pre-flight check: config parses, knowledge base validates, port is free.
fn run_verify() -> Result<(), String> {
    print!("Checking config... ");
    let config = BotConfig::load().map_err(|e| format!("Config load failed: {}", e))?;
    println!("OK");

    print!("Checking knowledge base... ");
    let responder =
        load_responder(&config).map_err(|e| format!("Knowledge base rejected: {}", e))?;
    println!(
        "OK ({} topics, {} entries)",
        responder.knowledge().len(),
        responder.knowledge().entry_count()
    );

    let port = config.port;
    print!("Checking port {}... ", port);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    match std::net::TcpListener::bind(addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("Port {} BLOCKED: {}", port, e));
        }
    }

    println!("\nSUCCESS: ready to start gateway.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[pagebot-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(BotConfig::load()?);
    let responder = Arc::new(load_responder(&config)?);

    let app = build_app(AppState {
        config: Arc::clone(&config),
        responder,
    });

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!("{} listening on {}", config.app_name, addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_app(state: AppState) -> Router {
    // Page glue may be served from a different origin than the gateway.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/v1/status", get(status))
        .route("/v1/respond", post(handlers::respond::respond))
        .route("/v1/topics", get(handlers::topics::list))
        .route("/v1/topics/:key/greeting", get(handlers::topics::greeting))
        .route("/v1/resolve", get(handlers::topics::resolve))
        .with_state(state)
        .layer(cors)
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<BotConfig>,
    pub(crate) responder: Arc<Responder>,
}

/// GET /v1/status – app identity, topic count and active policy.
async fn status(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "app_name": state.config.app_name,
        "port": state.config.port,
        "topic_count": state.responder.knowledge().len(),
        "policy": state.responder.policy(),
    }))
}
