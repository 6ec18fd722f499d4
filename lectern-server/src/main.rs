use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use lectern_api::{AuthToken, Uuid};
use lectern_engine::Limits;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod backend;
mod directory;
mod error;
mod extractors;
mod handlers;
mod threads;


use backend::{MemoryBackend, ThreadBackend};
use directory::Directory;
use error::Error;
use extractors::AppState;
use threads::Threads;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Address to listen on
    #[structopt(short, long, default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// Deepest level replies may be nested at, unbounded if unset
    #[structopt(long)]
    max_depth: Option<usize>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/admin/create-actor", post(handlers::admin_create_actor))
        .route("/api/whoami", get(handlers::whoami))
        .route("/api/contexts/:context/comments", get(handlers::fetch_thread))
        .route("/api/contexts/:context/intents", post(handlers::submit_intent))
        .route("/api/contexts/:context/flagged", get(handlers::fetch_flagged))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_token() -> anyhow::Result<Option<AuthToken>> {
    let tok = match std::env::var("ADMIN_TOKEN") {
        Err(std::env::VarError::NotPresent) => return Ok(None),
        res => res.context("retrieving ADMIN_TOKEN environment variable")?,
    };
    let tok = Uuid::try_parse(&tok).context("parsing ADMIN_TOKEN as an auth token")?;
    Ok(Some(AuthToken(tok)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();

    let admin_token = admin_token()?;
    if admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN is not set, no actor can be created");
    }

    let limits = Limits {
        max_depth: opt.max_depth,
        ..Limits::default()
    };
    let state = AppState {
        threads: Threads::new(Arc::new(MemoryBackend::default()), limits),
        directory: Directory::new(),
        admin_token,
    };

    tracing::info!("listening on {}", opt.listen);
    axum::Server::bind(&opt.listen)
        .serve(app(state).into_make_service())
        .await
        .context("serving axum webserver")
}
