use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde_json::{json, Value};
use sqlx::{Pool, Sqlite};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

mod db;
mod error;
mod model;
mod request;

use request::{campaigns, characters, updates, users};

#[derive(Parser, Debug)]
#[command(author, version, about = "Campaign tracker REST backend")]
struct Args {
    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://tracker.db?mode=rwc")]
    database_url: String,

    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    bind_addr: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}", name.to_uppercase());
    println!("ver. {}", version);
    println!();
    println!("running on {}", args.bind_addr);
    println!();
    let pool = db::get_db(&args.database_url).await?;
    let listener = tokio::net::TcpListener::bind(&args.bind_addr).await?;
    axum::serve(listener, app(pool)).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

fn app(pool: Pool<Sqlite>) -> Router {
    let cors = CorsLayer::permissive();
    Router::new()
        .route("/", get(health))
        .route("/campagne", get(campaigns::list).post(campaigns::create))
        .route(
            "/campagne/{id}",
            get(campaigns::detail).delete(campaigns::remove),
        )
        .route("/campagne/{id}/join", post(campaigns::join))
        .route("/campagne/{id}/leave", post(campaigns::leave))
        .route("/personaggi", get(characters::list).post(characters::create))
        .route(
            "/personaggi/{id}",
            get(characters::detail)
                .put(characters::replace)
                .delete(characters::remove),
        )
        .route("/aggiornamenti", get(updates::list).post(updates::create))
        .route("/users", get(users::list))
        .route("/users/login", post(users::login))
        .route("/users/check/{name}", get(users::check_name))
        .route("/users/{id}", get(users::detail))
        .layer(cors)
        .with_state(pool)
}
