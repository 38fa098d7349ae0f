//! Coplate entry point: configuration, migrations, and server bootstrap.

mod server;

use std::env;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use actix_web::{web, HttpServer};
use clap::Parser;
use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use coplate::inbound::http::health::HealthState;
use coplate::inbound::http::state::HttpState;
use coplate::outbound::persistence::{
    DbPool, DieselIdentityService, DieselReviewRepository, DieselUserRepository, PoolConfig,
};

use server::{build_app, ServerConfig};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Command-line options, each with an environment fallback.
#[derive(Debug, Parser)]
#[command(name = "coplate", about = "Restaurant review service")]
struct Cli {
    /// Socket address to listen on.
    #[arg(long, env = "COPLATE_BIND", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    run_migrations(&cli.database_url)?;

    let pool = DbPool::new(PoolConfig::new(&cli.database_url))
        .await
        .map_err(|err| io::Error::other(err.to_string()))?;

    let state = HttpState::new(
        Arc::new(DieselReviewRepository::new(pool.clone())),
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselIdentityService::new(pool)),
    );

    let config = ServerConfig::new(key, cookie_secure, SameSite::Lax, cli.bind);
    let health = web::Data::new(HealthState::new());
    let server_health = health.clone();

    let bind_addr = config.bind_addr();
    let server = HttpServer::new(move || build_app(&config, state.clone(), server_health.clone()))
        .bind(bind_addr)?;

    health.mark_ready();
    server.run().await
}

/// Load the session signing key, falling back to an ephemeral key only in
/// development.
fn load_session_key() -> io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Apply pending schema migrations before accepting traffic.
fn run_migrations(database_url: &str) -> io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| io::Error::other(err.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| io::Error::other(err.to_string()))?;
    Ok(())
}
