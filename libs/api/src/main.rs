use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use api::{serve, Config};
use repository::init_repository;
use tokio::net::TcpListener;
use toml::{map::Map, Value};
use tracing_subscriber::EnvFilter;
use util::load_env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let secrets = load_env("Secrets.dev.toml")?;
    let supabase_url = secret(&secrets, "SUPABASE_URL")?;
    let anon_key = secret(&secrets, "SUPABASE_ANON_KEY")?;
    let config = secret(&secrets, "CONFIG")?;

    let config = Config::load(&format!("Config.{}.toml", config))?;

    let client = supabase::Client::new(supabase_url, anon_key)
        .context("failed to build supabase client")?;
    let repository = init_repository(
        &client,
        &config.supabase.table,
        &config.supabase.bucket,
    );

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.server.port));
    let router = serve(repository, config)?;

    let listener = TcpListener::bind(&address).await?;
    Ok(axum::serve(listener, router.into_make_service()).await?)
}

fn secret<'a>(secrets: &'a Map<String, Value>, key: &str) -> anyhow::Result<&'a str> {
    secrets
        .get(key)
        .and_then(Value::as_str)
        .with_context(|| format!("{} was not found in Secrets.dev.toml", key))
}
