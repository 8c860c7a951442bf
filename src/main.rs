use api::Config;
use repository::init_repository;
use shuttle_runtime::{Error, SecretStore, Secrets};
use tracing_subscriber::EnvFilter;

#[shuttle_runtime::main]
async fn main(
    #[Secrets] secret_store: SecretStore,
) -> shuttle_axum::ShuttleAxum {
    if secret_store.get("ENV").map_or(true, |env| env == "prod") {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let Some(supabase_url) = secret_store.get("SUPABASE_URL") else {
        return Err(Error::BuildPanic(
            "SUPABASE_URL was not found".to_string(),
        ));
    };
    let Some(anon_key) = secret_store.get("SUPABASE_ANON_KEY") else {
        return Err(Error::BuildPanic(
            "SUPABASE_ANON_KEY was not found".to_string(),
        ));
    };
    let Some(config) = secret_store.get("CONFIG") else {
        return Err(Error::BuildPanic("CONFIG was not found".to_string()));
    };

    let config = Config::load(&format!("Config.{}.toml", config))
        .map_err(|e| Error::BuildPanic(e.to_string()))?;
    let client = supabase::Client::new(supabase_url, anon_key)
        .map_err(|e| Error::BuildPanic(e.to_string()))?;
    let repository = init_repository(
        &client,
        &config.supabase.table,
        &config.supabase.bucket,
    );

    let router = api::serve(repository, config)
        .map_err(|e| Error::BuildPanic(e.to_string()))?;

    Ok(router.into())
}
