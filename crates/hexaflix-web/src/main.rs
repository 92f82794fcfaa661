mod error;
mod render;
mod routes;

use std::sync::{Arc, RwLock};

use anyhow::Result;
use hexaflix_core::config::HexaflixConfig;
use hexaflix_core::profile::Profile;
use hexaflix_core::store::{self, Store};
use hexaflix_core::tmdb::TmdbClient;

pub struct AppState {
    pub config: HexaflixConfig,
    pub profile: Profile<Store>,
    client: RwLock<Option<Arc<TmdbClient>>>,
}

impl AppState {
    pub fn new(config: HexaflixConfig, store: Store) -> Self {
        Self {
            config,
            profile: Profile::new(store),
            client: RwLock::new(None),
        }
    }

    /// The metadata client, when a credential has been configured.
    pub fn tmdb(&self) -> Option<Arc<TmdbClient>> {
        self.client.read().ok().and_then(|slot| slot.clone())
    }

    /// Build and install a metadata client for the given key.
    pub fn install_client(&self, api_key: &str) -> hexaflix_core::error::Result<Arc<TmdbClient>> {
        let client = Arc::new(TmdbClient::new(api_key.to_string(), &self.config.api)?);
        if let Ok(mut slot) = self.client.write() {
            *slot = Some(Arc::clone(&client));
        }
        Ok(client)
    }

    /// Drop the installed client (logout).
    pub fn clear_client(&self) {
        if let Ok(mut slot) = self.client.write() {
            *slot = None;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hexaflix_web=info".parse().unwrap()),
        )
        .init();

    let config = HexaflixConfig::load(None).unwrap_or_else(|_| HexaflixConfig::default_config());
    let store = store::create_store(&config)?;
    let state = Arc::new(AppState::new(config, store));

    // A saved session wins over the configured/environment key.
    let startup_key = state
        .profile
        .session()?
        .map(|s| s.api_key)
        .or_else(|| state.config.configured_api_key());
    if let Some(key) = startup_key {
        state.install_client(&key)?;
    } else {
        tracing::info!("no API key configured; visit /setup to enter one");
    }

    let app = routes::router()
        .with_state(Arc::clone(&state))
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = format!("{}:{}", state.config.web.host, state.config.web.port);
    tracing::info!("hexaflix-web listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
