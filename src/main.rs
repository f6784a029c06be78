use std::sync::Arc;

use scoreroom::{
    AppState,
    auth::WeChatClient,
    config::{Config, DEFAULT_CONFIG_PATH},
    store::Store,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scoreroom=debug,tower_http=debug")),
        )
        .init();

    let config_path = dotenv::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
    let config = Config::load(&config_path)?;

    let store = Store::connect(&config).await?;
    let wechat = WeChatClient::from_config(&config)?;

    let app_state = AppState {
        store,
        wechat: Arc::new(wechat),
    };

    scoreroom::serve(&config, app_state).await
}
