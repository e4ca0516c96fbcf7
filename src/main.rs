//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use dotenv::dotenv;
use postx::adapters::ai::{GeminiAdapter, MockAiAdapter};
use postx::adapters::persistence::JsonKvStore;
use postx::adapters::ui::tui::TuiInputPort;
use postx::ports::{AiPort, InputPort, KeyValuePort};
use postx::shared::config::AppConfig;
use postx::usecases::{GenerationCoordinator, HistoryStore, IdeaBankService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    postx::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration, using defaults");
        AppConfig::default()
    });

    let data_path = PathBuf::from(cfg.data_dir_or_default());
    tokio::fs::create_dir_all(&data_path)
        .await
        .map_err(|e| anyhow::anyhow!("create data dir: {}", e))?;
    info!(path = %data_path.display(), "data directory");

    // --- AI client: Gemini when a key is present, otherwise canned responses ---
    let ai: Arc<dyn AiPort> = match cfg.api_key() {
        Some(key) => {
            info!(
                model = %cfg.text_model_or_default(),
                url = %cfg.api_base_url_or_default(),
                "Gemini adapter enabled"
            );
            Arc::new(
                GeminiAdapter::new(
                    cfg.api_base_url_or_default(),
                    key,
                    cfg.text_model_or_default(),
                    Duration::from_secs(cfg.request_timeout_secs_or_default()),
                )
                .map_err(|e| anyhow::anyhow!("{}", e))?,
            )
        }
        None => {
            warn!("POSTX_API_KEY / GEMINI_API_KEY not set, using mock AI adapter");
            Arc::new(MockAiAdapter::new())
        }
    };

    // --- History: JSON blob under the data directory ---
    let kv: Arc<dyn KeyValuePort> = Arc::new(JsonKvStore::new(&data_path));
    let history = Arc::new(HistoryStore::load(kv).await);

    // --- Services ---
    let coordinator = Arc::new(GenerationCoordinator::new(Arc::clone(&ai), history));
    let ideas = Arc::new(IdeaBankService::new(ai));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        coordinator,
        ideas,
        data_path.join("images"),
    ));

    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
