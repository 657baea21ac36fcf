use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info, warn};

use docrename::config::{load_config, Config};
use docrename::pipeline::{LogProgress, Pipeline};
use docrename::watcher::DirectoryWatcher;

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting docrename v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match config_path() {
        Some(path) if path.exists() => match load_config(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                error!("Failed to load config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        _ => Config::default(),
    };
    config.apply_env_overrides();

    if config.llm_api_key.is_empty() {
        warn!("No API key configured (OPENAI_API_KEY); metadata resolution will fail");
    }

    if let Err(e) = std::fs::create_dir_all(&config.watch_folder) {
        error!(
            "Cannot create watch folder '{}': {}",
            config.watch_folder.display(),
            e
        );
        std::process::exit(1);
    }

    let config = Arc::new(config);
    let pipeline = Arc::new(Pipeline::from_config(config.clone()));

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::Relaxed);
        }) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    info!(
        "Watching {} for .pdf files",
        config.watch_folder.display()
    );

    let watcher = DirectoryWatcher::new(&config.watch_folder);
    let dispatch = {
        let pipeline = pipeline.clone();
        move |path: PathBuf| {
            // Failures are already reported through LogProgress. The committed
            // path flows back so the watcher can ignore its own rename.
            pipeline.run_for_path(&path, &LogProgress).ok()
        }
    };

    if let Err(e) = watcher.watch(dispatch, shutdown) {
        error!("Watcher failed: {}", e);
        std::process::exit(1);
    }
}

/// First CLI argument if given, otherwise the platform config location.
fn config_path() -> Option<PathBuf> {
    if let Some(arg) = std::env::args().nth(1) {
        return Some(PathBuf::from(arg));
    }
    dirs::config_dir().map(|dir| dir.join("docrename").join("config.json"))
}
