//! Application wiring: data directory, settings, database and QR services.

pub mod config;

use std::path::PathBuf;

use artwork_db::Database;
use qr_service::{LocalImageStorage, QrIssuanceService, QrScanService};

pub use config::{AppConfig, SettingsManager};

pub type IssuanceService = QrIssuanceService<Database, LocalImageStorage>;
pub type ScanService = QrScanService<Database>;

/// Determine the data directory for the application.
/// Priority: ARTQR_DATA_DIR env var > ~/.artqr
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ARTQR_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".artqr")
}

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}

/// Open the database under `dir`, seed settings and load config.
pub fn init_foundation(dir: PathBuf) -> Result<(Database, AppConfig, PathBuf), anyhow::Error> {
    std::fs::create_dir_all(&dir)?;
    let db_path = dir.join("artqr.db");

    tracing::info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    let sm = SettingsManager::new(db.clone());
    if let Err(e) = sm.migrate_from_env() {
        tracing::error!("Failed to migrate settings from env: {e}");
    }
    sm.initialize_defaults()?;

    let config = AppConfig::load(&sm, &dir)?;
    tracing::debug!(?config, "Configuration loaded");
    Ok((db, config, dir))
}

/// QR services built from the loaded configuration.
pub struct Services {
    pub issuance: IssuanceService,
    pub scan: ScanService,
}

impl Services {
    pub fn new(db: &Database, config: &AppConfig) -> Result<Self, anyhow::Error> {
        let images = LocalImageStorage::new(config.image_dir.clone(), config.public_base_url.clone())?;
        Ok(Self {
            issuance: QrIssuanceService::with_random_tokens(
                db.clone(),
                db.clone(),
                images,
                config.qr.clone(),
            ),
            scan: QrScanService::new(db.clone(), db.clone()),
        })
    }
}
