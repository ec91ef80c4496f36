use std::{env, fs, path::Path, path::PathBuf, sync::Once};

use crate::errors::TrackerError;

const DEFAULT_DIR_NAME: &str = ".spendtrack";
const LEDGER_FILE: &str = "ledger.json";
const CONFIG_FILE: &str = "config.json";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("spendtrack=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Returns the application data directory, defaulting to `~/.spendtrack`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("SPENDTRACK_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path of the single ledger snapshot file.
pub fn ledger_file() -> PathBuf {
    app_data_dir().join(LEDGER_FILE)
}

/// Path of the app configuration file.
pub fn config_file() -> PathBuf {
    app_data_dir().join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> Result<(), TrackerError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
