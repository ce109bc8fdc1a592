use dirs::{document_dir, home_dir};
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = "TenantLedger";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `<documents>/TenantLedger`.
///
/// `TENANT_LEDGER_HOME` overrides the location; without a documents folder the home
/// directory is used instead.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("TENANT_LEDGER_HOME") {
        return PathBuf::from(custom);
    }
    document_dir()
        .or_else(home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path to the configuration document inside the data directory.
pub fn config_file() -> PathBuf {
    app_data_dir().join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}
