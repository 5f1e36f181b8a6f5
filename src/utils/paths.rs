use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

use fintrack_config::Config;
use fintrack_storage_json::{StoragePaths, STORE_FILE};

/// Overrides the application home directory.
pub const HOME_ENV: &str = "FINTRACK_HOME";
const DEFAULT_DIR_NAME: &str = ".fintrack";

/// Returns the application data directory, defaulting to `~/.fintrack`.
pub fn app_home_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Store file and backup directory for `config` under `home`.
pub fn store_paths(home: &Path, config: &Config) -> StoragePaths {
    if config.data_file.is_none() {
        return StoragePaths::in_dir(home);
    }
    StoragePaths::for_store_file(config.resolve_data_file(home, STORE_FILE))
}
