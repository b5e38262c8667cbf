//! Database location.
//!
//! Precedence:
//! 1. `--database` on the command line
//! 2. HOTEL_DATABASE_PATH environment variable
//! 3. ~/.config/hotel/hotel.db
//! 4. ./data/hotel.db (fallback for development)

use std::path::PathBuf;

pub const DATABASE_ENV: &str = "HOTEL_DATABASE_PATH";
const DEFAULT_CONFIG_DIR: &str = ".config/hotel";
const DEV_DATA_DIR: &str = "./data";
const DATABASE_FILE: &str = "hotel.db";

/// Resolve the database path, preferring an explicit override.
pub fn get_database_path(cli_override: Option<PathBuf>) -> PathBuf {
    resolve(
        cli_override,
        std::env::var(DATABASE_ENV).ok(),
        std::env::var("HOME").ok(),
    )
}

fn resolve(cli: Option<PathBuf>, env: Option<String>, home: Option<String>) -> PathBuf {
    if let Some(path) = cli {
        return path;
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    if let Some(home) = home {
        return PathBuf::from(home).join(DEFAULT_CONFIG_DIR).join(DATABASE_FILE);
    }
    PathBuf::from(DEV_DATA_DIR).join(DATABASE_FILE)
}
