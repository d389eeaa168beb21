//! Project-wide constants.

use std::path::PathBuf;
use std::time::Duration;

/// API root all Moltbook endpoints are relative to.
pub const BASE_URL: &str = "https://www.moltbook.com/api/v1";

/// Ceiling on a single mutation or verify HTTP call.
pub const API_TIMEOUT: Duration = Duration::from_secs(20);

/// Ceiling on a single solver call. Larger than [`API_TIMEOUT`] so slow
/// generation doesn't get cut off before an answer is emitted.
pub const SOLVER_TIMEOUT: Duration = Duration::from_secs(30);

/// Default database path: `~/.molt/molt.db`.
/// Single DB for the service token and solver configuration.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .expect("cannot determine home directory")
        .join(".molt")
        .join("molt.db")
}
