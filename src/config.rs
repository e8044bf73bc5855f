use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::summarize::DEFAULT_SPEED_WINDOW;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub max_file_size: usize,
    pub session_ttl: Duration,
    /// Number of consecutive samples averaged for the fastest-speed estimate.
    pub speed_window: usize,
    pub reference_data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            max_file_size: 25 * 1024 * 1024,
            session_ttl: Duration::from_secs(3600),
            speed_window: DEFAULT_SPEED_WINDOW,
            reference_data_dir: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let max_file_size_mb: usize = std::env::var("MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(25);

        let session_ttl_seconds = std::env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600);

        let speed_window = std::env::var("SPEED_WINDOW_POINTS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|w| *w >= 1)
            .unwrap_or(defaults.speed_window);

        let reference_data_dir = std::env::var("REFERENCE_DATA_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            port,
            max_file_size: max_file_size_mb * 1024 * 1024,
            session_ttl: Duration::from_secs(session_ttl_seconds),
            speed_window,
            reference_data_dir,
        }
    }
}
