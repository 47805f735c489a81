pub mod domain;
pub mod error;
pub mod ingest;
pub mod scoring;
pub mod screen;

pub use error::ScreenerError;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_CONCURRENCY: usize = 1;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub alpha_vantage_api_key: Option<String>,
        pub alpha_vantage_base_url: Option<String>,
        pub prices_file: Option<String>,
        pub fetch_timeout: Duration,
        pub concurrency: usize,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let fetch_timeout_secs = std::env::var("SCREENER_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

            let concurrency = std::env::var("SCREENER_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|n| *n >= 1)
                .unwrap_or(DEFAULT_CONCURRENCY);

            Ok(Self {
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                alpha_vantage_api_key: std::env::var("ALPHA_VANTAGE_API_KEY")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                alpha_vantage_base_url: std::env::var("ALPHA_VANTAGE_BASE_URL").ok(),
                prices_file: std::env::var("SCREENER_PRICES_FILE")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                fetch_timeout: Duration::from_secs(fetch_timeout_secs),
                concurrency,
            })
        }

        pub fn require_alpha_vantage_api_key(&self) -> anyhow::Result<&str> {
            self.alpha_vantage_api_key
                .as_deref()
                .context("ALPHA_VANTAGE_API_KEY is required")
        }

        pub fn screen_options(&self) -> crate::screen::ScreenOptions {
            crate::screen::ScreenOptions {
                fetch_timeout: self.fetch_timeout,
                concurrency: self.concurrency,
            }
        }
    }
}
