pub mod alpha_vantage;
pub mod provider;
pub mod static_source;
pub mod types;

use crate::config::Settings;
use provider::PriceSource;
use std::path::Path;
use std::sync::Arc;

/// A price file, when configured, takes precedence over the live provider.
pub fn source_from_settings(settings: &Settings) -> anyhow::Result<Arc<dyn PriceSource>> {
    if let Some(path) = settings.prices_file.as_deref() {
        let source = static_source::StaticPriceSource::from_json_file(Path::new(path))?;
        tracing::info!(path, tickers = source.len(), "using static price file");
        return Ok(Arc::new(source));
    }

    Ok(Arc::new(alpha_vantage::AlphaVantageClient::from_settings(
        settings,
    )?))
}
