use crate::config::MediaHostConfig;
use crate::services::media_host::{HttpMediaHost, MediaHost};
use std::sync::Arc;
use tracing::{info, warn};

pub fn setup_media_host(config: &MediaHostConfig) -> anyhow::Result<Arc<dyn MediaHost>> {
    if !config.is_configured() {
        warn!("⚠️ Media host credentials missing; uploads will be rejected by the host");
    }

    info!("☁️  Media host: {}", config.upload_url);

    Ok(Arc::new(HttpMediaHost::new(config.clone())?))
}
