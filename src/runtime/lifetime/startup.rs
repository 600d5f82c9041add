use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analytics::{EventRecorder, create_sink};
use crate::config::StaticConfig;
use crate::deck::DeckStore;
use crate::render::PageContext;

/// Shared state handed to every HTTP worker
#[derive(Clone)]
pub struct StartupContext {
    pub store: Arc<DeckStore>,
    pub recorder: Arc<EventRecorder>,
    pub pages: PageContext,
}

/// CLI 模式预处理（预留扩展点）
#[cfg(feature = "cli")]
pub async fn cli_pre_startup() {
    debug!("CLI mode, skipping server startup");
}

/// 准备服务器启动的上下文
/// 包括 deck 目录、事件 sink 和页面配置
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let sink = create_sink(&config.analytics).context("Failed to create log sink")?;
    let recorder = Arc::new(EventRecorder::from_config(sink, &config.analytics));
    info!(
        "Event log sink: {} (group {})",
        config.analytics.sink,
        recorder.log_group()
    );

    match config.analytics.endpoint() {
        Some(endpoint) => info!("Deck pages post events to {}", endpoint),
        None => warn!("analytics.api_base is empty, client event logging is disabled"),
    }

    let store = Arc::new(DeckStore::from_config(&config.deck));
    let preload = Arc::clone(&store);
    let deck = tokio::task::spawn_blocking(move || preload.load())
        .await
        .context("Deck preload task failed")?;

    if deck.is_empty() {
        warn!(
            "No slides found in {}, serving the empty-deck page",
            store.directory().display()
        );
    } else {
        info!(
            "Deck ready: {} slides in {} sections from {}",
            deck.slide_count(),
            deck.section_count(),
            store.directory().display()
        );
    }

    let pages = PageContext::from_config(config);

    debug!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(StartupContext {
        store,
        recorder,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_prepare_with_memory_sink() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("1-intro.md"), "# Intro\n\n## Hello\n\nHi").unwrap();

        let mut config = StaticConfig::default();
        config.deck.directory = dir.path().display().to_string();
        config.analytics.sink = "memory".to_string();
        config.analytics.api_base = String::new();

        let ctx = prepare_server_startup(&config).await.unwrap();
        assert_eq!(ctx.store.load().slide_count(), 1);
        assert!(ctx.pages.api_base.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_sink_fails() {
        let mut config = StaticConfig::default();
        config.analytics.sink = "cloud".to_string();
        assert!(prepare_server_startup(&config).await.is_err());
    }
}
