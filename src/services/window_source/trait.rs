use crate::config::Config;
use crate::events::WindowInfo;
use crate::error::Result;
use crate::services::DryRunDesktop;
use std::sync::Arc;

/// Источник полного списка окон системы
#[async_trait::async_trait]
pub trait WindowSource: Send + Sync {
    async fn query_windows(&self) -> Result<Vec<WindowInfo>>;
}

/// Factory function: dry-run desktop if given, otherwise yabai
pub fn create_window_source(
    config: &Config,
    dry_run_desktop: Option<Arc<DryRunDesktop>>,
) -> Box<dyn WindowSource> {
    match dry_run_desktop {
        Some(desktop) => Box::new(super::dry_run::DryRunSource::new(desktop)),
        None => Box::new(super::yabai::YabaiSource::new(&config.yabai.binary)),
    }
}
