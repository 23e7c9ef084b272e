use crate::events::WindowInfo;
use crate::error::Result;
use crate::services::DryRunDesktop;
use std::sync::Arc;
use tracing::info;

use super::r#trait::WindowSource;

pub struct DryRunSource {
    desktop: Arc<DryRunDesktop>,
}

impl DryRunSource {
    pub fn new(desktop: Arc<DryRunDesktop>) -> Self {
        Self { desktop }
    }
}

#[async_trait::async_trait]
impl WindowSource for DryRunSource {
    async fn query_windows(&self) -> Result<Vec<WindowInfo>> {
        let windows = self.desktop.windows();
        info!("[DRY RUN] Эмулируем список из {} окон", windows.len());
        Ok(windows)
    }
}
