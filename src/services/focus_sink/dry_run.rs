use crate::error::{AppError, Result};
use crate::services::DryRunDesktop;
use std::sync::Arc;
use tracing::info;

use super::r#trait::FocusSink;

pub struct DryRunFocusSink {
    desktop: Arc<DryRunDesktop>,
}

impl DryRunFocusSink {
    pub fn new(desktop: Arc<DryRunDesktop>) -> Self {
        Self { desktop }
    }
}

#[async_trait::async_trait]
impl FocusSink for DryRunFocusSink {
    async fn focus_window(&self, window_id: u32) -> Result<()> {
        if self.desktop.focus_window(window_id) {
            info!("[DRY RUN] Фокус на окне {}", window_id);
            Ok(())
        } else {
            Err(AppError::Command {
                command: format!("focus window {}", window_id),
                stderr: "окно не найдено".to_string(),
            })
        }
    }

    async fn focus_space(&self, space: u32) -> Result<()> {
        if self.desktop.focus_space(space) {
            info!("[DRY RUN] Переключение на пространство {}", space);
            Ok(())
        } else {
            Err(AppError::Command {
                command: format!("focus space {}", space),
                stderr: "пространство не найдено".to_string(),
            })
        }
    }

    async fn launch_app(&self, app_name: &str) -> Result<()> {
        let id = self.desktop.launch_app(app_name);
        info!("[DRY RUN] Запущено приложение '{}' с окном {}", app_name, id);
        Ok(())
    }
}
