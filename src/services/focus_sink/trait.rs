use crate::config::Config;
use crate::error::Result;
use crate::services::DryRunDesktop;
use std::sync::Arc;

/// Исполнитель действий с окнами
#[async_trait::async_trait]
pub trait FocusSink: Send + Sync {
    /// Сделать окно активным
    async fn focus_window(&self, window_id: u32) -> Result<()>;

    /// Переключиться на пространство (используется при повторной попытке фокуса)
    async fn focus_space(&self, space: u32) -> Result<()>;

    /// Запустить приложение или вывести его на передний план
    async fn launch_app(&self, app_name: &str) -> Result<()>;
}

/// Factory function: dry-run desktop if given, otherwise yabai + open(1)
pub fn create_focus_sink(
    config: &Config,
    dry_run_desktop: Option<Arc<DryRunDesktop>>,
) -> Box<dyn FocusSink> {
    match dry_run_desktop {
        Some(desktop) => Box::new(super::dry_run::DryRunFocusSink::new(desktop)),
        None => Box::new(super::yabai::YabaiFocusSink::new(&config.yabai.binary)),
    }
}
