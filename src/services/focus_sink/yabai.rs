use crate::error::Result;
use crate::utils::command;
use tracing::{debug, info};

use super::r#trait::FocusSink;

pub struct YabaiFocusSink {
    binary: String,
}

impl YabaiFocusSink {
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl FocusSink for YabaiFocusSink {
    async fn focus_window(&self, window_id: u32) -> Result<()> {
        let id = window_id.to_string();
        command::run(&self.binary, &["-m", "window", "--focus", &id]).await?;
        debug!("yabai сфокусировал окно {}", window_id);
        Ok(())
    }

    async fn focus_space(&self, space: u32) -> Result<()> {
        let index = space.to_string();
        command::run(&self.binary, &["-m", "space", "--focus", &index]).await?;
        debug!("yabai переключил пространство на {}", space);
        Ok(())
    }

    async fn launch_app(&self, app_name: &str) -> Result<()> {
        info!("Запуск приложения '{}'", app_name);
        command::run("open", &["-a", app_name]).await?;
        Ok(())
    }
}
