use crate::config::NotifyConfig;
use crate::utils::command;
use tracing::{info, warn};

/// Видимое пользователю сообщение. Ошибки показа только логируются
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn show(&self, message: &str);
}

/// Factory function: osascript if enabled, otherwise only the log
pub fn create_notifier(config: &NotifyConfig, dry_run: bool) -> Box<dyn Notifier> {
    if dry_run || !config.enabled {
        Box::new(LogNotifier { dry_run })
    } else {
        Box::new(OsascriptNotifier::new(&config.title))
    }
}

/// Уведомления macOS через `osascript -e 'display notification ...'`
pub struct OsascriptNotifier {
    title: String,
}

impl OsascriptNotifier {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }

    fn script(&self, message: &str) -> String {
        format!(
            "display notification \"{}\" with title \"{}\"",
            escape_applescript(message),
            escape_applescript(&self.title)
        )
    }
}

#[async_trait::async_trait]
impl Notifier for OsascriptNotifier {
    async fn show(&self, message: &str) {
        info!("Уведомление: {}", message);
        let script = self.script(message);
        if let Err(e) = command::run("osascript", &["-e", &script]).await {
            warn!("Не удалось показать уведомление '{}': {}", message, e);
        }
    }
}

pub struct LogNotifier {
    dry_run: bool,
}

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn show(&self, message: &str) {
        if self.dry_run {
            info!("[DRY RUN] Уведомление: {}", message);
        } else {
            warn!("Уведомление (показ отключён): {}", message);
        }
    }
}

fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
