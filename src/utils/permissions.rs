use crate::config::Config;
use crate::error::{AppError, Result};
use crate::app_error;
use crate::utils::command;
use std::path::Path;
use tracing::{info, warn};

/// Проверить доступ к yabai и каталогу сокета перед запуском демона
pub async fn check_permissions(config: &Config) -> Result<()> {
    info!("Проверка прав доступа...");

    check_yabai_access(&config.yabai.binary).await?;
    check_socket_dir(&config.server.socket_path)?;

    // Проверка, что не запущен от root (рекомендация безопасности)
    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

async fn check_yabai_access(binary: &str) -> Result<()> {
    // Без разрешения Accessibility yabai отвечает ошибкой даже на простой запрос
    match command::run(binary, &["-m", "query", "--spaces", "--space"]).await {
        Ok(_) => {
            info!("yabai отвечает на запросы");
            Ok(())
        }
        Err(AppError::ServiceUnavailable(msg)) => Err(AppError::ServiceUnavailable(msg)),
        Err(e) => Err(app_error!(
            permission,
            "yabai не смог выполнить запрос: {}. Проверьте, что yabai запущен и имеет доступ к Accessibility",
            e
        )),
    }
}

fn check_socket_dir(socket_path: &Path) -> Result<()> {
    let dir = match socket_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let metadata = std::fs::metadata(dir).map_err(|e| {
        AppError::Permission(format!("Каталог сокета {:?} недоступен: {}", dir, e))
    })?;

    if !metadata.is_dir() {
        return Err(AppError::Permission(format!("{:?} не является каталогом", dir)));
    }
    if metadata.permissions().readonly() {
        return Err(AppError::Permission(format!("Нет прав на запись в {:?}", dir)));
    }

    info!("Каталог сокета {:?} доступен", dir);
    Ok(())
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   yabai и уведомления работают в сессии пользователя,");
            warn!("   запускайте демон от имени обычного пользователя");
        }
        Ok(user) => {
            info!("Приложение запущено от имени пользователя: {}", user);
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}

/// Получить рекомендуемые команды для настройки окружения
pub fn get_setup_commands() -> Vec<String> {
    vec![
        "# Установить и запустить yabai:".to_string(),
        "brew install koekeishiya/formulae/yabai".to_string(),
        "yabai --start-service".to_string(),
        "".to_string(),
        "# Выдать yabai доступ к Accessibility:".to_string(),
        "# System Settings -> Privacy & Security -> Accessibility".to_string(),
        "".to_string(),
        "# Привязать горячую клавишу (пример для skhd):".to_string(),
        "alt - tab : wincycle cycle \"$(yabai -m query --windows --window | jq -r .app)\"".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_commands() {
        let commands = get_setup_commands();
        assert!(!commands.is_empty());
        assert!(commands.iter().any(|cmd| cmd.contains("yabai --start-service")));
        assert!(commands.iter().any(|cmd| cmd.contains("wincycle cycle")));
    }

    #[test]
    fn test_socket_dir_checks() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_socket_dir(&dir.path().join("wincycle.sock")).is_ok());
        assert!(check_socket_dir(&dir.path().join("missing").join("wincycle.sock")).is_err());
    }

    #[tokio::test]
    async fn test_missing_yabai_is_service_unavailable() {
        assert!(matches!(
            check_yabai_access("/non/existent/yabai").await,
            Err(AppError::ServiceUnavailable(_))
        ));
    }
}
