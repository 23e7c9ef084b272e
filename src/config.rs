use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Минимальная ёмкость истории: детектор пинг-понга смотрит на последние 4 записи
pub const MIN_HISTORY_CAPACITY: usize = 4;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub cycle: CycleConfig,
    pub yabai: YabaiConfig,
    pub focus: FocusConfig,
    pub notify: NotifyConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Параметры эвристики защиты от пинг-понга
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CycleConfig {
    /// Окно "быстрых" повторных вызовов, в пределах которого ведётся история
    pub rapid_cycle_window_ms: u64,
    pub history_capacity: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YabaiConfig {
    pub binary: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FocusConfig {
    /// Пауза между переключением пространства и повторной попыткой фокуса
    pub retry_delay_ms: u64,
    /// Запускать приложение, если у него нет ни одного окна
    pub launch_on_empty: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifyConfig {
    pub enabled: bool,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub socket_path: PathBuf,
}

impl CycleConfig {
    pub fn rapid_cycle_window(&self) -> Duration {
        Duration::from_millis(self.rapid_cycle_window_ms)
    }
}

impl FocusConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            rapid_cycle_window_ms: 2000,
            history_capacity: MIN_HISTORY_CAPACITY,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            cycle: CycleConfig::default(),
            yabai: YabaiConfig {
                binary: "yabai".to_string(),
            },
            focus: FocusConfig {
                retry_delay_ms: 100,
                launch_on_empty: true,
            },
            notify: NotifyConfig {
                enabled: true,
                title: "wincycle".to_string(),
            },
            server: ServerConfig {
                socket_path: PathBuf::from("/tmp/wincycle.sock"),
            },
        }
    }
}

impl Config {
    /// Значения по умолчанию, затем TOML-файл (если есть), затем переменные WINCYCLE_*
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("WINCYCLE_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация эвристики пинг-понга
        if self.cycle.rapid_cycle_window_ms == 0 {
            anyhow::bail!("rapid_cycle_window_ms должно быть больше 0");
        }

        if self.cycle.history_capacity < MIN_HISTORY_CAPACITY {
            anyhow::bail!(
                "history_capacity должно быть минимум {}",
                MIN_HISTORY_CAPACITY
            );
        }

        if self.yabai.binary.trim().is_empty() {
            anyhow::bail!("Путь к yabai не может быть пустым");
        }

        if self.focus.retry_delay_ms == 0 || self.focus.retry_delay_ms > 5000 {
            anyhow::bail!("retry_delay_ms должно быть от 1 до 5000");
        }

        if self.server.socket_path.as_os_str().is_empty() {
            anyhow::bail!("socket_path не может быть пустым");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cycle.rapid_cycle_window(), Duration::from_secs(2));
        assert_eq!(config.cycle.history_capacity, 4);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cycle.history_capacity = 3;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cycle.rapid_cycle_window_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.yabai.binary = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.focus.retry_delay_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.focus.retry_delay_ms = 5001;
        assert!(config.validate().is_err());
    }

    // Jail сериализует тесты и восстанавливает окружение, поэтому WINCYCLE_*
    // из одного теста не попадают в другой

    #[test]
    fn test_load_missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::load("absent.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.yabai.binary, "yabai");
            assert!(config.focus.launch_on_empty);
            Ok(())
        });
    }

    #[test]
    fn test_load_partial_toml_merges_with_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "wincycle.toml",
                "[cycle]\nrapid_cycle_window_ms = 1500\n\n[focus]\nlaunch_on_empty = false",
            )?;

            let config = Config::load("wincycle.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.cycle.rapid_cycle_window_ms, 1500);
            assert_eq!(config.cycle.history_capacity, 4);
            assert!(!config.focus.launch_on_empty);
            assert_eq!(config.focus.retry_delay_ms, 100);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "wincycle.toml",
                "[cycle]\nhistory_capacity = 5\n\n[server]\nsocket_path = \"/tmp/from-file.sock\"",
            )?;
            jail.set_env("WINCYCLE_CYCLE__HISTORY_CAPACITY", "6");
            jail.set_env("WINCYCLE_LOGGING__LEVEL", "debug");

            let config = Config::load("wincycle.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.cycle.history_capacity, 6);
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.server.socket_path, PathBuf::from("/tmp/from-file.sock"));
            Ok(())
        });
    }

    #[test]
    fn test_env_value_is_validated() {
        Jail::expect_with(|jail| {
            jail.set_env("WINCYCLE_FOCUS__RETRY_DELAY_MS", "0");
            assert!(Config::load("absent.toml").is_err());
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        Jail::expect_with(|jail| {
            jail.create_file("wincycle.toml", "[cycle]\nhistory_capacity = 2")?;
            assert!(Config::load("wincycle.toml").is_err());
            Ok(())
        });
    }
}
