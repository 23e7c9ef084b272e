use crate::events::WindowInfo;
use crate::error::{AppError, Result};
use crate::utils::command;
use tracing::debug;

use super::r#trait::WindowSource;

pub struct YabaiSource {
    binary: String,
}

impl YabaiSource {
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }

    /// Разобрать вывод `yabai -m query --windows`
    pub fn parse_windows(json: &str) -> Result<Vec<WindowInfo>> {
        let trimmed = json.trim();
        if trimmed.is_empty() {
            return Err(AppError::Internal("yabai вернул пустой ответ".to_string()));
        }
        Ok(serde_json::from_str(trimmed)?)
    }
}

#[async_trait::async_trait]
impl WindowSource for YabaiSource {
    async fn query_windows(&self) -> Result<Vec<WindowInfo>> {
        let stdout = command::run(&self.binary, &["-m", "query", "--windows"]).await?;
        let windows = Self::parse_windows(&stdout)?;
        debug!("yabai вернул {} окон", windows.len());
        Ok(windows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"id": 101, "app": "Safari", "title": "Docs", "frame": {"x": 0.0, "y": 25.0, "w": 900.0, "h": 700.0},
         "role": "AXWindow", "subrole": "AXStandardWindow", "display": 1, "space": 1,
         "has-focus": false, "is-minimized": false},
        {"id": 102, "app": "Safari", "title": "", "frame": {"x": 0.0, "y": 0.0, "w": 400.0, "h": 300.0},
         "role": "AXWindow", "display": 1, "space": 2, "is-minimized": true},
        {"id": 205, "app": "Terminal", "title": "zsh", "role": "AXWindow", "display": 2, "space": 4,
         "has-focus": true}
    ]"#;

    #[test]
    fn test_parse_windows() {
        let windows = YabaiSource::parse_windows(SAMPLE).unwrap();
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].title, "Docs");
        assert!(windows[1].is_minimized);
        assert!(windows[2].has_focus);
        assert_eq!(windows[2].position(), (0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(YabaiSource::parse_windows("").is_err());
        assert!(matches!(
            YabaiSource::parse_windows("yabai: connection refused"),
            Err(AppError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_is_reported() {
        let source = YabaiSource::new("/non/existent/yabai");
        assert!(matches!(
            source.query_windows().await,
            Err(AppError::ServiceUnavailable(_))
        ));
    }
}
