use thiserror::Error;

/// Ошибки выбора окна. Все восстанавливаемые: реакцию выбирает вызывающий код
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    #[error("У приложения '{app}' нет окон")]
    NoWindowsFound { app: String },

    #[error("У приложения '{app}' нет окон, подходящих для переключения")]
    NoEligibleWindows { app: String },

    #[error("Не удалось сфокусировать окно {window_id}: {reason}")]
    FocusFailed { window_id: u32, reason: String },
}

impl CycleError {
    /// Короткое имя вида ошибки для ответа клиенту
    pub fn kind(&self) -> &'static str {
        match self {
            CycleError::NoWindowsFound { .. } => "no_windows_found",
            CycleError::NoEligibleWindows { .. } => "no_eligible_windows",
            CycleError::FocusFailed { .. } => "focus_failed",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error("Внешняя команда '{command}' завершилась с ошибкой: {stderr}")]
    Command { command: String, stderr: String },

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Io(_) => "io",
            AppError::Json(_) => "json",
            AppError::Cycle(e) => e.kind(),
            AppError::Command { .. } => "command",
            AppError::Permission(_) => "permission",
            AppError::ServiceUnavailable(_) => "service_unavailable",
            AppError::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! app_error {
    (permission, $($arg:tt)*) => {
        $crate::error::AppError::Permission(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::AppError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::AppError::Internal(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_error_kind_passes_through() {
        let err: AppError = CycleError::NoEligibleWindows { app: "Safari".to_string() }.into();
        assert_eq!(err.kind(), "no_eligible_windows");
        assert!(err.to_string().contains("Safari"));
    }

    #[test]
    fn test_app_error_macro() {
        let err = app_error!(service_unavailable, "демон {} не отвечает", "wincycle");
        assert_eq!(err.kind(), "service_unavailable");
        assert!(err.to_string().contains("wincycle"));

        let err = app_error!(permission, "{:?} не является сокетом", "/tmp/x");
        assert_eq!(err.kind(), "permission");
    }
}
