use crate::events::WindowInfo;
use crate::services::window_cycler::CycleStateSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Запрос клиента к демону (одна JSON-строка на запрос)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CycleRequest {
    Cycle { app: String },
    Reset {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        app: Option<String>,
    },
    Inspect { app: String },
    List { app: String },
}

impl fmt::Display for CycleRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleRequest::Cycle { app } => write!(f, "cycle '{}'", app),
            CycleRequest::Reset { app: Some(app) } => write!(f, "reset '{}'", app),
            CycleRequest::Reset { app: None } => write!(f, "reset (все приложения)"),
            CycleRequest::Inspect { app } => write!(f, "inspect '{}'", app),
            CycleRequest::List { app } => write!(f, "list '{}'", app),
        }
    }
}

/// Ответ демона
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleResponse {
    Ok {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        window: Option<WindowInfo>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<CycleStateSnapshot>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        windows: Vec<WindowInfo>,
    },
    Error {
        kind: String,
        message: String,
    },
}

impl CycleResponse {
    pub fn message(message: impl Into<String>) -> Self {
        CycleResponse::Ok {
            message: message.into(),
            window: None,
            state: None,
            windows: Vec::new(),
        }
    }

    pub fn focused(window: WindowInfo) -> Self {
        CycleResponse::Ok {
            message: format!("Фокус на окне {}", window),
            window: Some(window),
            state: None,
            windows: Vec::new(),
        }
    }

    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        CycleResponse::Error {
            kind: kind.into(),
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn is_ok(&self) -> bool {
        matches!(self, CycleResponse::Ok { .. })
    }
}

impl From<&crate::error::AppError> for CycleResponse {
    fn from(err: &crate::error::AppError) -> Self {
        CycleResponse::error(err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request: CycleRequest = serde_json::from_str(r#"{"command":"cycle","app":"Safari"}"#).unwrap();
        assert_eq!(request, CycleRequest::Cycle { app: "Safari".to_string() });

        let reset_all: CycleRequest = serde_json::from_str(r#"{"command":"reset"}"#).unwrap();
        assert_eq!(reset_all, CycleRequest::Reset { app: None });
        assert_eq!(serde_json::to_string(&reset_all).unwrap(), r#"{"command":"reset"}"#);

        assert!(serde_json::from_str::<CycleRequest>(r#"{"command":"explode"}"#).is_err());
    }

    #[test]
    fn test_response_wire_format() {
        let ok = serde_json::to_value(CycleResponse::message("готово")).unwrap();
        assert_eq!(ok["status"], "ok");
        assert!(ok.get("window").is_none());

        let err = CycleResponse::error("no_windows_found", "нет окон");
        assert!(!err.is_ok());
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["kind"], "no_windows_found");
    }

    #[test]
    fn test_focused_response_carries_window() {
        let window = WindowInfo::new(5, "Terminal").on_space(1, 1);
        let response = CycleResponse::focused(window.clone());

        let line = serde_json::to_string(&response).unwrap();
        let parsed: CycleResponse = serde_json::from_str(&line).unwrap();
        match parsed {
            CycleResponse::Ok { window: Some(w), .. } => assert_eq!(w, window),
            other => panic!("неожиданный ответ: {:?}", other),
        }
    }
}
