use crate::config::FocusConfig;
use crate::error::{AppError, CycleError, Result};
use crate::events::{CycleRequest, CycleResponse, WindowInfo};
use crate::services::focus_sink::FocusSink;
use crate::services::notifier::Notifier;
use crate::services::window_cycler::WindowCycler;
use crate::services::window_source::WindowSource;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Политика вызывающей стороны: источник окон -> WindowCycler -> фокус,
/// с запуском приложения, повторной попыткой и уведомлениями
pub struct CycleController {
    cycler: Arc<WindowCycler>,
    source: Box<dyn WindowSource>,
    focus: Box<dyn FocusSink>,
    notifier: Box<dyn Notifier>,
    focus_config: FocusConfig,
}

impl CycleController {
    pub fn new(
        cycler: Arc<WindowCycler>,
        source: Box<dyn WindowSource>,
        focus: Box<dyn FocusSink>,
        notifier: Box<dyn Notifier>,
        focus_config: FocusConfig,
    ) -> Self {
        Self {
            cycler,
            source,
            focus,
            notifier,
            focus_config,
        }
    }

    pub async fn handle(&self, request: CycleRequest) -> CycleResponse {
        info!("Обработка запроса: {}", request);

        let result = match request {
            CycleRequest::Cycle { app } => self.cycle(&app).await,
            CycleRequest::Reset { app } => Ok(self.reset(app.as_deref())),
            CycleRequest::Inspect { app } => Ok(self.inspect(&app)),
            CycleRequest::List { app } => self.list(&app).await,
        };

        result.unwrap_or_else(|e| CycleResponse::from(&e))
    }

    /// Переключиться на следующее окно приложения
    pub async fn cycle(&self, app: &str) -> Result<CycleResponse> {
        let windows = match self.source.query_windows().await {
            Ok(windows) => windows,
            Err(e) => {
                error!("Не удалось получить список окон: {}", e);
                self.notifier.show(&format!("Не удалось получить список окон: {}", e)).await;
                return Err(e);
            }
        };

        match self.cycler.select_next(app, &windows) {
            Ok(window) => {
                self.focus_with_retry(&window).await?;
                Ok(CycleResponse::focused(window))
            }
            Err(CycleError::NoWindowsFound { app }) if self.focus_config.launch_on_empty => {
                info!("У '{}' нет окон, запускаем приложение", app);
                if let Err(e) = self.focus.launch_app(&app).await {
                    error!("Не удалось запустить '{}': {}", app, e);
                    self.notifier.show(&format!("Не удалось запустить {}", app)).await;
                    return Err(e);
                }
                Ok(CycleResponse::message(format!("Запущено приложение {}", app)))
            }
            Err(e) => {
                warn!("{}", e);
                self.notifier.show(&e.to_string()).await;
                Err(e.into())
            }
        }
    }

    /// Фокус; при неудаче: пространство окна, пауза, ещё одна попытка
    async fn focus_with_retry(&self, window: &WindowInfo) -> Result<()> {
        let first_error = match self.focus.focus_window(window.id).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        warn!("Фокус на окне {} не удался: {}. Пробуем через пространство", window, first_error);

        if let Some(space) = window.space {
            if let Err(e) = self.focus.focus_space(space).await {
                warn!("Не удалось переключиться на пространство {}: {}", space, e);
            }
        }
        sleep(self.focus_config.retry_delay()).await;

        match self.focus.focus_window(window.id).await {
            Ok(()) => {
                info!("Окно {} сфокусировано со второй попытки", window);
                Ok(())
            }
            Err(e) => {
                let failure = CycleError::FocusFailed {
                    window_id: window.id,
                    reason: e.to_string(),
                };
                error!("{}", failure);
                self.notifier.show(&format!("Не удалось переключиться на {}", window)).await;
                Err(AppError::Cycle(failure))
            }
        }
    }

    pub fn reset(&self, app: Option<&str>) -> CycleResponse {
        self.cycler.reset_state(app);
        match app {
            Some(app) => CycleResponse::message(format!("Состояние '{}' сброшено", app)),
            None => CycleResponse::message("Состояние всех приложений сброшено"),
        }
    }

    pub fn inspect(&self, app: &str) -> CycleResponse {
        match self.cycler.inspect_state(app) {
            Some(state) => CycleResponse::Ok {
                message: format!("Состояние '{}'", app),
                window: None,
                state: Some(state.snapshot(Instant::now())),
                windows: Vec::new(),
            },
            None => CycleResponse::message(format!("Для '{}' состояния ещё нет", app)),
        }
    }

    /// Порядок переключения без изменения состояния
    pub async fn list(&self, app: &str) -> Result<CycleResponse> {
        let windows = self.source.query_windows().await?;
        let ordered = self.cycler.eligible_order(app, &windows)?;
        Ok(CycleResponse::Ok {
            message: format!("{} окон '{}' в порядке переключения", ordered.len(), app),
            window: None,
            state: None,
            windows: ordered,
        })
    }
}
