//! WindowCycler: выбор следующего окна приложения.
//!
//! Responsibilities (strict):
//! - Filter the raw window list down to eligible windows of one application.
//! - Sort them deterministically and pick the next one after the focused window.
//! - Detect rapid A,B,A,B focus alternation and step past both windows.
//! - Do NOT query or focus windows itself; that belongs to WindowSource/FocusSink.
//!
//! State is kept per application in a DashMap. The whole read-modify-write of
//! `select_next` happens under the entry guard of that application.

use crate::config::{CycleConfig, MIN_HISTORY_CAPACITY};
use crate::debug_if_enabled;
use crate::error::CycleError;
use crate::events::WindowInfo;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// История фокуса; при ёмкости по умолчанию хранится без аллокаций
pub type FocusHistory = SmallVec<[u32; MIN_HISTORY_CAPACITY]>;

/// Состояние переключения для одного приложения
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleState {
    pub last_focused_id: Option<u32>,
    pub recent_history: FocusHistory,
    pub last_cycle_at: Option<Instant>,
}

/// Снимок состояния для диагностики (передаётся клиенту)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStateSnapshot {
    pub last_focused_id: Option<u32>,
    pub recent_history: Vec<u32>,
    pub last_cycle_ago_ms: Option<u64>,
}

impl CycleState {
    pub fn snapshot(&self, now: Instant) -> CycleStateSnapshot {
        CycleStateSnapshot {
            last_focused_id: self.last_focused_id,
            recent_history: self.recent_history.to_vec(),
            last_cycle_ago_ms: self
                .last_cycle_at
                .map(|at| now.saturating_duration_since(at).as_millis() as u64),
        }
    }

    /// Последние четыре записи образуют строгое чередование A,B,A,B
    fn ping_pong_pair(&self) -> Option<(u32, u32)> {
        let len = self.recent_history.len();
        if len < 4 {
            return None;
        }
        let tail = &self.recent_history[len - 4..];
        if tail[0] == tail[2] && tail[1] == tail[3] && tail[0] != tail[1] {
            Some((tail[0], tail[1]))
        } else {
            None
        }
    }
}

pub struct WindowCycler {
    rapid_cycle_window: Duration,
    history_capacity: usize,
    states: DashMap<String, CycleState>,
}

impl Default for WindowCycler {
    fn default() -> Self {
        Self::new(&CycleConfig::default())
    }
}

impl WindowCycler {
    pub fn new(config: &CycleConfig) -> Self {
        info!(
            "Инициализация WindowCycler (окно пинг-понга: {}мс, история: {})",
            config.rapid_cycle_window_ms, config.history_capacity
        );

        Self {
            rapid_cycle_window: config.rapid_cycle_window(),
            history_capacity: config.history_capacity.max(MIN_HISTORY_CAPACITY),
            states: DashMap::new(),
        }
    }

    /// Выбрать следующее окно приложения
    pub fn select_next(&self, app_name: &str, raw_windows: &[WindowInfo]) -> Result<WindowInfo, CycleError> {
        self.select_next_at(app_name, raw_windows, Instant::now())
    }

    /// То же, что `select_next`, но с явным "сейчас"
    pub fn select_next_at(
        &self,
        app_name: &str,
        raw_windows: &[WindowInfo],
        now: Instant,
    ) -> Result<WindowInfo, CycleError> {
        let eligible = self.eligible_order(app_name, raw_windows)?;
        let count = eligible.len();

        // Ошибки выше не создают состояние; дальше работаем под блокировкой записи
        let mut state = self.states.entry(app_name.to_string()).or_default();

        let current_id = eligible
            .iter()
            .find(|w| w.has_focus)
            .map(|w| w.id)
            .or(state.last_focused_id);

        let current_index = current_id.and_then(|id| eligible.iter().position(|w| w.id == id));
        let mut next_index = match current_index {
            Some(index) => (index + 1) % count,
            None => 0,
        };

        let is_rapid = state
            .last_cycle_at
            .is_some_and(|at| now.saturating_duration_since(at) <= self.rapid_cycle_window);

        if is_rapid {
            if let Some(id) = current_id {
                state.recent_history.push(id);
                let overflow = state.recent_history.len().saturating_sub(self.history_capacity);
                if overflow > 0 {
                    state.recent_history.drain(..overflow);
                }
            }
        } else {
            state.recent_history.clear();
        }

        if count > 2 {
            if let Some((a, b)) = state.ping_pong_pair() {
                let naive = next_index;
                next_index = Self::skip_oscillating(&eligible, naive, a, b);
                info!(
                    "Обнаружен пинг-понг между окнами {} и {} приложения '{}': переходим к окну {}",
                    a, b, app_name, eligible[next_index].id
                );
                state.recent_history.clear();
            }
        }

        let chosen = eligible[next_index].clone();
        state.last_focused_id = Some(chosen.id);
        state.last_cycle_at = Some(now);

        debug!(
            "'{}': текущее окно {:?}, выбрано {} ({} из {})",
            app_name,
            current_id,
            chosen,
            next_index + 1,
            count
        );

        Ok(chosen)
    }

    /// Отфильтрованные и отсортированные окна приложения, состояние не меняется
    pub fn eligible_order(&self, app_name: &str, raw_windows: &[WindowInfo]) -> Result<Vec<WindowInfo>, CycleError> {
        let matched: Vec<&WindowInfo> = raw_windows
            .iter()
            .filter(|w| w.app_name == app_name)
            .collect();

        if matched.is_empty() {
            return Err(CycleError::NoWindowsFound { app: app_name.to_string() });
        }

        let mut eligible: Vec<WindowInfo> = matched
            .into_iter()
            .filter(|w| w.is_eligible())
            .cloned()
            .collect();

        if eligible.is_empty() {
            return Err(CycleError::NoEligibleWindows { app: app_name.to_string() });
        }

        eligible.sort_by(WindowInfo::cycle_order);

        debug_if_enabled!(
            "'{}': {} подходящих окон из {}",
            app_name,
            eligible.len(),
            raw_windows.len()
        );

        Ok(eligible)
    }

    /// Сбросить состояние приложения или всех приложений сразу
    pub fn reset_state(&self, app_name: Option<&str>) {
        match app_name {
            Some(app) => {
                if self.states.remove(app).is_some() {
                    info!("Состояние переключения '{}' сброшено", app);
                }
            }
            None => {
                let count = self.states.len();
                self.states.clear();
                info!("Сброшено состояние {} приложений", count);
            }
        }
    }

    pub fn inspect_state(&self, app_name: &str) -> Option<CycleState> {
        self.states.get(app_name).map(|entry| entry.value().clone())
    }

    /// Шаг за наивный индекс, пропуская оба окна пинг-понга
    fn skip_oscillating(eligible: &[WindowInfo], naive: usize, a: u32, b: u32) -> usize {
        let count = eligible.len();
        (1..=count)
            .map(|step| (naive + step) % count)
            .find(|&index| {
                let id = eligible[index].id;
                id != a && id != b
            })
            .unwrap_or(naive)
    }
}
