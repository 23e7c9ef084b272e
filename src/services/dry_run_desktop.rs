use crate::events::{WindowFrame, WindowInfo};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU32, Ordering};

/// Эмуляция рабочего стола для dry-run: общий список окон для источника и фокуса
pub struct DryRunDesktop {
    windows: RwLock<Vec<WindowInfo>>,
    active_space: AtomicU32,
    next_id: AtomicU32,
}

impl Default for DryRunDesktop {
    fn default() -> Self {
        Self::sample()
    }
}

impl DryRunDesktop {
    pub fn new(windows: Vec<WindowInfo>) -> Self {
        let next_id = windows.iter().map(|w| w.id).max().unwrap_or(0) + 1;
        let active_space = windows
            .iter()
            .find(|w| w.has_focus)
            .and_then(|w| w.space)
            .unwrap_or(1);

        Self {
            windows: RwLock::new(windows),
            active_space: AtomicU32::new(active_space),
            next_id: AtomicU32::new(next_id),
        }
    }

    /// Несколько приложений на двух пространствах
    pub fn sample() -> Self {
        Self::new(vec![
            WindowInfo::new(1, "Terminal").with_title("build - dry_run").on_space(1, 1).at(0, 25).with_focus(true),
            WindowInfo::new(2, "Terminal").with_title("logs - dry_run").on_space(1, 1).at(720, 25),
            WindowInfo::new(3, "Terminal").with_title("ssh - dry_run").on_space(2, 1).at(0, 25),
            WindowInfo::new(4, "Safari").with_title("Docs - dry_run").on_space(1, 1).at(0, 25),
            WindowInfo::new(5, "Safari").with_title("Mail - dry_run").on_space(2, 1).at(0, 25).minimized(),
            WindowInfo::new(6, "Finder").with_title("Info - dry_run").on_space(1, 1).at(40, 40).with_role("AXPanel"),
        ])
    }

    pub fn windows(&self) -> Vec<WindowInfo> {
        self.windows.read().clone()
    }

    #[allow(dead_code)]
    pub fn focused_id(&self) -> Option<u32> {
        self.windows.read().iter().find(|w| w.has_focus).map(|w| w.id)
    }

    pub fn active_space(&self) -> u32 {
        self.active_space.load(Ordering::Relaxed)
    }

    /// Перенести фокус на окно; false, если окна нет
    pub fn focus_window(&self, window_id: u32) -> bool {
        let mut windows = self.windows.write();
        let Some(space) = windows.iter().find(|w| w.id == window_id).map(|w| w.space) else {
            return false;
        };

        for window in windows.iter_mut() {
            window.has_focus = window.id == window_id;
        }
        if let Some(space) = space {
            self.active_space.store(space, Ordering::Relaxed);
        }
        true
    }

    pub fn focus_space(&self, space: u32) -> bool {
        let exists = self.windows.read().iter().any(|w| w.space == Some(space));
        if exists {
            self.active_space.store(space, Ordering::Relaxed);
        }
        exists
    }

    /// "Запуск" приложения: новое окно с фокусом на активном пространстве
    pub fn launch_app(&self, app_name: &str) -> u32 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let space = self.active_space();

        let mut window = WindowInfo::new(id, app_name)
            .with_title(format!("{} - dry_run", app_name))
            .on_space(space, 1);
        window.frame = WindowFrame { x: 100.0, y: 100.0, w: 800.0, h: 600.0 };

        let mut windows = self.windows.write();
        for other in windows.iter_mut() {
            other.has_focus = false;
        }
        window.has_focus = true;
        windows.push(window);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_moves_between_windows() {
        let desktop = DryRunDesktop::sample();
        assert_eq!(desktop.focused_id(), Some(1));

        assert!(desktop.focus_window(3));
        assert_eq!(desktop.focused_id(), Some(3));
        assert_eq!(desktop.active_space(), 2);

        assert!(!desktop.focus_window(999));
        assert_eq!(desktop.focused_id(), Some(3));
    }

    #[test]
    fn test_launch_app_adds_focused_window() {
        let desktop = DryRunDesktop::sample();
        let id = desktop.launch_app("Notes");

        assert_eq!(id, 7);
        assert_eq!(desktop.focused_id(), Some(7));
        assert!(desktop.windows().iter().any(|w| w.app_name == "Notes" && w.is_eligible()));
    }

    #[test]
    fn test_focus_space_requires_known_space() {
        let desktop = DryRunDesktop::sample();
        assert!(desktop.focus_space(2));
        assert_eq!(desktop.active_space(), 2);
        assert!(!desktop.focus_space(9));
        assert_eq!(desktop.active_space(), 2);
    }
}
