use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Единственная роль, окна с которой участвуют в переключении
pub const ELIGIBLE_ROLE: &str = "AXWindow";

/// Информация об окне в формате `yabai -m query --windows`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WindowInfo {
    pub id: u32,
    #[serde(rename = "app", default)]
    pub app_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub space: Option<u32>,
    #[serde(default)]
    pub display: Option<u32>,
    #[serde(default)]
    pub frame: WindowFrame,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub is_minimized: bool,
    /// Отсутствие флага считается допустимым
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_standard: Option<bool>,
    #[serde(default)]
    pub has_focus: bool,
}

/// Геометрия окна (yabai отдаёт координаты числами с плавающей точкой)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl WindowInfo {
    pub fn new(id: u32, app_name: impl Into<String>) -> Self {
        Self {
            id,
            app_name: app_name.into(),
            title: String::new(),
            space: None,
            display: None,
            frame: WindowFrame::default(),
            role: ELIGIBLE_ROLE.to_string(),
            is_minimized: false,
            is_standard: None,
            has_focus: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Пространство и дисплей (для тестов и dry-run обычно совпадают)
    pub fn on_space(mut self, space: u32, display: u32) -> Self {
        self.space = Some(space);
        self.display = Some(display);
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.frame.x = f64::from(x);
        self.frame.y = f64::from(y);
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_focus(mut self, has_focus: bool) -> Self {
        self.has_focus = has_focus;
        self
    }

    pub fn minimized(mut self) -> Self {
        self.is_minimized = true;
        self
    }

    #[allow(dead_code)]
    pub fn with_standard(mut self, is_standard: bool) -> Self {
        self.is_standard = Some(is_standard);
        self
    }

    /// Левый верхний угол в целых координатах экрана
    pub fn position(&self) -> (i32, i32) {
        (self.frame.x.round() as i32, self.frame.y.round() as i32)
    }

    /// Проверка всех условий допуска к переключению разом
    pub fn is_eligible(&self) -> bool {
        !self.is_minimized
            && self.role == ELIGIBLE_ROLE
            && self.is_standard != Some(false)
            && self.space.is_some()
            && self.display.is_some()
    }

    /// Детерминированный порядок: пространство, y, x, заголовок; id разрешает ничьи
    pub fn cycle_order(&self, other: &Self) -> Ordering {
        let (ax, ay) = self.position();
        let (bx, by) = other.position();
        self.space
            .cmp(&other.space)
            .then(ay.cmp(&by))
            .then(ax.cmp(&bx))
            .then_with(|| self.title.cmp(&other.title))
            .then(self.id.cmp(&other.id))
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "#{} ({})", self.id, self.app_name)
        } else {
            write!(f, "#{} \"{}\" ({})", self.id, self.title, self.app_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_info_creation() {
        let window = WindowInfo::new(7, "Safari")
            .with_title("Start Page")
            .on_space(2, 1)
            .at(10, 20);

        assert_eq!(window.app_name, "Safari");
        assert_eq!(window.space, Some(2));
        assert_eq!(window.display, Some(1));
        assert_eq!(window.position(), (10, 20));
        assert!(window.is_eligible());
    }

    #[test]
    fn test_eligibility_checks() {
        let base = WindowInfo::new(1, "Foo").on_space(1, 1);

        assert!(!base.clone().minimized().is_eligible());
        assert!(!base.clone().with_role("AXSheet").is_eligible());
        assert!(!base.clone().with_standard(false).is_eligible());
        assert!(base.clone().with_standard(true).is_eligible());
        assert!(!WindowInfo::new(2, "Foo").is_eligible());

        let mut no_display = base.clone();
        no_display.display = None;
        assert!(!no_display.is_eligible());
    }

    #[test]
    fn test_cycle_order_key() {
        let a = WindowInfo::new(3, "Foo").on_space(1, 1).at(500, 0).with_title("b");
        let b = WindowInfo::new(2, "Foo").on_space(1, 1).at(0, 10);
        let c = WindowInfo::new(1, "Foo").on_space(2, 1).at(0, 0);

        assert_eq!(a.cycle_order(&b), Ordering::Less);
        assert_eq!(b.cycle_order(&c), Ordering::Less);

        let same_pos = WindowInfo::new(4, "Foo").on_space(1, 1).at(500, 0).with_title("a");
        assert_eq!(same_pos.cycle_order(&a), Ordering::Less);

        let twin = WindowInfo::new(9, "Foo").on_space(1, 1).at(500, 0).with_title("b");
        assert_eq!(a.cycle_order(&twin), Ordering::Less);
    }

    #[test]
    fn test_parse_yabai_window() {
        let json = r#"{
            "id": 4242,
            "pid": 811,
            "app": "Terminal",
            "title": "~/src - zsh",
            "frame": { "x": 12.0, "y": 38.5, "w": 800.0, "h": 600.0 },
            "role": "AXWindow",
            "subrole": "AXStandardWindow",
            "display": 1,
            "space": 3,
            "has-focus": true,
            "is-minimized": false,
            "is-visible": true
        }"#;

        let window: WindowInfo = serde_json::from_str(json).unwrap();
        assert_eq!(window.id, 4242);
        assert_eq!(window.app_name, "Terminal");
        assert_eq!(window.space, Some(3));
        assert_eq!(window.position(), (12, 39));
        assert!(window.has_focus);
        assert_eq!(window.is_standard, None);
        assert!(window.is_eligible());
    }
}
