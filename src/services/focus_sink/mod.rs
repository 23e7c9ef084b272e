//! FocusSink service: makes a chosen window frontmost, switches spaces and
//! launches applications. It knows nothing about cycling order or history.

mod dry_run;
mod r#trait;
mod yabai;

#[cfg(test)]
pub use self::dry_run::DryRunFocusSink;
pub use self::r#trait::{create_focus_sink, FocusSink};
