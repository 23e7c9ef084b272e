pub mod client;
pub mod cycle_controller;
pub mod dry_run_desktop;
pub mod focus_sink;
pub mod notifier;
pub mod server;
pub mod window_cycler;
pub mod window_source;

pub use cycle_controller::CycleController;
pub use dry_run_desktop::DryRunDesktop;
pub use focus_sink::create_focus_sink;
pub use notifier::create_notifier;
pub use server::CycleServer;
pub use window_cycler::WindowCycler;
pub use window_source::create_window_source;

// Прямой доступ к dry-run реализациям нужен только тестам контроллера
#[cfg(test)]
pub use focus_sink::DryRunFocusSink;
#[cfg(test)]
pub use window_source::DryRunSource;
