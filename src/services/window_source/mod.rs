//! WindowSource service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for enumerating the current
//! windows of all applications. They MUST NOT filter, sort or pick windows; all of
//! that is done by WindowCycler.

mod dry_run;
mod r#trait;
mod yabai;

#[cfg(test)]
pub use self::dry_run::DryRunSource;
pub use self::r#trait::{create_window_source, WindowSource};
