pub mod request;
pub mod window;

pub use request::{CycleRequest, CycleResponse};
pub use window::{WindowFrame, WindowInfo};
