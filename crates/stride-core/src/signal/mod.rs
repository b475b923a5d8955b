pub mod filter;
pub mod window;

pub use filter::{LowPassFilter, DEFAULT_ALPHA};
pub use window::{MagnitudeWindow, DEFAULT_WINDOW_CAPACITY};
