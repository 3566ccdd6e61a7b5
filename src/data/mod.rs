// Boundary of the crate: bar validation and bar-file loading
pub mod bar_file;
pub mod demo;
pub mod validator;

// Re-export commonly used types
pub use bar_file::{BarFile, LoadedBars};
pub use validator::{ValidationError, validate_candles};
