pub mod maths_utils;
pub mod retention;
pub mod time_utils;

pub use retention::Retained;
pub use time_utils::{TimeUtils, epoch_ms_to_utc};
