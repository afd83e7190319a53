pub mod config;
pub mod error;
pub mod time;
pub mod types;

pub use config::AppConfig;
pub use error::{QuietError, QuietResult};
pub use time::TimeOfDay;
