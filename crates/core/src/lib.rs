pub mod config;
pub mod cookie_store;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use cookie_store::CookieJar;
pub use error::HayahError;
pub use types::*;
