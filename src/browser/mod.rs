//! Chrome session management
//!
//! - [`LaunchOptions`] / [`ConnectionOptions`]: how the browser is started or attached to
//! - [`BrowserSession`]: the main listing tab plus short-lived product tabs

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;
