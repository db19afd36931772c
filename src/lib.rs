pub mod api;
pub mod config;
pub mod credentials;
pub mod dashboard;
pub mod error;
pub mod maintenance;
pub mod session;
pub mod web;

#[cfg(test)]
mod test_support;

pub use config::PortalConfig;
pub use error::PortalError;
pub use web::AppState;
