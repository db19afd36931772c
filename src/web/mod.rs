pub mod auth;
pub mod dashboard;
pub mod downloads;
pub mod router;
pub mod state;
pub mod templates;

pub use state::AppState;
