pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use routes::{create_router, AppState};
