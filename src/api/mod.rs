pub mod error;
pub mod models;
pub mod ratelimit;
pub mod server;
pub mod services;
pub mod state;
pub mod utils;
pub mod validation;
