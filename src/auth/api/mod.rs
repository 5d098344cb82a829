//! Authentication HTTP endpoints

pub mod handlers;
pub mod routes;

pub use routes::create_auth_routes;
