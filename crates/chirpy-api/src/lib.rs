pub mod admin;
pub mod chirps;
mod convert;
pub mod error;
pub mod extract;
pub mod routes;
pub mod sanitize;
pub mod state;
pub mod users;
