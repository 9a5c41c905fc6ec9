pub mod error;
pub mod render;
pub mod routes;
pub mod state;
