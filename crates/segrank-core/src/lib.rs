pub mod analysis;
pub mod config;
pub mod efforts;
pub mod error;
pub mod filters;
pub mod leaderboard;
pub mod ratings;
pub mod store;
pub mod trainer;
