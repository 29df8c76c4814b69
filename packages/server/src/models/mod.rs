pub mod auth;
pub mod league;
pub mod prediction;
pub mod shared;
