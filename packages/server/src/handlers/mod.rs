pub mod auth;
pub mod demo;
pub mod league;
pub mod prediction;
