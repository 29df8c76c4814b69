mod auth;
mod common;
mod league;
mod prediction;
