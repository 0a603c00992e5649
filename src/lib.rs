pub mod cli;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod parallel;
pub mod query;
