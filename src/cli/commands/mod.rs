//! Command implementations

pub mod cache;
pub mod characters;
pub mod completions;
pub mod config;
pub mod resolve;
