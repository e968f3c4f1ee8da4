// src/cli/handlers/mod.rs

pub mod cache;
pub mod search;
