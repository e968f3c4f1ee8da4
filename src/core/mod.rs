// src/core/mod.rs

pub mod cache;
pub mod color;
pub mod config_loader;
pub mod document;
pub mod elements;
pub mod entry;
pub mod painter;
pub mod paths;
pub mod query;
pub mod styled_text;
pub mod tags;
pub mod transformer;
