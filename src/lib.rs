mod common;
mod features;

pub mod app;
pub mod config;
pub mod data_model;
pub mod logging;
pub mod probe;
pub mod probe_engine;
pub mod runtime;
pub mod settings;
pub mod storage;
pub mod ui;

pub use features::{measurement, rating, report};
