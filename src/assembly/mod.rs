pub mod config;
pub mod diagnostics;
pub mod orchestrator;
pub mod tasks;
