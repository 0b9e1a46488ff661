pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod github;
pub mod normalizer;
pub mod orchestrator;
pub mod signal;
pub mod test_helpers;
