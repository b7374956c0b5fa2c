//! Configuration module for crm-cli
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::CrmPaths;
pub use settings::Settings;
