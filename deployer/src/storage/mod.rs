//! Persistent configuration

pub mod settings;
