//! Sling Deploy Library
//!
//! Deploys OSGi bundles and content to a running Sling instance.

pub mod app;
pub mod bundle;
pub mod cli;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod storage;
pub mod utils;
