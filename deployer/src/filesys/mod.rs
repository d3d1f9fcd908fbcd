//! File system module

pub mod file;
