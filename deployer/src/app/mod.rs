//! Commands built on top of the deploy methods

pub mod options;
pub mod run;
