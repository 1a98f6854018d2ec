//! Data structures persisted by the tool.

pub mod index;
pub mod policy;
pub mod settings;
