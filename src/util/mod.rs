//! Utility modules for filesystem access and the local identity.

pub mod fs;
pub mod identity;
