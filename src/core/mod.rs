//! Core logic: vault adapters, metadata index, credential store, and the
//! local bookkeeping around them (config, audit trail, locks).

pub mod audit_log;
pub mod error;
pub mod file_lock;
pub mod keyring_vault;
pub mod metadata;
pub mod paths;
pub mod settings;
pub mod store;
pub mod vault;
