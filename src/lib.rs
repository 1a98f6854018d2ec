//! Personal credential manager over the OS keyring.
//!
//! Passwords live in the system keyring under `{app}.{service}` / login.
//! A small metadata index, itself one keyring secret, records which
//! services and logins exist so they can be listed and a default login
//! resolved without enumerating the keyring.
//!
//! ## Modules
//! - `cli` — Command-line handlers
//! - `core` — Vault adapters, metadata index, credential store, audit
//! - `models` — Data structures
//! - `util` — System utilities (fs, identity)

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod util;
