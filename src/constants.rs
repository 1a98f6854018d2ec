//! Centralized constants for namespaces, permissions, paths, and limits.

/// Default application prefix for vault namespaces.
pub const DEFAULT_NAMESPACE: &str = "pass";

/// Suffix of the namespace holding the metadata index (`{app}.meta`).
pub const META_SUFFIX: &str = "meta";

/// Current metadata index schema version.
pub const INDEX_SCHEMA_VERSION: &str = "1.0";

/// Environment variable overriding the home directory.
pub const HOME_ENV: &str = "PASS_HOME";

/// Directory name under the platform data dir.
pub const HOME_DIR_NAME: &str = "pass";

/// Permission mode for the home directory.
pub const HOME_DIR_MODE: u32 = 0o700;

/// Permission mode for config.toml.
pub const CONFIG_FILE_MODE: u32 = 0o600;

/// Permission mode for the audit log.
pub const AUDIT_LOG_MODE: u32 = 0o600;

/// Permission mode for export files (they contain plaintext passwords).
pub const EXPORT_FILE_MODE: u32 = 0o600;

/// Maximum secret size in bytes (1 MiB).
pub const MAX_SECRET_SIZE: usize = 1_048_576;

/// Default length for generated passwords.
pub const DEFAULT_GENERATED_LENGTH: usize = 24;

/// Indentation used for exported JSON.
pub const EXPORT_INDENT: &[u8] = b"    ";
