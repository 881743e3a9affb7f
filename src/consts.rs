// src/consts.rs
//! Shared constants — on-disk layout and cipher parameters

/// Name of the live keyring directory under the root
pub const KEYRING_DIR_NAME: &str = "keyring";

/// Prefix of the timestamped backup directory
pub const KEYRING_BACKUP_PREFIX: &str = "keyring-backup";

/// Extension (without dot) of collection key files
pub const KEY_FILE_EXTENSION: &str = "txt";

/// Suffix appended to the backup directory path to name the archive
pub const BACKUP_ARCHIVE_SUFFIX: &str = ".tar.gz";

/// chrono format for the backup directory timestamp: yy-MM-dd-HHmmssSSS
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%y-%m-%d-%H%M%S%3f";

/// AES block size, and therefore the CBC IV length
pub const AES_BLOCK_SIZE: usize = 16;

/// Accepted AES key lengths in bytes (128, 192 and 256 bit)
pub const AES_KEY_SIZES: [usize; 3] = [16, 24, 32];

/// Default tracing filter when neither RUST_LOG nor the settings file set one
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable naming the settings file
pub const CONFIG_ENV_VAR: &str = "REKEY_CONFIG";

/// Settings file looked up in the working directory when nothing else is given
pub const DEFAULT_CONFIG_FILE: &str = "rekey.toml";
