// src/config/defaults.rs
use crate::config::app::{Layout, Logging};
use crate::consts::{
    DEFAULT_LOG_FILTER, KEYRING_BACKUP_PREFIX, KEYRING_DIR_NAME, KEY_FILE_EXTENSION,
};

pub fn default_layout() -> Layout {
    Layout {
        keyring_dir: KEYRING_DIR_NAME.into(),
        backup_prefix: KEYRING_BACKUP_PREFIX.into(),
        key_extension: KEY_FILE_EXTENSION.into(),
    }
}

pub fn default_logging() -> Logging {
    Logging {
        filter: DEFAULT_LOG_FILTER.into(),
    }
}
