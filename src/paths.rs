//! Data directory discovery.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ZOURNEL_DATA_DIR";

/// Resolve the data directory.
///
/// Precedence: explicit CLI override, then `ZOURNEL_DATA_DIR`, then
/// `~/.zournel`, then `./.zournel` as a last resort when no home directory
/// can be determined.
pub fn data_dir(cli_override: Option<&str>) -> PathBuf {
    if let Some(dir) = cli_override {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .map(|h| h.join(".zournel"))
        .unwrap_or_else(|| PathBuf::from(".zournel"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_override_wins() {
        assert_eq!(data_dir(Some("/tmp/z")), PathBuf::from("/tmp/z"));
    }
}
