//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "trestle";
const APPLICATION: &str = "ledger";

/// Maximum number of archived log files to keep.
const MAX_OLD_LOGS: usize = 25;

const LATEST_LOG: &str = "latest.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Cache directory, home of the log files.
///
/// - Linux: `$XDG_CACHE_HOME/ledger` or `~/.cache/ledger`
/// - macOS: `~/Library/Caches/dev.trestle.ledger`
/// - Windows: `C:\Users\<User>\AppData\Local\trestle\ledger\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Config directory, home of `settings.json`.
///
/// - Linux: `$XDG_CONFIG_HOME/ledger` or `~/.config/ledger`
/// - macOS: `~/Library/Application Support/dev.trestle.ledger`
/// - Windows: `C:\Users\<User>\AppData\Roaming\trestle\ledger\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.json"))
}

pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archive `latest.log` under a timestamped name and prune old archives.
///
/// Call at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    rotate_logs_in(&cache, chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());
}

fn rotate_logs_in(dir: &Path, stamp: String) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let archived = dir.join(format!("{stamp}.log"));
        let _ = fs::rename(&latest, &archived);
    }
    cleanup_old_logs(dir);
}

fn cleanup_old_logs(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Oldest first; names are timestamps, so they break mtime ties.
    logs.sort_by_key(|e| (e.metadata().and_then(|m| m.modified()).ok(), e.file_name()));

    if logs.len() > MAX_OLD_LOGS {
        for entry in logs.iter().take(logs.len() - MAX_OLD_LOGS) {
            let _ = fs::remove_file(entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_archives_latest_and_keeps_newest() {
        let dir = std::env::temp_dir().join(format!("ledger-logs-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        for i in 0..MAX_OLD_LOGS {
            fs::write(dir.join(format!("2024010{}_0000{i:02}.log", i % 10)), "").expect("write");
        }
        fs::write(dir.join(LATEST_LOG), "current").expect("write");

        rotate_logs_in(&dir, "29990101_000000".to_string());

        assert!(!dir.join(LATEST_LOG).exists());
        assert_eq!(
            fs::read_to_string(dir.join("29990101_000000.log")).expect("archived"),
            "current"
        );
        let count = fs::read_dir(&dir).expect("read").count();
        assert_eq!(count, MAX_OLD_LOGS);

        let _ = fs::remove_dir_all(&dir);
    }
}
