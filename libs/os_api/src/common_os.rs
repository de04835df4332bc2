use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::LoginItemStatus;

impl crate::OS {
    /// Creates the platform layer for the program registered under `label`
    /// (reverse-DNS, e.g. `com.startie.Startie`).
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn current_executable() -> Result<PathBuf, String> {
        std::env::current_exe().map_err(|e| format!("cannot resolve current executable: {e}"))
    }

    pub(crate) fn home_dir() -> Result<PathBuf, String> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .ok_or_else(|| "cannot resolve home directory".to_string())
    }

    pub(crate) fn entry_status(entry: &Path) -> LoginItemStatus {
        if entry.is_file() {
            LoginItemStatus::Enabled
        } else {
            LoginItemStatus::NotRegistered
        }
    }

    pub(crate) fn write_entry(entry: &Path, contents: &str) -> Result<(), String> {
        if let Some(parent) = entry.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("create {} failed: {}", parent.display(), e))?;
        }
        fs::write(entry, contents).map_err(|e| format!("write {} failed: {}", entry.display(), e))
    }

    pub(crate) fn remove_entry(entry: &Path) -> Result<(), String> {
        match fs::remove_file(entry) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("remove {} failed: {}", entry.display(), e)),
        }
    }
}

/// Escapes text for inclusion in XML character data.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            xml_escape("/Apps/R&D <beta>.app"),
            "/Apps/R&amp;D &lt;beta&gt;.app"
        );
    }

    #[test]
    fn missing_entry_is_not_registered() {
        let status = crate::OS::entry_status(Path::new("/nonexistent/startie/entry.plist"));
        assert_eq!(status, LoginItemStatus::NotRegistered);
    }

    #[test]
    fn entry_lifecycle_drives_status() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("LaunchAgents").join("com.startie.Startie.plist");

        crate::OS::write_entry(&entry, "<plist/>").unwrap();
        assert_eq!(crate::OS::entry_status(&entry), LoginItemStatus::Enabled);

        crate::OS::remove_entry(&entry).unwrap();
        assert_eq!(crate::OS::entry_status(&entry), LoginItemStatus::NotRegistered);
    }

    #[test]
    fn removing_missing_entry_is_ok() {
        assert!(crate::OS::remove_entry(Path::new("/nonexistent/startie/entry.plist")).is_ok());
    }
}
