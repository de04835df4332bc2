// linux_launch_ops.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{AppLauncher, FileSystem, LaunchTarget, LoginItemService, LoginItemStatus};

pub struct OS {
    pub(crate) label: String,
}

impl OS {
    /// `~/.config/autostart/<label>.desktop`
    fn autostart_entry_path(&self) -> Result<PathBuf, String> {
        let config_dir = directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .map_or_else(|| Self::home_dir().map(|home| home.join(".config")), Ok)?;
        Ok(config_dir
            .join("autostart")
            .join(format!("{}.desktop", self.label)))
    }

    fn autostart_entry(&self, executable: &Path) -> String {
        let exec = shlex::try_quote(&executable.to_string_lossy())
            .map(|quoted| quoted.into_owned())
            .unwrap_or_else(|_| executable.display().to_string());
        format!(
            "[Desktop Entry]\nType=Application\nName={}\nExec={} {}\nX-GNOME-Autostart-enabled=true\n",
            self.label,
            exec,
            crate::LOGIN_SENTINEL_ARG,
        )
    }

    /// Resolves a launch target into the program and arguments to spawn.
    /// `.desktop` files are expanded through their `Exec=` line.
    fn resolve_command(file_path: &Path) -> Result<(PathBuf, Vec<String>), String> {
        let path = match fs::read_link(file_path) {
            Ok(target) if target.is_relative() => file_path
                .parent()
                .map(|dir| dir.join(&target))
                .unwrap_or(target),
            Ok(target) => target,
            Err(_) => file_path.to_path_buf(),
        };

        if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("desktop"))
        {
            return Self::parse_desktop_file(&path);
        }

        Ok((path, Vec::new()))
    }

    fn parse_desktop_file(path: &Path) -> Result<(PathBuf, Vec<String>), String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("failed to read .desktop: {}", e))?;
        Self::parse_desktop_exec(&content)
    }

    fn parse_desktop_exec(content: &str) -> Result<(PathBuf, Vec<String>), String> {
        for line in content.lines() {
            if let Some(cmdline) = line.strip_prefix("Exec=") {
                let cmdline = cmdline.trim();
                let parts: Vec<String> = shlex::split(cmdline)
                    .unwrap_or_else(|| vec![cmdline.to_string()])
                    .into_iter()
                    // %f, %U and friends are placeholders for the file manager
                    .filter(|part| !(part.len() == 2 && part.starts_with('%')))
                    .collect();
                let Some((program, args)) = parts.split_first() else {
                    return Err("Exec is empty".to_string());
                };
                return Ok((PathBuf::from(program), args.to_vec()));
            }
        }

        Err("Exec= not found in .desktop".into())
    }
}

impl AppLauncher for OS {
    fn open_application(&self, target: &LaunchTarget) -> Result<(), String> {
        let (program, args) = Self::resolve_command(&target.path)?;
        Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| format!("spawn {:?} failed: {}", program, e))
    }
}

impl LoginItemService for OS {
    fn status(&self) -> Result<LoginItemStatus, String> {
        Ok(Self::entry_status(&self.autostart_entry_path()?))
    }

    fn register(&self) -> Result<(), String> {
        let executable = Self::current_executable()?;
        let entry = self.autostart_entry(&executable);
        Self::write_entry(&self.autostart_entry_path()?, &entry)
    }

    fn unregister(&self) -> Result<(), String> {
        Self::remove_entry(&self.autostart_entry_path()?)
    }
}

impl FileSystem for OS {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn bundle_identifier(&self, _path: &Path) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_line_drops_field_codes() {
        let desktop = "[Desktop Entry]\nName=Editor\nExec=/usr/bin/editor --new-window %U\n";
        let (program, args) = OS::parse_desktop_exec(desktop).unwrap();

        assert_eq!(program, PathBuf::from("/usr/bin/editor"));
        assert_eq!(args, vec!["--new-window".to_string()]);
    }

    #[test]
    fn desktop_without_exec_is_rejected() {
        assert!(OS::parse_desktop_exec("[Desktop Entry]\nName=Broken\n").is_err());
    }

    #[test]
    fn plain_binary_resolves_to_itself() {
        let (program, args) = OS::resolve_command(Path::new("/opt/tools/runner")).unwrap();
        assert_eq!(program, PathBuf::from("/opt/tools/runner"));
        assert!(args.is_empty());
    }

    #[test]
    fn relative_link_resolves_next_to_the_link() {
        let dir = tempfile::tempdir().unwrap();
        let desktop = dir.path().join("editor.desktop");
        fs::write(&desktop, "[Desktop Entry]\nExec=/usr/bin/editor %F\n").unwrap();
        let link = dir.path().join("shortcut.desktop");
        std::os::unix::fs::symlink("editor.desktop", &link).unwrap();

        let (program, args) = OS::resolve_command(&link).unwrap();
        assert_eq!(program, PathBuf::from("/usr/bin/editor"));
        assert!(args.is_empty());
    }

    #[test]
    fn autostart_entry_passes_sentinel() {
        let os = OS::new("com.startie.Startie");
        let entry = os.autostart_entry(Path::new("/opt/startie/startie"));

        assert!(entry.starts_with("[Desktop Entry]"));
        assert!(entry.contains("Exec=/opt/startie/startie --launched-at-login"));
    }
}
