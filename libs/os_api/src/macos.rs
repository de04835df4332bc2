use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::common_os::xml_escape;
use crate::{AppLauncher, FileSystem, LaunchTarget, LoginItemService, LoginItemStatus};

pub struct OS {
    pub(crate) label: String,
}

impl OS {
    /// `~/Library/LaunchAgents/<label>.plist`
    fn launch_agent_path(&self) -> Result<PathBuf, String> {
        Ok(Self::home_dir()?
            .join("Library")
            .join("LaunchAgents")
            .join(format!("{}.plist", self.label)))
    }

    fn launch_agent_plist(&self, executable: &Path) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{label}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{program}</string>
        <string>{sentinel}</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#,
            label = xml_escape(&self.label),
            program = xml_escape(&executable.to_string_lossy()),
            sentinel = crate::LOGIN_SENTINEL_ARG,
        )
    }
}

impl AppLauncher for OS {
    fn open_application(&self, target: &LaunchTarget) -> Result<(), String> {
        let status = Command::new("/usr/bin/open")
            .arg(&target.path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| format!("spawn open for {:?} failed: {}", target.path, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(format!("open {:?} exited with {}", target.path, status))
        }
    }
}

impl LoginItemService for OS {
    fn status(&self) -> Result<LoginItemStatus, String> {
        Ok(Self::entry_status(&self.launch_agent_path()?))
    }

    fn register(&self) -> Result<(), String> {
        let executable = Self::current_executable()?;
        let plist = self.launch_agent_plist(&executable);
        Self::write_entry(&self.launch_agent_path()?, &plist)
    }

    fn unregister(&self) -> Result<(), String> {
        Self::remove_entry(&self.launch_agent_path()?)
    }
}

impl FileSystem for OS {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn bundle_identifier(&self, path: &Path) -> Option<String> {
        let output = Command::new("/usr/bin/mdls")
            .args(["-name", "kMDItemCFBundleIdentifier", "-raw"])
            .arg(path)
            .output()
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let identifier = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if identifier.is_empty() || identifier == "(null)" {
            None
        } else {
            Some(identifier)
        }
    }
}
